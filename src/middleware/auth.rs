use crate::error::DoelResult;
use crate::models::{AppRole, User};
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub role: Option<AppRole>,
    pub exp: usize,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        // No session expiry model in the product; tokens outlive any
        // realistic desktop session.
        let exp = chrono::Utc::now().timestamp() as usize + 60 * 60 * 24 * 30;
        Self {
            sub: user.username.clone(),
            user_id: Some(user.id.clone()),
            username: Some(user.username.clone()),
            role: Some(user.role),
            exp,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Some(AppRole::SuperAdmin)
    }
}

pub fn get_jwt_secret() -> Vec<u8> {
    std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure default!");
            "insecure-development-secret-key-replace-me-immediately".to_string()
        })
        .into_bytes()
}

pub fn issue_token(user: &User) -> DoelResult<String> {
    let claims = Claims::for_user(user);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&get_jwt_secret()),
    )?;
    Ok(token)
}

pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let path = request.uri().path();
    let public_routes = [
        "/api/ping",
        "/api/auth/login",
        "/api/auth/signup",
        "/api/auth/status",
    ];

    if !path.starts_with("/api/") || public_routes.contains(&path) {
        return Ok(next.run(request).await);
    }

    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = &auth_header["Bearer ".len()..];

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&get_jwt_secret()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(token_data.claims);

    Ok(next.run(request).await)
}
