use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::{issue_token, Claims};
use crate::models::{AppRole, PublicUser, User};
use crate::permissions;
use crate::registry::{self, Registry};
use crate::state::{AppState, SessionState};
use crate::storage;
use axum::extract::{Json, Path, State};
use axum::Extension;
use bcrypt::verify;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

impl LoginResponse {
    fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            token: None,
            user: None,
        }
    }
}

/// Login check against the user store. Returns the matched user without
/// touching any session state; rejection leaves no partial session behind.
pub fn authenticate(registry: &Registry, username: &str, password: &str) -> Option<User> {
    let user = registry
        .users
        .iter()
        .find(|user| user.username == username)?;
    if !user.is_approved {
        return None;
    }
    if let Some(hash) = &user.password_hash {
        if !verify(password, hash).unwrap_or(false) {
            return None;
        }
    }
    Some(user.clone())
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> DoelResult<Json<LoginResponse>> {
    if payload.username.trim().is_empty() {
        return Ok(Json(LoginResponse::rejected(
            "Username and password are required.",
        )));
    }

    let user = {
        let registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        authenticate(&registry, &payload.username, &payload.password)
    };

    let Some(user) = user else {
        tracing::info!("Rejected login for '{}'", payload.username);
        return Ok(Json(LoginResponse::rejected(
            "Invalid credentials or account awaiting approval.",
        )));
    };

    let public = PublicUser::from(&user);

    if let Ok(mut session) = state.session.lock() {
        session.user_id = Some(user.id.clone());
        session.username = Some(user.username.clone());
        session.role = Some(user.role);
    }
    match serde_json::to_string(&public) {
        Ok(raw) => state.store.set(storage::USER_KEY, raw),
        Err(e) => tracing::warn!("Could not mirror current user: {}", e),
    }

    let token = issue_token(&user)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(token),
        user: Some(public),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Self-service signup. New accounts land as unapproved Counter users and
/// cannot log in until user management approves them.
pub fn sign_up_internal(registry: &mut Registry, payload: SignUpRequest) -> DoelResult<PublicUser> {
    let username = payload.username.trim();
    if username.is_empty() || payload.email.trim().is_empty() {
        return Err(DoelError::Validation(
            "Username and email are required.".to_string(),
        ));
    }
    if registry.users.iter().any(|user| user.username == username) {
        return Err(DoelError::Validation(format!(
            "Username '{username}' is already taken."
        )));
    }

    let password_hash = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => {
            Some(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
        }
        _ => None,
    };

    let user = User {
        id: registry::time_id("U-"),
        username: username.to_string(),
        email: payload.email.trim().to_string(),
        password_hash,
        role: AppRole::Counter,
        is_approved: false,
        created_at: registry::today(),
        profile_photo: None,
        nid_photo: None,
    };
    let public = PublicUser::from(&user);
    registry.users.push(user);
    Ok(public)
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> DoelResult<Json<PublicUser>> {
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let public = sign_up_internal(&mut registry, payload)?;
    tracing::info!("New signup '{}' awaiting approval", public.username);
    Ok(Json(public))
}

pub async fn logout(State(state): State<AppState>) -> Json<serde_json::Value> {
    if let Ok(mut session) = state.session.lock() {
        *session = SessionState::default();
    }
    state.store.remove(storage::USER_KEY);
    Json(serde_json::json!({ "success": true }))
}

pub async fn check_session(State(state): State<AppState>) -> Json<SessionState> {
    let session = state
        .session
        .lock()
        .map(|session| session.clone())
        .unwrap_or_default();
    Json(session)
}

pub async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenResolution {
    pub screen: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Access gate evaluated on navigation. Always resolves; a denied screen
/// carries the fixed access-denied fallback instead of an error.
pub async fn resolve_screen(
    Extension(claims): Extension<Claims>,
    Path(screen): Path<String>,
) -> Json<ScreenResolution> {
    let allowed = claims
        .role
        .map(|role| permissions::has_permission(&screen, role))
        .unwrap_or(false);
    Json(ScreenResolution {
        screen,
        allowed,
        fallback: (!allowed).then(|| permissions::ACCESS_DENIED_MESSAGE.to_string()),
    })
}
