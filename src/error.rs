use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoelError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock for {name}: {stock} {unit} available, {requested} requested")]
    InsufficientStock {
        name: String,
        unit: String,
        stock: u32,
        requested: u32,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl Serialize for DoelError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type DoelResult<T> = Result<T, DoelError>;

impl IntoResponse for DoelError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            DoelError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            DoelError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            DoelError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DoelError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            err @ DoelError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
            DoelError::Network(ref e) => {
                tracing::error!("Network error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable.".to_string(),
                )
            }
            DoelError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "File system error.".to_string(),
                )
            }
            other => {
                tracing::error!("Unhandled error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
