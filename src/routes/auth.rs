use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(commands::auth::status))
        .route("/api/auth/status", get(commands::auth::status))
        .route("/api/auth/login", post(commands::auth::login))
        .route("/api/auth/signup", post(commands::auth::sign_up))
        .route("/api/auth/logout", post(commands::auth::logout))
        .route("/api/auth/check", get(commands::auth::check_session))
        // Access gate
        .route(
            "/api/screens/:screen",
            get(commands::auth::resolve_screen),
        )
        // User management
        .route("/api/users", get(commands::users::get_all_users))
        .route("/api/users/:id", put(commands::users::update_user))
}
