use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(commands::settings::get_settings))
        .route(
            "/api/settings/branding",
            put(commands::settings::update_branding),
        )
        .route(
            "/api/settings/ui",
            put(commands::settings::update_ui_prefs),
        )
        .route(
            "/api/settings/profile",
            put(commands::settings::update_profile),
        )
        .route(
            "/api/settings/password",
            put(commands::settings::change_password),
        )
        .route("/api/settings/reset", post(commands::settings::reset_data))
}
