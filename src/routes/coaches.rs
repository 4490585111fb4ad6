use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/coaches",
            get(commands::coaches::get_coaches).post(commands::coaches::create_coach),
        )
        .route(
            "/api/coaches/:id",
            put(commands::coaches::update_coach).delete(commands::coaches::delete_coach),
        )
}
