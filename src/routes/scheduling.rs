use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/trips",
            get(commands::trips::get_trips).post(commands::trips::create_trip),
        )
        .route(
            "/api/trips/:id",
            put(commands::trips::update_trip).delete(commands::trips::delete_trip),
        )
        .route(
            "/api/trips/:id/finalize",
            post(commands::trips::finalize_trip),
        )
        .route("/api/crew", get(commands::hr::get_crew))
}
