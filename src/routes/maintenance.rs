use crate::commands;
use crate::state::AppState;
use axum::{
    routing::get,
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/maintenance/services",
        get(commands::maintenance::get_service_tickets)
            .post(commands::maintenance::schedule_service),
    )
}
