use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/staff",
            get(commands::hr::get_staff).post(commands::hr::create_staff),
        )
        .route(
            "/api/staff/:id",
            put(commands::hr::update_staff).delete(commands::hr::delete_staff),
        )
}
