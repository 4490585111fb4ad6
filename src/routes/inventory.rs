use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/inventory",
            get(commands::inventory::get_inventory).post(commands::inventory::create_item),
        )
        .route(
            "/api/inventory/:id",
            put(commands::inventory::update_item).delete(commands::inventory::delete_item),
        )
        .route(
            "/api/inventory/:id/consume",
            post(commands::inventory::consume_stock),
        )
}
