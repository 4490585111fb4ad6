use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/finance/transactions",
            get(commands::finance::get_transactions).post(commands::finance::create_transaction),
        )
        .route(
            "/api/finance/transactions/:id",
            put(commands::finance::update_transaction)
                .delete(commands::finance::delete_transaction),
        )
        .route(
            "/api/finance/totals",
            get(commands::finance::get_ledger_totals),
        )
}
