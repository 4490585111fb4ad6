use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/reports/summary",
            get(commands::reports::get_report_summary),
        )
        .route(
            "/api/reports/export/csv",
            get(commands::reports::export_report_csv),
        )
}
