use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/dashboard/stats",
            get(commands::dashboard::get_dashboard_stats),
        )
        .route(
            "/api/dashboard/counter-performance",
            get(commands::dashboard::get_counter_performance),
        )
        .route(
            "/api/dashboard/daily-sales",
            get(commands::dashboard::get_daily_sales),
        )
}
