use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/sales",
            get(commands::sales::get_sales_records).post(commands::sales::create_sales_record),
        )
        .route(
            "/api/sales/:id",
            put(commands::sales::update_sales_record)
                .delete(commands::sales::delete_sales_record),
        )
        .route("/api/sales/draft", post(commands::sales::take_sales_draft))
        .route(
            "/api/sales/completed-trips",
            get(commands::sales::get_completed_trips),
        )
        // Counter operations
        .route(
            "/api/counters",
            get(commands::counters::get_counters).post(commands::counters::create_counter),
        )
        .route(
            "/api/counters/:id",
            put(commands::counters::update_counter)
                .delete(commands::counters::delete_counter),
        )
        .route(
            "/api/counters/sale",
            post(commands::sales::record_counter_sale),
        )
}
