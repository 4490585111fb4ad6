use crate::state::AppState;
use axum::Router;

pub mod ai;
pub mod auth;
pub mod coaches;
pub mod dashboard;
pub mod finance;
pub mod hr;
pub mod inventory;
pub mod maintenance;
pub mod reports;
pub mod sales;
pub mod scheduling;
pub mod settings;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(coaches::router())
        .merge(scheduling::router())
        .merge(sales::router())
        .merge(finance::router())
        .merge(inventory::router())
        .merge(hr::router())
        .merge(maintenance::router())
        .merge(dashboard::router())
        .merge(ai::router())
        .merge(reports::router())
        .merge(settings::router())
}
