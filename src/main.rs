use axum::routing::get;
use axum::Router;
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod middleware;
mod models;
mod permissions;
mod registry;
mod routes;
mod seed;
mod state;
mod storage;

mod business_logic_tests;
mod integration_tests;

use state::AppState;
use storage::LocalStore;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Doel Express back-office...");

    let data_dir = env::var("DOEL_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store = LocalStore::open(&PathBuf::from(data_dir));

    // All entity collections live in memory, seeded from the mock fleet.
    let app_state = AppState::seeded(store);
    tracing::info!("Registry seeded with mock fleet data");

    let app = Router::new()
        .route("/", get(root))
        .merge(routes::create_router())
        .layer(axum::middleware::from_fn(
            middleware::auth::auth_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr_str = format!("0.0.0.0:{}", port);
    let addr = match addr_str.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid listen address {}: {}", addr_str, e);
            return;
        }
    };

    tracing::info!("listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

async fn root() -> &'static str {
    "Doel Express back-office is running!"
}
