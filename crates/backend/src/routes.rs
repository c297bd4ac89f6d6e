use axum::http::{header, Method};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::dashboards::d100_sales_overview::dataset::SalesDataset;
use crate::system;

/// Shared state of all handlers: the canonical dataset, read-only
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<SalesDataset>,
}

impl AppState {
    pub fn new(dataset: SalesDataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

/// Build the router with every dashboard route and the shared layers
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(handlers::d100_sales_overview::index))
        .route("/health", get(|| async { "ok" }))
        // D100 Sales Overview Dashboard
        .route(
            "/api/d100/filters",
            get(handlers::d100_sales_overview::get_filter_options),
        )
        .route(
            "/api/d100/sales_overview",
            get(handlers::d100_sales_overview::get_sales_overview),
        )
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
}
