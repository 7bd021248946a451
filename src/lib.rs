pub mod adapters;
pub mod config;
pub mod domain;
pub mod services;

use {
    crate::services::dispatcher::Dispatcher,
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, patch, post},
    },
    std::{sync::Arc, time::Duration},
    tower_http::{cors::CorsLayer, timeout::TimeoutLayer},
};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// The full HTTP surface, split out of `main` so integration tests can
/// drive the router directly. `http_timeout` should sit above the
/// dispatcher's gateway call timeout so the dispatcher, not the HTTP layer,
/// decides how a slow gateway is reported.
pub fn router(state: AppState, http_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/paymentGateway/processPayment",
            post(adapters::api::process_payment),
        )
        .route(
            "/paymentGateway/processRefund",
            patch(adapters::api::process_refund),
        )
        .route("/paymentGateway/test", get(adapters::api::health))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TimeoutLayer::new(http_timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
