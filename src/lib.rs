use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;

pub mod api;
pub mod app_env;
pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

type AppState = State<Arc<SharedData>>;

/// Assembles the RPC routes, API documentation, per-call deadline, and request tracing
/// into the application's router
pub fn build_router(shared_data: SharedData, request_timeout: Duration) -> Router {
    let router = Router::new()
        .merge(api::todo::todo_routes())
        .with_state(Arc::new(shared_data))
        .merge(api::swagger_main::build_documentation())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(
                    routing_utils::middleware_error_response,
                ))
                .layer(TimeoutLayer::new(request_timeout)),
        );

    logging::attach_tracing_http(router)
}
