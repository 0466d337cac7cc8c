//! Versioned HTTP API.

pub mod common;
pub mod v1;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::InnerState;

/// Full application router without the metrics layer.
#[tracing::instrument(name = "create_api_router", skip(state))]
pub fn create_api_router(state: InnerState) -> Router {
    tracing::info!("Creating API router with versioned endpoints");

    Router::new()
        .merge(crate::system::create_system_router(state.clone()))
        .merge(v1::create_v1_router(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(common::tracing::make_custom_span)
                .on_request(common::tracing::on_custom_request)
                .on_response(common::tracing::on_custom_response)
                .on_failure(common::tracing::on_custom_failure),
        )
        .with_state(state)
}
