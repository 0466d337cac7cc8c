use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::api::common::utils::with_timeout;
use crate::store::Collection;
use crate::InnerState;

const HEALTH_PROBE_ID: &str = "__health";

/// Reports whether the document store answers a read.
pub async fn health_check(State(inner): State<InnerState>) -> impl IntoResponse {
    let probe = inner.store.get(Collection::Prompts, HEALTH_PROBE_ID);
    let store_healthy = match with_timeout(inner.config.store_timeout, probe).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health probe failed");
            false
        }
    };

    let status = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_healthy { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "store_healthy": store_healthy,
        })),
    )
}
