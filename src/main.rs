use std::error::Error;
use std::sync::Arc;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tubemaster_api::api::create_api_router;
use tubemaster_api::config::{AppConfig, StoreBackend};
use tubemaster_api::db::init_db;
use tubemaster_api::rescore::spawn_rescore_listener;
use tubemaster_api::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use tubemaster_api::InnerState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubemaster_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set")?;
            Arc::new(PgDocumentStore::new(init_db(url).await?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store, data is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    if config.recompute_on_channel_update {
        spawn_rescore_listener(store.clone());
    }

    let bind_address = config.bind_address.clone();
    let app_state = InnerState::new(store, config);

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = create_api_router(app_state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
