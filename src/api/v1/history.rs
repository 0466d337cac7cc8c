use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::common::utils::with_timeout;
use crate::api::common::ApiResponse;
use crate::domain::{Channel, VideoProject};
use crate::errors::AppError;
use crate::reports::{completed_videos, history_csv, production_history, ProductionHistory};
use crate::store::{load_all, Collection};
use crate::InnerState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub channel_id: Option<String>,
    pub search: Option<String>,
}

async fn load_collections(inner: &InnerState) -> Result<(Vec<Channel>, Vec<VideoProject>), AppError> {
    let channels: Vec<Channel> = with_timeout(
        inner.config.store_timeout,
        load_all(inner.store.as_ref(), Collection::Channels),
    )
    .await?;
    let videos: Vec<VideoProject> = with_timeout(
        inner.config.store_timeout,
        load_all(inner.store.as_ref(), Collection::Videos),
    )
    .await?;
    Ok((channels, videos))
}

#[tracing::instrument(name = "Production history", skip(inner))]
pub async fn get_history(
    State(inner): State<InnerState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<ProductionHistory>>, AppError> {
    let (channels, videos) = load_collections(&inner).await?;

    let history = production_history(
        &channels,
        videos,
        params.channel_id.as_deref(),
        params.search.as_deref(),
    );

    Ok(Json(ApiResponse::success(history)))
}

#[tracing::instrument(name = "Export production history", skip(inner))]
pub async fn export_history_csv(
    State(inner): State<InnerState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let (channels, videos) = load_collections(&inner).await?;

    let done = completed_videos(videos, params.channel_id.as_deref(), params.search.as_deref());
    let csv = history_csv(&channels, &done);

    let filename = format!(
        "tubemaster_history_{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    tracing::info!("export_history_csv: Exporting {} videos", done.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}
