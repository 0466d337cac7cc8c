use axum::extract::{Query, State};
use axum::Json;

use crate::api::common::utils::with_timeout;
use crate::api::common::{ApiResponse, ChannelFilter};
use crate::domain::{Channel, VideoProject};
use crate::errors::AppError;
use crate::reports::{dashboard_totals, filter_channels, filter_videos_by_channel, DashboardTotals};
use crate::store::{load_all, Collection};
use crate::InnerState;

#[tracing::instrument(name = "Dashboard totals", skip(inner))]
pub async fn get_dashboard(
    State(inner): State<InnerState>,
    Query(filter): Query<ChannelFilter>,
) -> Result<Json<ApiResponse<DashboardTotals>>, AppError> {
    let InnerState { store, config } = inner;

    let channels: Vec<Channel> =
        with_timeout(config.store_timeout, load_all(store.as_ref(), Collection::Channels)).await?;
    let videos: Vec<VideoProject> =
        with_timeout(config.store_timeout, load_all(store.as_ref(), Collection::Videos)).await?;

    let channels = filter_channels(channels, filter.as_deref());
    let videos = filter_videos_by_channel(videos, filter.as_deref());

    let totals = dashboard_totals(&channels, &videos);

    tracing::debug!(
        "get_dashboard: {} channels, {} videos, {} subscribers",
        channels.len(),
        videos.len(),
        totals.total_subscribers
    );

    Ok(Json(ApiResponse::success(totals)))
}
