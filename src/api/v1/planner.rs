//! Kanban, calendar, weekly-schedule and workflow views.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::api::common::utils::with_timeout;
use crate::api::common::{ApiResponse, ChannelFilter};
use crate::domain::{Channel, UploadDay, VideoProject, VideoStatus};
use crate::errors::AppError;
use crate::priority::{
    compute_score, group_by_publish_date, group_by_status, group_by_weekday,
    order_by_priority_descending, production_queue, with_display_scores, ScorePath,
};
use crate::reports::{filter_videos_by_channel, ALL_CHANNELS};
use crate::store::{load_all, load_one, Collection};
use crate::InnerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub channel: Channel,
    /// Live score of the channel on the display path.
    pub channel_score: f64,
    pub videos: Vec<VideoProject>,
}

async fn load_videos(inner: &InnerState, channel_id: Option<&str>) -> Result<Vec<VideoProject>, AppError> {
    let videos: Vec<VideoProject> = with_timeout(
        inner.config.store_timeout,
        load_all(inner.store.as_ref(), Collection::Videos),
    )
    .await?;
    Ok(filter_videos_by_channel(videos, channel_id))
}

#[tracing::instrument(name = "Kanban board", skip(inner))]
pub async fn kanban(
    State(inner): State<InnerState>,
    Query(filter): Query<ChannelFilter>,
) -> Result<Json<ApiResponse<BTreeMap<VideoStatus, Vec<VideoProject>>>>, AppError> {
    let videos = load_videos(&inner, filter.as_deref()).await?;
    let board = group_by_status(&order_by_priority_descending(videos));

    Ok(Json(ApiResponse::success(board)))
}

/// Month grid, defaulting to the current UTC month.
#[tracing::instrument(name = "Calendar grid", skip(inner))]
pub async fn calendar(
    State(inner): State<InnerState>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<ApiResponse<BTreeMap<String, Vec<VideoProject>>>>, AppError> {
    let today = Utc::now().date_naive();
    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month());

    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(format!("Invalid month: {}", month)));
    }

    let videos = load_videos(&inner, params.channel_id.as_deref()).await?;

    Ok(Json(ApiResponse::success(group_by_publish_date(&videos, year, month))))
}

/// Upcoming work by weekday, ranked with live display scores.
#[tracing::instrument(name = "Weekly schedule", skip(inner))]
pub async fn weekly(
    State(inner): State<InnerState>,
    Query(filter): Query<ChannelFilter>,
) -> Result<Json<ApiResponse<BTreeMap<UploadDay, Vec<VideoProject>>>>, AppError> {
    let channels: Vec<Channel> = with_timeout(
        inner.config.store_timeout,
        load_all(inner.store.as_ref(), Collection::Channels),
    )
    .await?;
    let videos = load_videos(&inner, filter.as_deref()).await?;

    let schedule = group_by_weekday(&with_display_scores(videos, &channels));

    Ok(Json(ApiResponse::success(schedule)))
}

/// One channel's production queue together with its current priority score.
#[tracing::instrument(name = "Workflow", skip(inner))]
pub async fn workflow(
    State(inner): State<InnerState>,
    Query(filter): Query<ChannelFilter>,
) -> Result<Json<ApiResponse<WorkflowView>>, AppError> {
    let channel_id = match filter.as_deref() {
        Some(id) if !id.trim().is_empty() && id != ALL_CHANNELS => id.to_string(),
        _ => {
            return Err(AppError::Validation(
                "A single channelId is required".to_string(),
            ))
        }
    };

    let channel: Channel = with_timeout(
        inner.config.store_timeout,
        load_one(inner.store.as_ref(), Collection::Channels, &channel_id),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Channel {} not found", channel_id)))?;

    let videos: Vec<VideoProject> = with_timeout(
        inner.config.store_timeout,
        load_all(inner.store.as_ref(), Collection::Videos),
    )
    .await?;

    let view = WorkflowView {
        channel_score: compute_score(Some(&channel), ScorePath::DisplayFallback),
        videos: production_queue(videos, &channel_id),
        channel,
    };

    tracing::info!(
        "workflow: Channel {} has {} videos in production",
        channel_id,
        view.videos.len()
    );

    Ok(Json(ApiResponse::success(view)))
}
