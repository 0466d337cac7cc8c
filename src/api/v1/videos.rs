use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::common::utils::{new_document_id, now_millis, with_timeout};
use crate::api::common::{ApiResponse, ChannelFilter};
use crate::domain::{Channel, VideoProject, VideoStatus};
use crate::errors::AppError;
use crate::priority::{advance_status, apply_status, assign_priority, order_by_priority_descending};
use crate::reports::filter_videos_by_channel;
use crate::store::{load_all, load_one, save_typed, Collection};
use crate::InnerState;

fn validate_video(video: &VideoProject) -> Result<(), AppError> {
    if video.title.trim().is_empty() {
        return Err(AppError::Validation("Video title is required".to_string()));
    }
    Ok(())
}

async fn find_video(inner: &InnerState, video_id: &str) -> Result<VideoProject, AppError> {
    with_timeout(
        inner.config.store_timeout,
        load_one(inner.store.as_ref(), Collection::Videos, video_id),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))
}

/// Writes a video after applying the status and priority rules.
///
/// `previous` is the stored version for updates. When the owning channel is
/// missing, a new video scores zero while an existing one keeps its score.
async fn persist_video(
    inner: &InnerState,
    previous: Option<&VideoProject>,
    mut video: VideoProject,
) -> Result<VideoProject, AppError> {
    let target_status = video.status;
    let explicit_completion = video.completion_date;
    match previous {
        Some(prev) => {
            video.status = prev.status;
            video.completion_date = prev.completion_date;
        }
        None => {
            video.status = VideoStatus::default();
            video.completion_date = None;
        }
    }
    apply_status(&mut video, target_status, explicit_completion, now_millis());

    let channel: Option<Channel> = with_timeout(
        inner.config.store_timeout,
        load_one(inner.store.as_ref(), Collection::Channels, &video.channel_id),
    )
    .await?;

    let video = match (&channel, previous) {
        (None, Some(prev)) => {
            tracing::warn!(
                "persist_video: Channel {} not found, keeping cached score of video {}",
                video.channel_id,
                video.id
            );
            let kept = video.priority_score.or(prev.priority_score);
            VideoProject {
                priority_score: kept,
                ..video
            }
        }
        _ => assign_priority(video, channel.as_ref()),
    };

    let saved = with_timeout(
        inner.config.store_timeout,
        save_typed(inner.store.as_ref(), Collection::Videos, &video.id, &video),
    )
    .await?;

    tracing::debug!(
        "persist_video: Saved video {} with status {} and score {:?}",
        saved.id,
        saved.status,
        saved.priority_score
    );

    Ok(saved)
}

#[tracing::instrument(name = "Get all videos", skip(inner))]
pub async fn all_videos(
    State(inner): State<InnerState>,
    Query(filter): Query<ChannelFilter>,
) -> Result<Json<ApiResponse<Vec<VideoProject>>>, AppError> {
    let InnerState { store, config } = inner;

    let videos: Vec<VideoProject> =
        with_timeout(config.store_timeout, load_all(store.as_ref(), Collection::Videos)).await?;
    let videos = order_by_priority_descending(filter_videos_by_channel(videos, filter.as_deref()));

    tracing::info!("all_videos: Returning {} videos", videos.len());

    Ok(Json(ApiResponse::success(videos)))
}

#[tracing::instrument(name = "Get video by id", skip(inner))]
pub async fn get_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<VideoProject>>, AppError> {
    let video = find_video(&inner, &video_id).await?;
    Ok(Json(ApiResponse::success(video)))
}

#[tracing::instrument(name = "Create video", skip(inner, payload))]
pub async fn create_video(
    State(inner): State<InnerState>,
    Json(mut payload): Json<VideoProject>,
) -> Result<(StatusCode, Json<ApiResponse<VideoProject>>), AppError> {
    validate_video(&payload)?;
    if payload.id.trim().is_empty() {
        payload.id = new_document_id();
    }

    let saved = persist_video(&inner, None, payload).await?;

    tracing::info!(
        "create_video: Created video {} for channel {}",
        saved.id,
        saved.channel_id
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved))))
}

#[tracing::instrument(name = "Update video", skip(inner, payload))]
pub async fn update_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
    Json(mut payload): Json<VideoProject>,
) -> Result<Json<ApiResponse<VideoProject>>, AppError> {
    validate_video(&payload)?;

    let existing = find_video(&inner, &video_id).await?;
    payload.id = video_id;

    let saved = persist_video(&inner, Some(&existing), payload).await?;

    Ok(Json(ApiResponse::success(saved)))
}

#[tracing::instrument(name = "Advance video status", skip(inner))]
pub async fn advance_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<VideoProject>>, AppError> {
    let existing = find_video(&inner, &video_id).await?;

    let next = VideoProject {
        status: advance_status(existing.status),
        completion_date: None,
        ..existing.clone()
    };

    tracing::info!(
        "advance_video: Video {} {} -> {}",
        video_id,
        existing.status,
        next.status
    );

    let saved = persist_video(&inner, Some(&existing), next).await?;

    Ok(Json(ApiResponse::success(saved)))
}

#[tracing::instrument(name = "Complete video", skip(inner))]
pub async fn complete_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<VideoProject>>, AppError> {
    let existing = find_video(&inner, &video_id).await?;

    let done = VideoProject {
        status: VideoStatus::Published,
        completion_date: None,
        ..existing.clone()
    };

    let saved = persist_video(&inner, Some(&existing), done).await?;

    Ok(Json(ApiResponse::success(saved)))
}

#[tracing::instrument(name = "Delete video", skip(inner))]
pub async fn delete_video(
    State(inner): State<InnerState>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    find_video(&inner, &video_id).await?;

    with_timeout(
        inner.config.store_timeout,
        inner.store.delete(Collection::Videos, &video_id),
    )
    .await?;

    tracing::info!("delete_video: Deleted video {}", video_id);

    Ok(Json(ApiResponse::message(format!("Video {} deleted", video_id))))
}
