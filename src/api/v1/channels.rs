use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::common::utils::{new_document_id, with_timeout};
use crate::api::common::ApiResponse;
use crate::domain::Channel;
use crate::errors::AppError;
use crate::store::{load_all, load_one, save_typed, Collection};
use crate::InnerState;

fn validate_channel(channel: &Channel) -> Result<(), AppError> {
    if channel.name.trim().is_empty() {
        return Err(AppError::Validation("Channel name is required".to_string()));
    }
    Ok(())
}

#[tracing::instrument(name = "Get all channels", skip(inner))]
pub async fn all_channels(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<Channel>>>, AppError> {
    let InnerState { store, config } = inner;

    let mut channels: Vec<Channel> =
        with_timeout(config.store_timeout, load_all(store.as_ref(), Collection::Channels)).await?;
    channels.sort_by_key(|c| c.name.to_lowercase());

    tracing::info!("all_channels: Returning {} channels", channels.len());

    Ok(Json(ApiResponse::success(channels)))
}

#[tracing::instrument(name = "Get channel by id", skip(inner))]
pub async fn get_channel(
    State(inner): State<InnerState>,
    Path(channel_id): Path<String>,
) -> Result<Json<ApiResponse<Channel>>, AppError> {
    let InnerState { store, config } = inner;

    let channel: Channel = with_timeout(
        config.store_timeout,
        load_one(store.as_ref(), Collection::Channels, &channel_id),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Channel {} not found", channel_id)))?;

    Ok(Json(ApiResponse::success(channel)))
}

#[tracing::instrument(name = "Create channel", skip(inner, payload))]
pub async fn create_channel(
    State(inner): State<InnerState>,
    Json(mut payload): Json<Channel>,
) -> Result<(StatusCode, Json<ApiResponse<Channel>>), AppError> {
    let InnerState { store, config } = inner;

    validate_channel(&payload)?;
    if payload.id.trim().is_empty() {
        payload.id = new_document_id();
    }
    payload.clamp_priority_inputs();

    let saved = with_timeout(
        config.store_timeout,
        save_typed(store.as_ref(), Collection::Channels, &payload.id, &payload),
    )
    .await?;

    tracing::info!("create_channel: Created channel {}", saved.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved))))
}

/// Replaces a channel. Videos keep their cached scores unless the rescore
/// listener is running.
#[tracing::instrument(name = "Update channel", skip(inner, payload))]
pub async fn update_channel(
    State(inner): State<InnerState>,
    Path(channel_id): Path<String>,
    Json(mut payload): Json<Channel>,
) -> Result<Json<ApiResponse<Channel>>, AppError> {
    let InnerState { store, config } = inner;

    validate_channel(&payload)?;

    let existing: Option<Channel> = with_timeout(
        config.store_timeout,
        load_one(store.as_ref(), Collection::Channels, &channel_id),
    )
    .await?;
    if existing.is_none() {
        return Err(AppError::NotFound(format!("Channel {} not found", channel_id)));
    }

    payload.id = channel_id;
    payload.clamp_priority_inputs();

    let saved = with_timeout(
        config.store_timeout,
        save_typed(store.as_ref(), Collection::Channels, &payload.id, &payload),
    )
    .await?;

    tracing::info!(
        "update_channel: Updated channel {} (growth {}, ease {}, monetized {})",
        saved.id,
        saved.growth_potential(),
        saved.production_ease(),
        saved.is_monetized()
    );

    Ok(Json(ApiResponse::success(saved)))
}

/// Deletes only the channel document; its videos stay and keep the dangling id.
#[tracing::instrument(name = "Delete channel", skip(inner))]
pub async fn delete_channel(
    State(inner): State<InnerState>,
    Path(channel_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let InnerState { store, config } = inner;

    let existing = with_timeout(
        config.store_timeout,
        store.get(Collection::Channels, &channel_id),
    )
    .await?;
    if existing.is_none() {
        return Err(AppError::NotFound(format!("Channel {} not found", channel_id)));
    }

    with_timeout(
        config.store_timeout,
        store.delete(Collection::Channels, &channel_id),
    )
    .await?;

    tracing::info!("delete_channel: Deleted channel {}", channel_id);

    Ok(Json(ApiResponse::message(format!(
        "Channel {} deleted",
        channel_id
    ))))
}
