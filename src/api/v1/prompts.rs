use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::common::utils::{new_document_id, with_timeout};
use crate::api::common::ApiResponse;
use crate::domain::SavedPrompt;
use crate::errors::AppError;
use crate::store::{load_all, save_typed, Collection};
use crate::InnerState;

/// Saved prompts, most recently added first.
#[tracing::instrument(name = "Get all prompts", skip(inner))]
pub async fn all_prompts(
    State(inner): State<InnerState>,
) -> Result<Json<ApiResponse<Vec<SavedPrompt>>>, AppError> {
    let InnerState { store, config } = inner;

    let mut prompts: Vec<SavedPrompt> =
        with_timeout(config.store_timeout, load_all(store.as_ref(), Collection::Prompts)).await?;
    prompts.reverse();

    Ok(Json(ApiResponse::success(prompts)))
}

#[tracing::instrument(name = "Create prompt", skip(inner, payload))]
pub async fn create_prompt(
    State(inner): State<InnerState>,
    Json(mut payload): Json<SavedPrompt>,
) -> Result<(StatusCode, Json<ApiResponse<SavedPrompt>>), AppError> {
    let InnerState { store, config } = inner;

    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Prompt content is required".to_string()));
    }
    payload.fill_defaults();
    if payload.id.trim().is_empty() {
        payload.id = new_document_id();
    }

    let saved = with_timeout(
        config.store_timeout,
        save_typed(store.as_ref(), Collection::Prompts, &payload.id, &payload),
    )
    .await?;

    tracing::info!("create_prompt: Saved prompt {} in {}", saved.id, saved.category);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(saved))))
}

#[tracing::instrument(name = "Delete prompt", skip(inner))]
pub async fn delete_prompt(
    State(inner): State<InnerState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let InnerState { store, config } = inner;

    let existing = with_timeout(config.store_timeout, store.get(Collection::Prompts, &prompt_id)).await?;
    if existing.is_none() {
        return Err(AppError::NotFound(format!("Prompt {} not found", prompt_id)));
    }

    with_timeout(config.store_timeout, store.delete(Collection::Prompts, &prompt_id)).await?;

    Ok(Json(ApiResponse::message(format!("Prompt {} deleted", prompt_id))))
}
