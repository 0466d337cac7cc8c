//! API Version 1 endpoints

pub mod channels;
pub mod dashboard;
pub mod history;
pub mod planner;
pub mod prompts;
pub mod videos;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::InnerState;

#[tracing::instrument(name = "create_v1_router", skip(state))]
pub fn create_v1_router(state: InnerState) -> Router<InnerState> {
    tracing::info!("Creating V1 API router");

    Router::new()
        .route(
            "/api/v1/channels",
            get(channels::all_channels).post(channels::create_channel),
        )
        .route(
            "/api/v1/channels/{channel_id}",
            get(channels::get_channel)
                .put(channels::update_channel)
                .delete(channels::delete_channel),
        )
        .route(
            "/api/v1/videos",
            get(videos::all_videos).post(videos::create_video),
        )
        .route(
            "/api/v1/videos/{video_id}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/api/v1/videos/{video_id}/advance", post(videos::advance_video))
        .route("/api/v1/videos/{video_id}/complete", post(videos::complete_video))
        .route(
            "/api/v1/prompts",
            get(prompts::all_prompts).post(prompts::create_prompt),
        )
        .route("/api/v1/prompts/{prompt_id}", delete(prompts::delete_prompt))
        .route("/api/v1/planner/kanban", get(planner::kanban))
        .route("/api/v1/planner/calendar", get(planner::calendar))
        .route("/api/v1/planner/weekly", get(planner::weekly))
        .route("/api/v1/planner/workflow", get(planner::workflow))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route("/api/v1/history", get(history::get_history))
        .route("/api/v1/history/export.csv", get(history::export_history_csv))
        .with_state(state)
}
