//! Priority scoring and the orderings behind the planner views.
//!
//! Everything here is synchronous and total: missing channels, scores and
//! inputs fall back to defaults instead of producing errors, so the views can
//! be recomputed whenever a collection changes.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::domain::{Channel, UploadDay, VideoProject, VideoStatus};

/// Bonus applied to monetized channels when a score is persisted with a video.
pub const PERSISTED_MONETIZATION_BONUS: f64 = 1.2;

/// Bonus applied to monetized channels when a view has to derive a score for
/// a video that carries none.
pub const DISPLAY_MONETIZATION_BONUS: f64 = 1.5;

/// Which formula a score is computed with.
///
/// The two paths disagree on the monetization bonus and on rounding; both are
/// kept so stored scores and live fallbacks stay comparable with existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePath {
    /// Rounded, 1.2 bonus. Used on every video write.
    Persisted,
    /// Unrounded, 1.5 bonus. Used by read-only views when no score is cached.
    DisplayFallback,
}

pub fn compute_score(channel: Option<&Channel>, path: ScorePath) -> f64 {
    let Some(channel) = channel else {
        return 0.0;
    };

    let base = f64::from(channel.growth_potential() * channel.production_ease());

    match (path, channel.is_monetized()) {
        (ScorePath::Persisted, true) => (base * PERSISTED_MONETIZATION_BONUS).round(),
        (ScorePath::DisplayFallback, true) => base * DISPLAY_MONETIZATION_BONUS,
        (_, false) => base,
    }
}

/// Stamps the persisted-path score of `channel` onto `video`.
pub fn assign_priority(mut video: VideoProject, channel: Option<&Channel>) -> VideoProject {
    video.priority_score = Some(compute_score(channel, ScorePath::Persisted));
    video
}

/// Score shown by the dashboard and workflow views.
///
/// A video whose channel is gone ranks as zero. Otherwise a non-zero cached
/// score wins over the live fallback formula.
pub fn display_score(video: &VideoProject, channel: Option<&Channel>) -> f64 {
    if channel.is_none() {
        return 0.0;
    }

    match video.priority_score {
        Some(score) if score != 0.0 => score,
        _ => compute_score(channel, ScorePath::DisplayFallback),
    }
}

/// Replaces every video's score with its [`display_score`].
pub fn with_display_scores(videos: Vec<VideoProject>, channels: &[Channel]) -> Vec<VideoProject> {
    let lookup = channel_lookup(channels);

    videos
        .into_iter()
        .map(|mut video| {
            let channel = lookup.get(video.channel_id.as_str()).copied();
            video.priority_score = Some(display_score(&video, channel));
            video
        })
        .collect()
}

pub fn channel_lookup(channels: &[Channel]) -> HashMap<&str, &Channel> {
    channels.iter().map(|c| (c.id.as_str(), c)).collect()
}

/// Highest score first. Equal scores keep their input order.
pub fn order_by_priority_descending(mut videos: Vec<VideoProject>) -> Vec<VideoProject> {
    // slice::sort_by is stable
    videos.sort_by(|a, b| b.score().total_cmp(&a.score()));
    videos
}

/// Kanban columns. Every status has a bucket, and each bucket keeps the
/// relative order of `videos`.
pub fn group_by_status(videos: &[VideoProject]) -> BTreeMap<VideoStatus, Vec<VideoProject>> {
    let mut buckets: BTreeMap<VideoStatus, Vec<VideoProject>> =
        VideoStatus::ALL.iter().map(|s| (*s, Vec::new())).collect();

    for video in videos {
        buckets.entry(video.status).or_default().push(video.clone());
    }

    buckets
}

/// Calendar cells for one month, keyed by `YYYY-MM-DD`.
///
/// Every day of the month is present. An out-of-range month yields an empty map.
pub fn group_by_publish_date(
    videos: &[VideoProject],
    year: i32,
    month: u32,
) -> BTreeMap<String, Vec<VideoProject>> {
    let mut cells = BTreeMap::new();

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return cells;
    };

    for day in first.iter_days().take_while(|d| d.month() == first.month()) {
        let on_day: Vec<VideoProject> = videos
            .iter()
            .filter(|v| v.publish_date == Some(day))
            .cloned()
            .collect();

        cells.insert(
            day.format("%Y-%m-%d").to_string(),
            order_by_priority_descending(on_day),
        );
    }

    cells
}

/// Recurring weekly schedule of work still in flight.
///
/// Published videos and videos without a publish date are left out.
pub fn group_by_weekday(videos: &[VideoProject]) -> BTreeMap<UploadDay, Vec<VideoProject>> {
    let mut buckets: BTreeMap<UploadDay, Vec<VideoProject>> =
        UploadDay::ALL.iter().map(|d| (*d, Vec::new())).collect();

    for video in videos {
        if video.status.is_terminal() {
            continue;
        }
        if let Some(date) = video.publish_date {
            buckets.entry(UploadDay::of(date)).or_default().push(video.clone());
        }
    }

    buckets
        .into_iter()
        .map(|(day, bucket)| (day, order_by_priority_descending(bucket)))
        .collect()
}

/// A channel's production queue: its unpublished videos, highest score first.
pub fn production_queue(videos: Vec<VideoProject>, channel_id: &str) -> Vec<VideoProject> {
    order_by_priority_descending(
        videos
            .into_iter()
            .filter(|v| v.channel_id == channel_id && !v.status.is_terminal())
            .collect(),
    )
}

pub fn advance_status(status: VideoStatus) -> VideoStatus {
    status.advance()
}

/// Moves `video` to `status`. Any transition is allowed.
///
/// Entering Published stamps the completion date, preferring an explicit
/// `completion_date` over `now_ms`.
pub fn apply_status(
    video: &mut VideoProject,
    status: VideoStatus,
    completion_date: Option<i64>,
    now_ms: i64,
) {
    let entering_published = status.is_terminal() && !video.status.is_terminal();
    video.status = status;

    if entering_published {
        video.completion_date = Some(completion_date.unwrap_or(now_ms));
    } else if completion_date.is_some() {
        video.completion_date = completion_date;
    }
}
