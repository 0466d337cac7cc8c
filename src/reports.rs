//! Aggregates for the dashboard and the production history.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde::Serialize;

use crate::domain::{Channel, VideoProject, VideoStatus};
use crate::priority::channel_lookup;

/// Channel selector value meaning "no filter".
pub const ALL_CHANNELS: &str = "all";

fn selects(filter: Option<&str>, channel_id: &str) -> bool {
    match filter {
        None | Some(ALL_CHANNELS) | Some("") => true,
        Some(id) => id == channel_id,
    }
}

pub fn filter_videos_by_channel(videos: Vec<VideoProject>, filter: Option<&str>) -> Vec<VideoProject> {
    videos
        .into_iter()
        .filter(|v| selects(filter, &v.channel_id))
        .collect()
}

pub fn filter_channels(channels: Vec<Channel>, filter: Option<&str>) -> Vec<Channel> {
    channels
        .into_iter()
        .filter(|c| selects(filter, &c.id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_subscribers: i64,
    pub total_views: i64,
    pub total_videos: i64,
    pub avg_views_per_video: i64,
    pub status_counts: BTreeMap<VideoStatus, usize>,
}

pub fn dashboard_totals(channels: &[Channel], videos: &[VideoProject]) -> DashboardTotals {
    let total_subscribers = channels.iter().map(|c| c.total_subscribers).sum();
    let total_views: i64 = channels.iter().map(|c| c.total_views).sum();
    let total_videos: i64 = channels.iter().map(|c| c.total_videos).sum();

    let avg_views_per_video = if total_videos > 0 {
        (total_views as f64 / total_videos as f64).round() as i64
    } else {
        0
    };

    let mut status_counts: BTreeMap<VideoStatus, usize> =
        VideoStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for video in videos {
        *status_counts.entry(video.status).or_default() += 1;
    }

    DashboardTotals {
        total_subscribers,
        total_views,
        total_videos,
        avg_views_per_video,
        status_counts,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCount {
    pub channel_id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionHistory {
    pub total: usize,
    pub videos: Vec<VideoProject>,
    pub by_channel: Vec<ChannelCount>,
}

/// Published videos matching the filters, most recently completed first.
pub fn completed_videos(
    videos: Vec<VideoProject>,
    channel_filter: Option<&str>,
    search: Option<&str>,
) -> Vec<VideoProject> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();

    let mut done: Vec<VideoProject> = videos
        .into_iter()
        .filter(|v| v.status == VideoStatus::Published)
        .filter(|v| selects(channel_filter, &v.channel_id))
        .filter(|v| needle.is_empty() || v.title.to_lowercase().contains(&needle))
        .collect();

    done.sort_by_key(|v| std::cmp::Reverse(v.completion_date.unwrap_or(0)));
    done
}

pub fn production_history(
    channels: &[Channel],
    videos: Vec<VideoProject>,
    channel_filter: Option<&str>,
    search: Option<&str>,
) -> ProductionHistory {
    let videos = completed_videos(videos, channel_filter, search);

    let mut by_channel: Vec<ChannelCount> = channels
        .iter()
        .map(|c| ChannelCount {
            channel_id: c.id.clone(),
            name: c.name.clone(),
            count: videos.iter().filter(|v| v.channel_id == c.id).count(),
        })
        .collect();
    by_channel.sort_by_key(|c| std::cmp::Reverse(c.count));

    ProductionHistory {
        total: videos.len(),
        videos,
        by_channel,
    }
}

pub const HISTORY_CSV_HEADER: &str = "Title,Channel,Completion Date,Priority,Final Status";

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn format_completion(millis: Option<i64>) -> String {
    millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// CSV rendering of [`completed_videos`] output, header included.
pub fn history_csv(channels: &[Channel], videos: &[VideoProject]) -> String {
    let lookup = channel_lookup(channels);

    let mut lines = vec![HISTORY_CSV_HEADER.to_string()];
    for video in videos {
        let channel_name = lookup
            .get(video.channel_id.as_str())
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");

        lines.push(
            [
                quote(&video.title),
                quote(channel_name),
                format_completion(video.completion_date),
                format!("{:.0}", video.score()),
                video.status.to_string(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}
