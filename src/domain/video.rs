use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::status::VideoStatus;

/// Kind of production material attached to a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentCategory {
    Prompt,
    #[serde(alias = "Roteiro")]
    Script,
    #[serde(alias = "Descrição")]
    Description,
    #[serde(rename = "SEO Tags", alias = "Tags SEO")]
    SeoTags,
    Hashtags,
    #[serde(alias = "Observação")]
    Note,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoProject {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub status: VideoStatus,
    #[serde(deserialize_with = "lenient_date")]
    pub publish_date: Option<NaiveDate>,
    /// Milliseconds since the Unix epoch.
    pub completion_date: Option<i64>,
    pub content_details: BTreeMap<ContentCategory, String>,
    pub tags: Vec<String>,
    pub priority_score: Option<f64>,
}

impl VideoProject {
    /// Cached score, with a missing value ranking as zero.
    pub fn score(&self) -> f64 {
        self.priority_score.unwrap_or(0.0)
    }
}

// Blank or malformed dates come from hand-edited documents; they read as "no date".
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}
