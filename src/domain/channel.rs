use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Value used for a prioritization input that was never set.
pub const DEFAULT_PRIORITY_INPUT: i32 = 5;
pub const MIN_PRIORITY_INPUT: i32 = 1;
pub const MAX_PRIORITY_INPUT: i32 = 10;

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UploadDay {
    #[serde(alias = "Segunda")]
    Monday,
    #[serde(alias = "Terça")]
    Tuesday,
    #[serde(alias = "Quarta")]
    Wednesday,
    #[serde(alias = "Quinta")]
    Thursday,
    #[serde(alias = "Sexta")]
    Friday,
    #[serde(alias = "Sábado")]
    Saturday,
    #[serde(alias = "Domingo")]
    Sunday,
}

impl UploadDay {
    pub const ALL: [UploadDay; 7] = [
        UploadDay::Monday,
        UploadDay::Tuesday,
        UploadDay::Wednesday,
        UploadDay::Thursday,
        UploadDay::Friday,
        UploadDay::Saturday,
        UploadDay::Sunday,
    ];

    pub fn of(date: NaiveDate) -> UploadDay {
        match date.weekday() {
            chrono::Weekday::Mon => UploadDay::Monday,
            chrono::Weekday::Tue => UploadDay::Tuesday,
            chrono::Weekday::Wed => UploadDay::Wednesday,
            chrono::Weekday::Thu => UploadDay::Thursday,
            chrono::Weekday::Fri => UploadDay::Friday,
            chrono::Weekday::Sat => UploadDay::Saturday,
            chrono::Weekday::Sun => UploadDay::Sunday,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub channel_url: Option<String>,
    pub avatar_url: Option<String>,
    pub total_subscribers: i64,
    pub total_views: i64,
    pub total_videos: i64,
    pub upload_schedule: Vec<UploadDay>,
    pub upload_time: String,
    pub is_monetized: Option<bool>,
    pub avg_duration: Option<String>,
    pub videos_per_week: Option<i32>,
    pub title_patterns: Option<String>,
    pub theme_analysis: Option<String>,
    pub strategy_notes: Option<String>,
    pub audience_persona: Option<String>,
    pub content_tone: Option<String>,
    pub growth_potential: Option<i32>,
    pub production_ease: Option<i32>,
}

impl Channel {
    pub fn growth_potential(&self) -> i32 {
        normalize_input(self.growth_potential)
    }

    pub fn production_ease(&self) -> i32 {
        normalize_input(self.production_ease)
    }

    pub fn is_monetized(&self) -> bool {
        self.is_monetized.unwrap_or(false)
    }

    /// Rewrites the stored prioritization inputs into their effective range.
    pub fn clamp_priority_inputs(&mut self) {
        self.growth_potential = Some(self.growth_potential());
        self.production_ease = Some(self.production_ease());
    }
}

// A stored zero counts as unset, the same as a missing field.
fn normalize_input(value: Option<i32>) -> i32 {
    match value {
        None | Some(0) => DEFAULT_PRIORITY_INPUT,
        Some(v) => v.clamp(MIN_PRIORITY_INPUT, MAX_PRIORITY_INPUT),
    }
}
