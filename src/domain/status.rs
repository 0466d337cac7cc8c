use serde::{Deserialize, Serialize};

/// Production pipeline stage of a video.
///
/// Declaration order is the pipeline order, so the derived `Ord` gives the
/// "is past stage" comparison used by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VideoStatus {
    #[serde(alias = "Ideia")]
    Idea,
    #[serde(alias = "Roteiro")]
    Scripting,
    #[serde(alias = "Gravando")]
    Filming,
    #[serde(alias = "Editando")]
    Editing,
    #[serde(alias = "Agendado")]
    Scheduled,
    #[serde(alias = "Publicado")]
    Published,
}

impl VideoStatus {
    pub const ALL: [VideoStatus; 6] = [
        VideoStatus::Idea,
        VideoStatus::Scripting,
        VideoStatus::Filming,
        VideoStatus::Editing,
        VideoStatus::Scheduled,
        VideoStatus::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Idea => "Idea",
            VideoStatus::Scripting => "Scripting",
            VideoStatus::Filming => "Filming",
            VideoStatus::Editing => "Editing",
            VideoStatus::Scheduled => "Scheduled",
            VideoStatus::Published => "Published",
        }
    }

    /// Next stage in the pipeline. Published is terminal and maps to itself.
    pub fn advance(self) -> VideoStatus {
        match self {
            VideoStatus::Idea => VideoStatus::Scripting,
            VideoStatus::Scripting => VideoStatus::Filming,
            VideoStatus::Filming => VideoStatus::Editing,
            VideoStatus::Editing => VideoStatus::Scheduled,
            VideoStatus::Scheduled | VideoStatus::Published => VideoStatus::Published,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Published)
    }
}

impl Default for VideoStatus {
    fn default() -> Self {
        VideoStatus::Idea
    }
}

impl std::fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_the_pipeline_in_order() {
        for pair in VideoStatus::ALL.windows(2) {
            assert_eq!(pair[0].advance(), pair[1]);
        }
    }

    #[test]
    fn published_is_terminal() {
        assert_eq!(VideoStatus::Published.advance(), VideoStatus::Published);
        assert!(VideoStatus::Published.is_terminal());
        assert!(!VideoStatus::Scheduled.is_terminal());
    }

    #[test]
    fn ordering_follows_pipeline() {
        assert!(VideoStatus::Idea < VideoStatus::Filming);
        assert!(VideoStatus::Published > VideoStatus::Scheduled);
    }

    #[test]
    fn legacy_portuguese_values_are_accepted() {
        let status: VideoStatus = serde_json::from_str("\"Roteiro\"").unwrap();
        assert_eq!(status, VideoStatus::Scripting);

        let status: VideoStatus = serde_json::from_str("\"Publicado\"").unwrap();
        assert_eq!(status, VideoStatus::Published);
    }

    #[test]
    fn serializes_as_english_name() {
        assert_eq!(
            serde_json::to_string(&VideoStatus::Editing).unwrap(),
            "\"Editing\""
        );
    }
}
