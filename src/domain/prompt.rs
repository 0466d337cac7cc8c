use serde::{Deserialize, Serialize};

pub const UNTITLED_PROMPT: &str = "Untitled";
pub const GENERAL_CATEGORY: &str = "General";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedPrompt {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub last_used: Option<String>,
}

impl SavedPrompt {
    /// Blank titles and categories get the library placeholders.
    pub fn fill_defaults(&mut self) {
        if self.title.trim().is_empty() {
            self.title = UNTITLED_PROMPT.to_string();
        }
        if self.category.trim().is_empty() {
            self.category = GENERAL_CATEGORY.to_string();
        }
    }
}
