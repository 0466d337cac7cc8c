//! Documents stored in the planner's collections.

pub mod channel;
pub mod prompt;
pub mod status;
pub mod video;

pub use channel::{Channel, UploadDay};
pub use prompt::SavedPrompt;
pub use status::VideoStatus;
pub use video::{ContentCategory, VideoProject};
