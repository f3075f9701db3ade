//! Work items parsed from raw batch input.

use serde::{Deserialize, Serialize};

/// One unit of batch input.
///
/// Identity is the item's position in the ordered input list; items are
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Source reference (e.g. an image locator). May be empty in single
    /// mode for pure text-to-video generation.
    pub source_ref: String,
    /// Generation prompt. May be empty for batch items that fall back to
    /// a shared prompt.
    pub prompt: String,
    /// Optional parallel audio reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
}

impl WorkItem {
    /// Create a new work item.
    pub fn new(source_ref: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            prompt: prompt.into(),
            audio_ref: None,
        }
    }

    /// Attach an audio reference.
    pub fn with_audio(mut self, audio_ref: impl Into<String>) -> Self {
        self.audio_ref = Some(audio_ref.into());
        self
    }
}
