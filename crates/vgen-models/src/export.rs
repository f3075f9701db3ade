//! Success-only export rows.

use serde::{Deserialize, Serialize};

/// One row of the success-only export.
///
/// Field names match the JSON keys consumed by downstream tooling:
/// `text`, `audio_url`, `video_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// The effective prompt the video was generated from
    pub text: String,
    /// Parallel audio reference, if one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Result locator returned by the remote job
    pub video_url: String,
}
