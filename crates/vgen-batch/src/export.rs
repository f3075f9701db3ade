//! Result aggregator.
//!
//! Pure projection of the entry table into the success-only export view.
//! Recomputed on demand; never mutates state.

use vgen_models::{BatchEntry, BatchStatus, ExportEntry};

/// Project the ordered success-only result set.
///
/// An entry is included only when its status is Succeeded AND it carries
/// a non-empty result locator — a terminal success must carry a result.
pub fn export_succeeded(entries: &[BatchEntry]) -> Vec<ExportEntry> {
    entries
        .iter()
        .filter(|entry| entry.status == BatchStatus::Succeeded)
        .filter_map(|entry| {
            let video_url = entry.result_ref.clone().filter(|r| !r.is_empty())?;
            Some(ExportEntry {
                text: entry.prompt.clone(),
                audio_url: entry.audio_ref.clone(),
                video_url,
            })
        })
        .collect()
}

/// Serialize the success-only export as pretty JSON.
pub fn export_json(entries: &[BatchEntry]) -> String {
    serde_json::to_string_pretty(&export_succeeded(entries)).unwrap_or_else(|_| "[]".to_string())
}
