//! Shared data models for the Vgen batch video generator.
//!
//! This crate provides Serde-serializable types for:
//! - Work items parsed from raw batch input
//! - Per-item batch execution records and their status lifecycle
//! - Generation options (aspect ratio, output size)
//! - Success-only export rows

pub mod entry;
pub mod export;
pub mod item;
pub mod options;

// Re-export common types
pub use entry::{BatchEntry, BatchStatus};
pub use export::ExportEntry;
pub use item::WorkItem;
pub use options::{AspectRatio, GenerationOptions, OptionParseError, VideoSize};
