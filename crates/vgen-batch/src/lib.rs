//! Batch video-generation orchestrator.
//!
//! Drives an ordered list of work items through submit → poll against the
//! remote job API, one item in flight at a time:
//!
//! - [`parser`] turns the two raw input fields into a structured work list
//! - [`submit`] creates one remote task with bounded, linear-backoff retries
//! - [`poll`] waits on a submitted task until it reaches a terminal state
//! - [`orchestrator`] sequences the whole batch and owns the entry table
//! - [`export`] projects the success-only result set
//!
//! Cancellation is cooperative: a [`StopToken`] is threaded through every
//! call and checked at each suspension point.

pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod parser;
pub mod poll;
pub mod stop;
pub mod submit;

pub use config::BatchConfig;
pub use error::{ParseError, SubmitError};
pub use export::{export_json, export_succeeded};
pub use orchestrator::{BatchRunner, SingleOutcome};
pub use parser::{parse_input, ParsedInput};
pub use poll::{TaskOutcome, DEFAULT_FAILURE_REASON, STOPPED_BY_USER};
pub use stop::{stop_channel, StopHandle, StopToken};
