//! Batch error types.

use thiserror::Error;
use vgen_client::ApiError;

/// Errors produced while parsing the raw batch input. These are fatal to
/// the run before it starts and are never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A batch prompt (`infos`) was supplied but no batch of references
    /// resolved.
    #[error("batch prompt without batch references")]
    BatchPromptWithoutBatchRefs,

    /// Single mode requires a non-empty prompt.
    #[error("missing prompt")]
    MissingPrompt,
}

/// Errors produced by the task submitter. Scoped to one entry; the batch
/// always continues (or is stopped) — nothing here is fatal to the run.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Cancellation was requested before an attempt or wait.
    #[error("stopped by user")]
    Stopped,

    /// All attempts were used up; carries the last underlying error.
    #[error("task creation failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ApiError,
    },
}
