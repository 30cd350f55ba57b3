//! Orchestrator error types.

use thiserror::Error;

/// Errors surfaced by an orchestrated invocation.
///
/// Work failures are not errors here — they come back as
/// [`Outcome::Failure`](metergrid_core::Outcome::Failure). The only
/// failing path is a pre-collector refusing to start the invocation.
#[derive(Debug, Error)]
pub enum WrapError {
    /// A start hook failed before the work ran. Start hooks are not
    /// isolated the way end hooks are: the invocation aborts and the
    /// work never runs.
    #[error("pre-collector '{name}' failed: {source}")]
    PreCollector {
        name: String,
        source: anyhow::Error,
    },
}
