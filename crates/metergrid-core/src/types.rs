//! Domain types for the metergrid pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// A single normalized metric sample.
///
/// This is the sole artifact crossing the sink boundary. `name` is a
/// dot-joined path (label prefix, collector name, nested keys); `value`
/// is always finite; every record in one invocation's batch carries the
/// same timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    pub name: String,
    pub value: f64,
    /// Unix timestamp in whole seconds.
    pub timestamp: u64,
}

/// Result of running the wrapped work.
///
/// The orchestrated call hands this back to the caller verbatim:
/// instrumentation never converts a success into a failure, swallows an
/// error, or substitutes a different one.
#[derive(Debug)]
pub enum Outcome {
    /// The work resolved with this value.
    Success(Value),
    /// The work failed; the error is carried, not re-raised.
    Failure(anyhow::Error),
}

impl Outcome {
    /// The resolved value, if the work succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// The carried error, if the work failed.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }
}

/// Unix timestamp in whole seconds.
pub fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
