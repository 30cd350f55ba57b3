//! Error-flag collector.

use serde_json::json;

use metergrid_core::Outcome;

use crate::Collector;

/// Terminal collector emitting `1` when the outcome carries an error,
/// else `0`.
///
/// A failure outcome counts, as does a success value that is an object
/// with a non-null `error` key — handlers report application errors that
/// way without failing the invocation.
pub fn collector() -> Collector {
    Collector::terminal(|outcome| Ok(json!(u8::from(is_error(outcome)))))
}

fn is_error(outcome: &Outcome) -> bool {
    match outcome {
        Outcome::Failure(_) => true,
        Outcome::Success(value) => matches!(value.get("error"), Some(v) if !v.is_null()),
    }
}
