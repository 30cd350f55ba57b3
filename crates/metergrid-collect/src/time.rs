//! Wall-clock timing collector.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::Collector;

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Start/end pair measuring wall-clock time across the wrapped work.
///
/// Emits `{ start, end, duration }` in epoch milliseconds. The begin
/// slot is shared by every invocation observing this collector instance;
/// overlapping invocations see the most recent start.
pub fn collector() -> Collector {
    let begin = Arc::new(AtomicU64::new(0));
    let begin_end = begin.clone();

    Collector::start_end(
        move |_| {
            begin.store(epoch_millis(), Ordering::Relaxed);
            Ok(())
        },
        move |_| {
            let started = begin_end.load(Ordering::Relaxed);
            let ended = epoch_millis();
            Ok(json!({
                "start": started,
                "end": ended,
                "duration": ended.saturating_sub(started),
            }))
        },
    )
}
