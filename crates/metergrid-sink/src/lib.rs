//! metergrid-sink — metric record consumers.
//!
//! The orchestrator hands each invocation's full record batch to a
//! [`MetricSink`]. Delivery is best-effort: the orchestrator catches and
//! logs `save` failures and never retries, so sinks are free to fail
//! without affecting the wrapped work's caller.

pub mod log;
pub mod memory;

pub use log::{LogSink, format_record};
pub use memory::MemorySink;

use std::future::Future;
use std::pin::Pin;

use metergrid_core::MetricRecord;

/// Future returned by [`MetricSink::save`].
pub type SaveFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// External consumer of metric record batches.
pub trait MetricSink: Send + Sync {
    /// Persist one invocation's batch. The batch may be empty.
    fn save<'a>(&'a self, records: &'a [MetricRecord]) -> SaveFuture<'a>;
}
