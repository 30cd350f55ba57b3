//! In-memory sink.

use std::sync::Mutex;

use anyhow::anyhow;

use metergrid_core::MetricRecord;

use crate::{MetricSink, SaveFuture};

/// Buffers every saved batch in memory, in dispatch order.
///
/// Tests use it to observe exactly what the orchestrator dispatched;
/// it also serves as a building block for batching adapters.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<MetricRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches saved so far, in dispatch order.
    pub fn batches(&self) -> Vec<Vec<MetricRecord>> {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// All records across batches, flattened in dispatch order.
    pub fn records(&self) -> Vec<MetricRecord> {
        self.batches().into_iter().flatten().collect()
    }
}

impl MetricSink for MemorySink {
    fn save<'a>(&'a self, records: &'a [MetricRecord]) -> SaveFuture<'a> {
        Box::pin(async move {
            self.batches
                .lock()
                .map_err(|_| anyhow!("memory sink poisoned"))?
                .push(records.to_vec());
            Ok(())
        })
    }
}
