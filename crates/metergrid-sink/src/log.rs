//! Line-oriented log sink.

use tracing::info;

use metergrid_core::MetricRecord;

use crate::{MetricSink, SaveFuture};

/// Render one record as a `METRIC <name> <value> <timestamp>` line.
///
/// Integral values print without a fractional part, so downstream line
/// parsers see `100`, not `100.0`.
pub fn format_record(record: &MetricRecord) -> String {
    if record.value.fract() == 0.0 {
        format!(
            "METRIC {} {} {}",
            record.name, record.value as i64, record.timestamp
        )
    } else {
        format!("METRIC {} {} {}", record.name, record.value, record.timestamp)
    }
}

/// Sink that emits each record as one log line on the
/// `metergrid::metrics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MetricSink for LogSink {
    fn save<'a>(&'a self, records: &'a [MetricRecord]) -> SaveFuture<'a> {
        Box::pin(async move {
            for record in records {
                info!(target: "metergrid::metrics", "{}", format_record(record));
            }
            Ok(())
        })
    }
}
