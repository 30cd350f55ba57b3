//! Process memory collector.

use anyhow::anyhow;
use serde_json::json;
use sysinfo::System;

use crate::Collector;

/// Terminal collector sampling current process memory.
///
/// Emits `{ rss, virtual }` in bytes. A failed sample surfaces as a
/// hook error, which the orchestrator logs and skips.
pub fn collector() -> Collector {
    Collector::terminal(|_| {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| anyhow!("current pid unavailable: {e}"))?;
        let mut system = System::new();
        if !system.refresh_process(pid) {
            return Err(anyhow!("process {pid} not found"));
        }
        let process = system
            .process(pid)
            .ok_or_else(|| anyhow!("process {pid} not found"))?;
        Ok(json!({
            "rss": process.memory(),
            "virtual": process.virtual_memory(),
        }))
    })
}
