//! Process CPU usage collector.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use serde_json::json;
use sysinfo::{Pid, System};

use crate::Collector;

/// Start/end pair measuring process CPU usage across the wrapped work.
///
/// The start hook primes process CPU accounting; the end hook emits
/// `{ usage }`, the percent of one core consumed since the start.
/// Sampling failures surface as hook errors, which the orchestrator
/// logs and skips.
pub fn collector() -> Collector {
    let sampler = Arc::new(Mutex::new(System::new()));
    let end_sampler = sampler.clone();

    Collector::start_end(
        move |_| {
            let pid = current_pid()?;
            let mut system = sampler
                .lock()
                .map_err(|_| anyhow!("cpu sampler poisoned"))?;
            system.refresh_process(pid);
            Ok(())
        },
        move |_| {
            let pid = current_pid()?;
            let mut system = end_sampler
                .lock()
                .map_err(|_| anyhow!("cpu sampler poisoned"))?;
            if !system.refresh_process(pid) {
                return Err(anyhow!("process {pid} not found"));
            }
            let usage = system.process(pid).map(|p| p.cpu_usage()).unwrap_or(0.0);
            Ok(json!({ "usage": usage }))
        },
    )
}

fn current_pid() -> anyhow::Result<Pid> {
    sysinfo::get_current_pid().map_err(|e| anyhow!("current pid unavailable: {e}"))
}
