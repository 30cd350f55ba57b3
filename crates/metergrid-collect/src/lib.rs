//! metergrid-collect — collector capability model and built-in sources.
//!
//! A [`Collector`] is either a terminal callable over the work's outcome
//! or a pair of optional start/end hooks. Collectors register by name in
//! a [`Registry`], which classifies them into ordered pre/post lists
//! that the orchestrator captures once per wrapper.
//!
//! # Architecture
//!
//! ```text
//! Registry (insertion-ordered)
//!   │
//!   └── classify() ──→ pre:  [(name, StartHook)]  — run before the work
//!                      post: [(name, EndHook)]    — run on the outcome
//!
//! Built-in sources: time, cpu, memory, coldstart, error
//! ```
//!
//! Synchronous closures become hooks through blanket impls; a collector
//! that needs to suspend implements [`StartFn`] / [`EndFn`] on its own
//! type and builds the [`Collector`] variants directly.

pub mod coldstart;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod time;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use metergrid_core::Outcome;

/// Future returned by collector hooks.
pub type HookFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Pre-execution capability: observes the invocation params before the
/// work runs. Side effects only; an error aborts the invocation.
pub trait StartFn: Send + Sync {
    fn call<'a>(&'a self, params: &'a Value) -> HookFuture<'a, ()>;
}

/// Post-execution capability: observes the outcome and produces a metric
/// value tree. An error is isolated by the orchestrator — logged and
/// skipped, never surfaced.
pub trait EndFn: Send + Sync {
    fn call<'a>(&'a self, outcome: &'a Outcome) -> HookFuture<'a, Value>;
}

impl<F> StartFn for F
where
    F: Fn(&Value) -> Result<()> + Send + Sync,
{
    fn call<'a>(&'a self, params: &'a Value) -> HookFuture<'a, ()> {
        let result = self(params);
        Box::pin(async move { result })
    }
}

impl<F> EndFn for F
where
    F: Fn(&Outcome) -> Result<Value> + Send + Sync,
{
    fn call<'a>(&'a self, outcome: &'a Outcome) -> HookFuture<'a, Value> {
        let result = self(outcome);
        Box::pin(async move { result })
    }
}

/// Shared handle to a pre-execution hook.
pub type StartHook = Arc<dyn StartFn>;

/// Shared handle to a post-execution hook.
pub type EndHook = Arc<dyn EndFn>;

/// A plug-in metric producer.
#[derive(Clone)]
pub enum Collector {
    /// A single callable over the outcome.
    Terminal(EndHook),
    /// Any combination of pre/post hooks. Both `None` is valid and
    /// classifies into neither list.
    Hooks {
        start: Option<StartHook>,
        end: Option<EndHook>,
    },
}

impl Collector {
    /// Terminal collector from a synchronous closure.
    pub fn terminal<F>(f: F) -> Self
    where
        F: Fn(&Outcome) -> Result<Value> + Send + Sync + 'static,
    {
        Collector::Terminal(Arc::new(f))
    }

    /// Start-only collector from a synchronous closure.
    pub fn on_start<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<()> + Send + Sync + 'static,
    {
        Collector::Hooks {
            start: Some(Arc::new(f)),
            end: None,
        }
    }

    /// End-only collector from a synchronous closure.
    pub fn on_end<F>(f: F) -> Self
    where
        F: Fn(&Outcome) -> Result<Value> + Send + Sync + 'static,
    {
        Collector::Hooks {
            start: None,
            end: Some(Arc::new(f)),
        }
    }

    /// Start/end pair from synchronous closures.
    pub fn start_end<S, E>(start: S, end: E) -> Self
    where
        S: Fn(&Value) -> Result<()> + Send + Sync + 'static,
        E: Fn(&Outcome) -> Result<Value> + Send + Sync + 'static,
    {
        Collector::Hooks {
            start: Some(Arc::new(start)),
            end: Some(Arc::new(end)),
        }
    }

    fn start_hook(&self) -> Option<StartHook> {
        match self {
            Collector::Terminal(_) => None,
            Collector::Hooks { start, .. } => start.clone(),
        }
    }

    fn end_hook(&self) -> Option<EndHook> {
        match self {
            Collector::Terminal(end) => Some(end.clone()),
            Collector::Hooks { end, .. } => end.clone(),
        }
    }
}

/// Insertion-ordered collector registry.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Vec<(String, Collector)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector under a name.
    ///
    /// Re-registering an existing name replaces the collector in place,
    /// keeping its original position in the order.
    pub fn register(&mut self, name: impl Into<String>, collector: Collector) -> &mut Self {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = collector;
        } else {
            self.entries.push((name, collector));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split the registry into ordered pre/post call lists.
    ///
    /// A collector appears in `pre` iff it exposes a start hook, and in
    /// `post` iff it is terminal or exposes an end hook; one with both
    /// appears in both lists under the same name. A `Hooks` entry with
    /// neither is excluded from both. Both lists preserve registration
    /// order.
    pub fn classify(&self) -> (Vec<(String, StartHook)>, Vec<(String, EndHook)>) {
        let mut pre = Vec::new();
        let mut post = Vec::new();
        for (name, collector) in &self.entries {
            if let Some(start) = collector.start_hook() {
                pre.push((name.clone(), start));
            }
            if let Some(end) = collector.end_hook() {
                post.push((name.clone(), end));
            }
        }
        (pre, post)
    }
}
