//! metergrid-wrap — the wrapping orchestrator.
//!
//! [`Meter`] wraps a unit of work with metric instrumentation: start
//! hooks observe the params, the work runs, end hooks observe the
//! outcome, the resulting value trees are flattened into labeled
//! records, and the batch goes to the sink — while the caller gets the
//! work's own outcome back untouched.
//!
//! # Architecture
//!
//! ```text
//! params
//!   │
//!   ├── start hooks (classification order, each awaited in turn)
//!   ▼
//! work(params) ──→ Outcome ───────────────▶ returned to the caller
//!   │
//!   ├── end hooks (classification order) ──→ value trees
//!   ├── label + flatten ──→ MetricRecord batch (one timestamp)
//!   ▼
//! sink.save(batch) — failures logged, never surfaced
//! ```
//!
//! Each wrapper owns an immutable snapshot of its collector lists,
//! taken once at wrap time; registering collectors afterwards requires
//! wrapping again. Independent invocations of one wrapper may run
//! concurrently — the snapshot is the only shared state.

pub mod error;

pub use error::WrapError;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use metergrid_collect::{Collector, Registry};
use metergrid_core::{
    EnvIdentity, IdentitySource, MeterConfig, MetricRecord, Outcome, epoch_secs, flatten, label,
};
use metergrid_sink::MetricSink;

/// Future returned by the wrapped work and by orchestrated calls.
pub type WorkFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// The unit of work being instrumented.
pub type Work = Arc<dyn Fn(Value) -> WorkFuture<anyhow::Result<Value>> + Send + Sync>;

/// An orchestrated unit of work, as produced by [`Meter::wrap`].
pub type Wrapped = Arc<dyn Fn(Value) -> WorkFuture<Result<Outcome, WrapError>> + Send + Sync>;

/// Lift an async closure into a [`Work`].
pub fn work<F, Fut>(f: F) -> Work
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |params| Box::pin(f(params)))
}

/// Immutable instrumentation context; every wrapper built from it shares
/// the same registry snapshot, identity source, sink, and config.
pub struct Meter {
    registry: Registry,
    identity: Arc<dyn IdentitySource>,
    sink: Option<Arc<dyn MetricSink>>,
    config: MeterConfig,
}

/// Builder for [`Meter`].
///
/// Defaults: empty registry, env-var identity, no sink, default config.
pub struct MeterBuilder {
    registry: Registry,
    identity: Arc<dyn IdentitySource>,
    sink: Option<Arc<dyn MetricSink>>,
    config: MeterConfig,
}

impl MeterBuilder {
    /// Register a single collector.
    pub fn collector(mut self, name: impl Into<String>, collector: Collector) -> Self {
        self.registry.register(name, collector);
        self
    }

    /// Replace the whole registry.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn identity(mut self, source: Arc<dyn IdentitySource>) -> Self {
        self.identity = source;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn MetricSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(mut self, config: MeterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Meter {
        Meter {
            registry: self.registry,
            identity: self.identity,
            sink: self.sink,
            config: self.config,
        }
    }
}

impl Meter {
    pub fn builder() -> MeterBuilder {
        MeterBuilder {
            registry: Registry::new(),
            identity: Arc::new(EnvIdentity),
            sink: None,
            config: MeterConfig::default(),
        }
    }

    /// Wrap a unit of work.
    ///
    /// Classification runs here, once: the wrapper captures the
    /// registry's pre/post lists and never looks at the registry again.
    ///
    /// On each invocation the orchestrated call runs every start hook in
    /// order, runs the work (recovering a failure into
    /// [`Outcome::Failure`]), runs every end hook in order against the
    /// outcome, flattens the collected value trees into one record batch
    /// stamped with a single timestamp, dispatches the batch to the
    /// sink, and returns the outcome verbatim. A failing start hook
    /// aborts with [`WrapError::PreCollector`] before the work runs; a
    /// failing end hook or sink is logged and skipped.
    pub fn wrap(&self, work: Work) -> Wrapped {
        let (pre, post) = self.registry.classify();
        let pre = Arc::new(pre);
        let post = Arc::new(post);
        let identity = self.identity.clone();
        let sink = self.sink.clone();
        let config = self.config.clone();

        Arc::new(move |params: Value| {
            let work = work.clone();
            let pre = pre.clone();
            let post = post.clone();
            let identity = identity.clone();
            let sink = sink.clone();
            let config = config.clone();

            Box::pin(async move {
                for (name, start) in pre.iter() {
                    start
                        .call(&params)
                        .await
                        .map_err(|source| WrapError::PreCollector {
                            name: name.clone(),
                            source,
                        })?;
                }

                let outcome = match work(params).await {
                    Ok(value) => Outcome::Success(value),
                    Err(error) => Outcome::Failure(error),
                };

                let timestamp = epoch_secs();
                let identity = identity.identity();
                let mut records: Vec<MetricRecord> = Vec::new();
                for (name, end) in post.iter() {
                    match end.call(&outcome).await {
                        Ok(value) => {
                            let prefix = label(&identity, &config, name);
                            records.extend(flatten(&prefix, &value, timestamp));
                        }
                        Err(error) => {
                            warn!(collector = %name, error = %error, "post-collector failed, skipping");
                        }
                    }
                }

                if let Some(sink) = &sink {
                    debug!(records = records.len(), "dispatching metric batch");
                    if let Err(error) = sink.save(&records).await {
                        warn!(error = %error, "metric sink save failed");
                    }
                }

                Ok(outcome)
            })
        })
    }
}
