//! End-to-end pipeline tests over the built-in collectors.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use metergrid_collect::{Registry, coldstart, error, time};
use metergrid_core::Identity;
use metergrid_sink::MemorySink;
use metergrid_wrap::{Meter, work};

fn identity() -> Arc<Identity> {
    Arc::new(Identity {
        namespace: "ns".to_string(),
        action_name: "/ns/act".to_string(),
        activation_id: "a1".to_string(),
    })
}

#[tokio::test]
async fn built_in_collectors_flow_through_the_pipeline() {
    let sink = Arc::new(MemorySink::new());
    let mut registry = Registry::new();
    registry.register("time", time::collector());
    registry.register("coldstart", coldstart::collector());
    registry.register("error", error::collector());

    let meter = Meter::builder()
        .registry(registry)
        .identity(identity())
        .sink(sink.clone())
        .build();

    let wrapped = meter.wrap(work(|params| async move {
        tokio::time::sleep(Duration::from_millis(25)).await;
        Ok(params)
    }));

    wrapped(json!({ "hello": "world" })).await.unwrap();

    let records = sink.records();
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "ns.act.a1.time.start",
            "ns.act.a1.time.end",
            "ns.act.a1.time.duration",
            "ns.act.a1.coldstart",
            "ns.act.a1.error",
        ]
    );

    let find = |suffix: &str| {
        records
            .iter()
            .find(|r| r.name.ends_with(suffix))
            .unwrap_or_else(|| panic!("no record for {suffix}"))
            .value
    };
    assert!(find("time.duration") >= 20.0);
    assert_eq!(find("coldstart"), 1.0);
    assert_eq!(find("error"), 0.0);

    // A second invocation through the same wrapper is a warm start.
    wrapped(json!({})).await.unwrap();
    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    let cold = batches[1]
        .iter()
        .find(|r| r.name.ends_with("coldstart"))
        .unwrap()
        .value;
    assert_eq!(cold, 0.0);
}

#[tokio::test]
async fn failing_work_is_metered_and_returned() {
    let sink = Arc::new(MemorySink::new());
    let mut registry = Registry::new();
    registry.register("error", error::collector());

    let meter = Meter::builder()
        .registry(registry)
        .identity(identity())
        .sink(sink.clone())
        .build();

    let wrapped = meter.wrap(work(|_| async { Err(anyhow::anyhow!("backend gone")) }));

    let outcome = wrapped(json!({})).await.unwrap();
    assert!(outcome.is_failure());
    assert_eq!(outcome.error().unwrap().to_string(), "backend gone");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "ns.act.a1.error");
    assert_eq!(records[0].value, 1.0);
}
