//! Value-tree flattening.
//!
//! Collectors hand back arbitrarily shaped value trees; this module
//! turns them into flat, uniquely named scalar records.

use serde_json::Value;

use crate::types::MetricRecord;

/// Nesting depth beyond which values are dropped rather than recursed
/// into. `serde_json::Value` is acyclic by construction, so this caps
/// stack depth for pathological inputs, nothing more.
const MAX_DEPTH: usize = 64;

/// Flatten one collector's value tree into scalar records.
///
/// A finite number becomes a single record named `prefix`; an object is
/// recursed into per key in iteration order, appending `.key` to the
/// name; every other shape (null, bool, string, array, non-finite
/// number) yields nothing. Total and order-preserving: records come out
/// in key encounter order and the traversal never fails, whatever the
/// input shape.
pub fn flatten(prefix: &str, value: &Value, timestamp: u64) -> Vec<MetricRecord> {
    let mut records = Vec::new();
    merge(&mut records, prefix, value, timestamp, 0);
    records
}

fn merge(records: &mut Vec<MetricRecord>, name: &str, value: &Value, timestamp: u64, depth: usize) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                if v.is_finite() {
                    records.push(MetricRecord {
                        name: name.to_string(),
                        value: v,
                        timestamp,
                    });
                }
            }
        }
        Value::Object(map) => {
            for (key, inner) in map {
                merge(records, &format!("{name}.{key}"), inner, timestamp, depth + 1);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_leaf_becomes_one_record() {
        let records = flatten("p", &json!(2.5), 99);
        assert_eq!(
            records,
            vec![MetricRecord {
                name: "p".to_string(),
                value: 2.5,
                timestamp: 99,
            }]
        );
    }

    #[test]
    fn nested_objects_flatten_in_key_order() {
        let value = json!({ "a": 2.0, "b": { "c": 3.0, "d": 5 }, "d": { "e": { "f": 4 } } });
        let records = flatten("p", &value, 7);

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["p.a", "p.b.c", "p.b.d", "p.d.e.f"]);

        let values: Vec<_> = records.iter().map(|r| r.value).collect();
        assert_eq!(values, [2.0, 3.0, 5.0, 4.0]);

        assert!(records.iter().all(|r| r.timestamp == 7));
    }

    #[test]
    fn invalid_shapes_yield_no_records() {
        for value in [
            json!(null),
            json!(true),
            json!("hello"),
            json!([1, 2, 3]),
            json!({}),
        ] {
            assert!(
                flatten("p", &value, 0).is_empty(),
                "expected no records for {value}"
            );
        }
    }

    #[test]
    fn valid_siblings_of_dropped_leaves_survive() {
        let value = json!({ "wrong": "blah", "correct": 2.0 });
        let records = flatten("semi", &value, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "semi.correct");
        assert_eq!(records[0].value, 2.0);
    }

    #[test]
    fn key_order_is_insertion_order_not_alphabetical() {
        let value = json!({ "z": 1, "a": 2 });
        let names: Vec<_> = flatten("p", &value, 0)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["p.z", "p.a"]);
    }

    #[test]
    fn deep_nesting_under_the_cap_is_kept() {
        let mut value = json!(1);
        for _ in 0..10 {
            value = json!({ "k": value });
        }
        assert_eq!(flatten("p", &value, 0).len(), 1);
    }

    #[test]
    fn nesting_past_the_cap_is_dropped() {
        let mut value = json!(1);
        for _ in 0..(MAX_DEPTH + 10) {
            value = json!({ "k": value });
        }
        assert!(flatten("p", &value, 0).is_empty());
    }
}
