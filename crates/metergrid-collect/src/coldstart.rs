//! Cold-start detection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;

use crate::Collector;

/// Terminal collector emitting `1` for the first invocation this
/// instance observes and `0` for every one after it.
pub fn collector() -> Collector {
    let cold = Arc::new(AtomicBool::new(true));
    Collector::terminal(move |_| {
        let first = cold.swap(false, Ordering::Relaxed);
        Ok(json!(u8::from(first)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use metergrid_core::Outcome;

    async fn sample(post: &[(String, crate::EndHook)]) -> serde_json::Value {
        (post[0].1)
            .call(&Outcome::Success(json!({})))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn flags_only_the_first_invocation() {
        let mut registry = Registry::new();
        registry.register("coldstart", collector());
        let (_, post) = registry.classify();

        assert_eq!(sample(&post).await, json!(1));
        assert_eq!(sample(&post).await, json!(0));
        assert_eq!(sample(&post).await, json!(0));
    }

    #[tokio::test]
    async fn instances_are_independent() {
        let mut first = Registry::new();
        first.register("coldstart", collector());
        let (_, first_post) = first.classify();

        let mut second = Registry::new();
        second.register("coldstart", collector());
        let (_, second_post) = second.classify();

        assert_eq!(sample(&first_post).await, json!(1));
        assert_eq!(sample(&first_post).await, json!(0));
        // A fresh instance is cold again.
        assert_eq!(sample(&second_post).await, json!(1));
    }
}
