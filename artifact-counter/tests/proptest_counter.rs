//! Property-based tests: inc_get feedback and concurrent serialization.

use artifact_core::Value;
use artifact_counter::COUNT;
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #[test]
    fn inc_get_feedback_is_count_before_plus_delta(
        initial in -1_000_000i64..1_000_000,
        deltas in prop::collection::vec(-1_000i64..1_000, 1..20)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let counter = artifact_counter::create(initial).await.unwrap();
            for delta in deltas {
                let before = counter.property(COUNT).await.unwrap().value.as_int().unwrap();
                let invocation = counter.invoke("inc_get", &[Value::Int(delta)]).await.unwrap();
                let after = counter.property(COUNT).await.unwrap().value.as_int().unwrap();

                assert_eq!(invocation.feedback, Some(Value::Int(before + delta)));
                assert_eq!(after, before + delta);
            }
        });
    }

    #[test]
    fn concurrent_invocations_equal_some_total_order(
        deltas in prop::collection::vec(-100i64..100, 1..30)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();
        rt.block_on(async {
            let counter = Arc::new(artifact_counter::create(0).await.unwrap());
            let mut events = counter.subscribe();

            let mut handles = Vec::new();
            for delta in deltas.iter().copied() {
                let counter = Arc::clone(&counter);
                handles.push(tokio::spawn(async move {
                    counter.invoke("inc_get", &[Value::Int(delta)]).await.unwrap()
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            let total: i64 = deltas.iter().sum();
            let snapshot = counter.property(COUNT).await.unwrap();
            assert_eq!(snapshot.value, Value::Int(total));
            assert_eq!(snapshot.version, deltas.len() as u64);

            // Replaying the observed order from 0 reproduces every update.
            let mut running = 0i64;
            let mut version = 0u64;
            while let Ok(event) = events.try_recv() {
                let update = event.as_update().unwrap();
                version += 1;
                assert_eq!(update.version, version);
                let step = update.value.as_int().unwrap() - running;
                assert!(deltas.contains(&step));
                running = update.value.as_int().unwrap();
            }
            assert_eq!(running, total);
            assert_eq!(version, deltas.len() as u64);
        });
    }
}
