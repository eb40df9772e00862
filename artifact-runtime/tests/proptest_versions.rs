//! Property-based tests: per-property version monotonicity.

use artifact_core::Value;
use artifact_runtime::{EventBus, PropertyStore};
use proptest::prelude::*;
use std::sync::Arc;

const NAMES: [&str; 3] = ["a", "b", "c"];

proptest! {
    #[test]
    fn versions_strictly_increase_per_property(
        updates in prop::collection::vec((0usize..3, any::<i64>()), 1..40)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let bus = Arc::new(EventBus::new(64));
            let store = PropertyStore::new(Arc::clone(&bus), 64);
            for name in NAMES {
                store.define(name, Value::Int(0)).await.unwrap();
            }
            let mut events = bus.subscribe();

            let mut expected = [0u64; 3];
            for (idx, value) in &updates {
                let update = store.update(NAMES[*idx], Value::Int(*value)).await.unwrap();
                expected[*idx] += 1;
                assert_eq!(update.version, expected[*idx]);
            }

            // The bus carries every update; per property the versions
            // it reports are 1, 2, 3, ...
            let mut last = [0u64; 3];
            while let Ok(event) = events.try_recv() {
                let update = event.as_update().unwrap();
                let idx = NAMES.iter().position(|n| *n == update.name).unwrap();
                assert_eq!(update.version, last[idx] + 1);
                last[idx] = update.version;
            }
            assert_eq!(last, expected);

            for (idx, name) in NAMES.iter().enumerate() {
                assert_eq!(store.get(name).await.unwrap().version, expected[idx]);
            }
        });
    }
}
