use artifact_core::{ArtifactEvent, ArtifactId, PropertyError, PropertySnapshot, Value};
use artifact_runtime::{EventBus, PropertyStore, SignalChannel};
use std::sync::Arc;

fn store() -> (PropertyStore, Arc<EventBus>) {
    let bus = Arc::new(EventBus::new(16));
    (PropertyStore::new(Arc::clone(&bus), 16), bus)
}

// --- define / get ---

#[tokio::test]
async fn define_then_get_returns_version_zero() {
    let (store, _bus) = store();
    store.define("count", Value::Int(0)).await.unwrap();

    let snapshot = store.get("count").await.unwrap();
    assert_eq!(snapshot, PropertySnapshot::new(Value::Int(0), 0));
}

#[tokio::test]
async fn define_twice_is_duplicate() {
    let (store, _bus) = store();
    store.define("count", Value::Int(0)).await.unwrap();

    let err = store.define("count", Value::Int(9)).await.unwrap_err();
    assert_eq!(err, PropertyError::Duplicate("count".into()));

    // The original value survives.
    assert_eq!(store.get("count").await.unwrap().value, Value::Int(0));
}

#[tokio::test]
async fn get_missing_is_unknown() {
    let (store, _bus) = store();
    let err = store.get("missing").await.unwrap_err();
    assert_eq!(err, PropertyError::Unknown("missing".into()));
}

#[tokio::test]
async fn define_does_not_notify() {
    let (store, bus) = store();
    let mut events = bus.subscribe();

    store.define("count", Value::Int(0)).await.unwrap();

    assert!(events.try_recv().is_err());
}

// --- update ---

#[tokio::test]
async fn update_replaces_value_and_bumps_version() {
    let (store, _bus) = store();
    store.define("count", Value::Int(0)).await.unwrap();

    let update = store.update("count", Value::Int(5)).await.unwrap();
    assert_eq!(update.version, 1);
    assert_eq!(update.value, Value::Int(5));

    let snapshot = store.get("count").await.unwrap();
    assert_eq!(snapshot, PropertySnapshot::new(Value::Int(5), 1));
}

#[tokio::test]
async fn update_missing_is_unknown() {
    let (store, bus) = store();
    let mut events = bus.subscribe();

    let err = store.update("missing", Value::Int(1)).await.unwrap_err();
    assert_eq!(err, PropertyError::Unknown("missing".into()));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn update_may_change_value_kind() {
    let (store, _bus) = store();
    store.define("label", Value::Null).await.unwrap();
    store.update("label", Value::from("ready")).await.unwrap();
    assert_eq!(store.get("label").await.unwrap().value, Value::from("ready"));
}

#[tokio::test]
async fn update_publishes_on_bus() {
    let (store, bus) = store();
    store.define("count", Value::Int(0)).await.unwrap();
    let mut events = bus.subscribe();

    store.update("count", Value::Int(1)).await.unwrap();

    match events.recv().await.unwrap() {
        ArtifactEvent::PropertyUpdated(update) => {
            assert_eq!(update.name, "count");
            assert_eq!(update.value, Value::Int(1));
            assert_eq!(update.version, 1);
        }
        other => panic!("expected a property update, got {other:?}"),
    }
}

#[tokio::test]
async fn versions_are_per_property() {
    let (store, _bus) = store();
    store.define("a", Value::Int(0)).await.unwrap();
    store.define("b", Value::Int(0)).await.unwrap();

    store.update("a", Value::Int(1)).await.unwrap();
    store.update("a", Value::Int(2)).await.unwrap();
    store.update("b", Value::Int(1)).await.unwrap();

    assert_eq!(store.get("a").await.unwrap().version, 2);
    assert_eq!(store.get("b").await.unwrap().version, 1);
}

// --- watch ---

#[tokio::test]
async fn watch_sees_updates_in_version_order() {
    let (store, _bus) = store();
    store.define("count", Value::Int(0)).await.unwrap();
    let mut watch = store.watch("count").await.unwrap();
    assert_eq!(watch.name(), "count");

    for n in 1..=5 {
        store.update("count", Value::Int(n)).await.unwrap();
    }

    for n in 1..=5u64 {
        let update = watch.recv().await.unwrap();
        assert_eq!(update.version, n);
        assert_eq!(update.value, Value::Int(n as i64));
    }
    assert!(watch.try_recv().is_none());
}

#[tokio::test]
async fn watch_only_sees_its_property() {
    let (store, _bus) = store();
    store.define("a", Value::Int(0)).await.unwrap();
    store.define("b", Value::Int(0)).await.unwrap();
    let mut watch = store.watch("a").await.unwrap();

    store.update("b", Value::Int(1)).await.unwrap();
    store.update("a", Value::Int(7)).await.unwrap();

    let update = watch.recv().await.unwrap();
    assert_eq!(update.name, "a");
    assert!(watch.try_recv().is_none());
}

#[tokio::test]
async fn watch_missing_is_unknown() {
    let (store, _bus) = store();
    assert!(matches!(
        store.watch("missing").await,
        Err(PropertyError::Unknown(_))
    ));
}

#[tokio::test]
async fn lagging_watch_skips_to_oldest_buffered() {
    let bus = Arc::new(EventBus::new(16));
    let store = PropertyStore::new(bus, 2);
    store.define("count", Value::Int(0)).await.unwrap();
    let mut watch = store.watch("count").await.unwrap();

    for n in 1..=5 {
        store.update("count", Value::Int(n)).await.unwrap();
    }

    // Capacity 2: versions 1..=3 were overwritten.
    assert_eq!(watch.recv().await.unwrap().version, 4);
    assert_eq!(watch.recv().await.unwrap().version, 5);
}

// --- listing ---

#[tokio::test]
async fn names_are_sorted() {
    let (store, _bus) = store();
    store.define("b", Value::Null).await.unwrap();
    store.define("a", Value::Null).await.unwrap();
    assert_eq!(store.names().await, vec!["a", "b"]);
}

#[tokio::test]
async fn snapshot_all_returns_every_property() {
    let (store, _bus) = store();
    store.define("a", Value::Int(1)).await.unwrap();
    store.define("b", Value::Bool(true)).await.unwrap();
    store.update("a", Value::Int(2)).await.unwrap();

    let all = store.snapshot_all().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all["a"], PropertySnapshot::new(Value::Int(2), 1));
    assert_eq!(all["b"], PropertySnapshot::new(Value::Bool(true), 0));
}

// --- bus + signals ---

#[tokio::test]
async fn signals_and_updates_share_one_ordered_stream() {
    let (store, bus) = store();
    let signals = SignalChannel::new(ArtifactId::new("c0"), Arc::clone(&bus));
    store.define("count", Value::Int(0)).await.unwrap();
    let mut events = bus.subscribe();

    signals.emit("before");
    store.update("count", Value::Int(1)).await.unwrap();
    signals.emit("after");

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    let third = events.recv().await.unwrap();
    assert_eq!(first.signal_name(), Some("before"));
    assert_eq!(second.as_update().map(|u| u.version), Some(1));
    assert_eq!(third.signal_name(), Some("after"));
}

#[tokio::test]
async fn signal_subscription_filters_updates() {
    let (store, bus) = store();
    let signals = SignalChannel::new(ArtifactId::new("c0"), Arc::clone(&bus));
    store.define("count", Value::Int(0)).await.unwrap();
    let mut subscription = signals.subscribe();

    store.update("count", Value::Int(1)).await.unwrap();
    signals.emit("tick");

    assert_eq!(subscription.artifact().as_str(), "c0");
    assert_eq!(subscription.recv().await.unwrap().name, "tick");
    assert!(subscription.try_recv().is_none());
}

#[tokio::test]
async fn emit_without_subscribers_is_fine() {
    let bus = Arc::new(EventBus::new(4));
    let signals = SignalChannel::new(ArtifactId::new("c0"), Arc::clone(&bus));
    assert_eq!(signals.emit("tick").name, "tick");
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn oversized_capacities_are_clamped() {
    let bus = Arc::new(EventBus::new(usize::MAX));
    let store = PropertyStore::new(Arc::clone(&bus), usize::MAX);
    store.define("count", Value::Int(0)).await.unwrap();
    let mut watch = store.watch("count").await.unwrap();
    let mut events = bus.subscribe();

    store.update("count", Value::Int(1)).await.unwrap();
    assert_eq!(watch.try_recv().map(|u| u.version), Some(1));
    assert_eq!(events.recv().await.unwrap().as_update().map(|u| u.version), Some(1));
}

#[tokio::test]
async fn closed_bus_ends_streams() {
    let bus = Arc::new(EventBus::new(4));
    let mut before = bus.subscribe();
    bus.close();
    assert!(bus.is_closed());

    assert!(before.recv().await.is_err());
    let mut after = bus.subscribe();
    assert!(after.recv().await.is_err());
    assert_eq!(bus.publish(ArtifactEvent::Signal(artifact_core::Signal::new("x"))), 0);
}
