//! Integration tests for the event tailing pipeline

use argus::prelude::*;
use argus::sim::{classic_event, extended_event, SimSource};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn vm(id: &str) -> ObjectRef {
    ObjectRef::new("VirtualMachine", id)
}

fn seeded_sim(objects: &[ObjectRef]) -> Arc<SimSource> {
    let sim = Arc::new(SimSource::new());
    for (i, obj) in objects.iter().enumerate() {
        sim.seed(
            obj,
            vec![classic_event((i + 1) as i64, "VmPoweredOnEvent", "powered on")],
        );
    }
    sim
}

#[tokio::test]
async fn test_one_cursor_per_object_destroyed_exactly_once() {
    let objects = vec![vm("vm-a"), vm("vm-b"), vm("vm-c")];
    let sim = seeded_sim(&objects);
    let manager = EventManager::new(sim.clone());

    manager
        .events(&objects, 25, false, false, |_, _| Ok(()))
        .await
        .unwrap();

    assert_eq!(sim.created_cursors(), 3);
    assert_eq!(sim.destroyed_cursors(), 3);
    assert_eq!(sim.live_cursors(), 0);
}

#[tokio::test]
async fn test_fanout_ceiling_blocks_before_any_remote_call() {
    let objects: Vec<ObjectRef> = (0..11).map(|i| vm(&format!("vm-{i}"))).collect();
    let sim = Arc::new(SimSource::new());
    let manager = EventManager::new(sim.clone());

    let err = manager
        .events(&objects, 25, false, false, |_, _| Ok(()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ArgusError::LimitExceeded {
            limit: 10,
            requested: 11
        }
    ));
    assert_eq!(sim.created_cursors(), 0);

    // The override flag lifts the guard.
    manager
        .events(&objects, 25, false, true, |_, _| Ok(()))
        .await
        .unwrap();
    assert_eq!(sim.created_cursors(), 11);
    assert_eq!(sim.destroyed_cursors(), 11);
}

#[tokio::test]
async fn test_limit_guard_is_inclusive() {
    // len >= max trips the guard, so exactly 10 objects already fail.
    let objects: Vec<ObjectRef> = (0..10).map(|i| vm(&format!("vm-{i}"))).collect();
    let sim = Arc::new(SimSource::new());
    let manager = EventManager::new(sim.clone());

    let err = manager
        .events(&objects, 25, false, false, |_, _| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, ArgusError::LimitExceeded { .. }));
}

#[tokio::test]
async fn test_tail_terminates_on_cancellation() {
    let obj = vm("vm-1");
    let sim = seeded_sim(&[obj.clone()]);
    let manager = EventManager::new(sim.clone());

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let opts = EventsOptions::default()
        .tail()
        .with_poll_interval(Duration::from_millis(5))
        .with_cancellation(cancel);

    let objs = [obj];
    let run = manager.events_with(&objs, opts, |_, _| Ok(()));
    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("tail run must return promptly after cancellation")
        .unwrap();

    assert_eq!(sim.created_cursors(), 1);
    assert_eq!(sim.destroyed_cursors(), 1);
    assert_eq!(sim.live_cursors(), 0);
}

#[tokio::test]
async fn test_tail_picks_up_late_events() {
    let obj = vm("vm-1");
    let sim = Arc::new(SimSource::new());
    let manager = EventManager::new(sim.clone());

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    let feeder_sim = sim.clone();
    let feeder_obj = obj.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        feeder_sim.seed(
            &feeder_obj,
            vec![classic_event(1, "VmPoweredOffEvent", "powered off")],
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let opts = EventsOptions::default()
        .tail()
        .with_poll_interval(Duration::from_millis(5))
        .with_cancellation(cancel);

    let mut seen = Vec::new();
    let objs = [obj];
    let run = manager.events_with(&objs, opts, |_, events| {
        seen.extend(events.into_iter().map(|e| e.key));
        Ok(())
    });
    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(seen, vec![1]);
}

#[tokio::test]
async fn test_callback_error_aborts_run_but_destroys_all_cursors() {
    let objects = vec![vm("vm-a"), vm("vm-b"), vm("vm-c")];
    let sim = seeded_sim(&objects);
    let manager = EventManager::new(sim.clone());

    let mut seen_objects = Vec::new();
    let err = manager
        .events(&objects, 25, false, false, |obj, _| {
            seen_objects.push(obj.clone());
            if obj.id == "vm-b" {
                anyhow::bail!("projection is full");
            }
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ArgusError::Callback(_)));
    // Fail-fast: vm-c's callback never ran.
    assert_eq!(seen_objects, vec![vm("vm-a"), vm("vm-b")]);
    // Teardown still released every cursor.
    assert_eq!(sim.destroyed_cursors(), 3);
    assert_eq!(sim.live_cursors(), 0);
}

#[tokio::test]
async fn test_enrollment_fails_fast_and_releases_prior_cursors() {
    let objects = vec![vm("vm-a"), vm("vm-b"), vm("vm-c")];
    let sim = Arc::new(SimSource::new());
    sim.fail_create(&vm("vm-b"), "insufficient permissions");
    let manager = EventManager::new(sim.clone());

    let err = manager
        .events(&objects, 25, false, false, |_, _| Ok(()))
        .await
        .unwrap_err();

    match err {
        ArgusError::Remote { op, .. } => assert_eq!(op, "create_cursor"),
        other => panic!("expected remote error, got {other}"),
    }
    // vm-a's cursor was created, vm-c's never attempted.
    assert_eq!(sim.created_cursors(), 1);
    assert_eq!(sim.destroyed_cursors(), 1);
    assert_eq!(sim.live_cursors(), 0);
}

#[tokio::test]
async fn test_read_error_aborts_run() {
    let obj = vm("vm-1");
    let sim = seeded_sim(&[obj.clone()]);
    sim.fail_reads("connection reset");
    let manager = EventManager::new(sim.clone());

    let err = manager
        .events(&[obj], 25, false, false, |_, _| Ok(()))
        .await
        .unwrap_err();

    assert!(matches!(err, ArgusError::Remote { .. }));
    assert_eq!(sim.destroyed_cursors(), 1);
}

#[tokio::test]
async fn test_unordered_pages_delivered_sorted() {
    let obj = vm("vm-0");
    let sim = Arc::new(SimSource::new().with_page_size(3));
    // Six events across two unordered pages of three.
    sim.seed(
        &obj,
        [3, 1, 2, 6, 4, 5]
            .into_iter()
            .map(|k| classic_event(k, "VmPoweredOnEvent", "powered on")),
    );
    let manager = EventManager::new(sim.clone());

    let mut pages: Vec<Vec<i64>> = Vec::new();
    manager
        .events(&[obj], 3, false, false, |_, events| {
            pages.push(events.iter().map(|e| e.key).collect());
            Ok(())
        })
        .await
        .unwrap();

    // One callback invocation per page, each sorted ascending.
    assert_eq!(pages, vec![vec![1, 2, 3], vec![4, 5, 6]]);
}

#[tokio::test]
async fn test_collector_reads_both_directions() {
    let obj = vm("vm-1");
    let sim = Arc::new(SimSource::new());
    sim.seed(&obj, (1..=4).map(|k| classic_event(k, "TestEvent", "msg")));

    let collector = EventCollector::create(sim.clone(), obj, &EventFilter::all())
        .await
        .unwrap();

    let next = collector.read_next(2).await.unwrap();
    assert_eq!(next.iter().map(|e| e.key).collect::<Vec<_>>(), vec![1, 2]);

    // Backward read walks the window we just consumed.
    let prev = collector.read_prev(2).await.unwrap();
    assert_eq!(prev.len(), 2);

    collector.destroy().await.unwrap();
    assert_eq!(sim.live_cursors(), 0);
}

#[tokio::test]
async fn test_idempotent_enrollment_reuses_cursor() {
    let obj = vm("vm-1");
    let sim = Arc::new(SimSource::new());

    let mut processor = EventProcessor::new(
        sim.clone(),
        ProcessorConfig::default(),
        EventFilter::all(),
    );
    processor.add_object(obj.clone()).await.unwrap();
    processor.add_object(obj.clone()).await.unwrap();

    assert_eq!(processor.len(), 1);
    assert_eq!(sim.created_cursors(), 1);

    processor.destroy().await;
    // Second destroy is a no-op, not a double release.
    processor.destroy().await;
    assert_eq!(sim.destroyed_cursors(), 1);
}

#[tokio::test]
async fn test_type_filter_restricts_stream() {
    let obj = vm("vm-1");
    let sim = Arc::new(SimSource::new());
    sim.seed(
        &obj,
        vec![
            classic_event(1, "VmPoweredOnEvent", "on"),
            classic_event(2, "VmMigratedEvent", "moved"),
            classic_event(3, "VmPoweredOnEvent", "on again"),
        ],
    );
    let manager = EventManager::new(sim.clone());

    let opts = EventsOptions::default().with_kinds(["VmPoweredOnEvent"]);
    let mut keys = Vec::new();
    manager
        .events_with(&[obj], opts, |_, events| {
            keys.extend(events.into_iter().map(|e| e.key));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(keys, vec![1, 3]);
}

#[tokio::test]
async fn test_event_category_lookup_and_cache() {
    let sim = Arc::new(SimSource::new());
    sim.set_categories(HashMap::from([(
        "VmPoweredOnEvent".to_string(),
        "info".to_string(),
    )]));
    let manager = EventManager::new(sim.clone());

    let classic = classic_event(1, "VmPoweredOnEvent", "on");
    assert_eq!(manager.event_category(&classic).await.unwrap(), "info");
    assert_eq!(manager.event_category(&classic).await.unwrap(), "info");
    // The classification map is static and fetched once.
    assert_eq!(sim.category_fetches(), 1);

    // Extended events carry their own severity and never hit the map.
    let warn = extended_event(2, "com.example.disk", Some("warning"));
    assert_eq!(manager.event_category(&warn).await.unwrap(), "warning");

    let unset = extended_event(3, "com.example.disk", None);
    assert_eq!(manager.event_category(&unset).await.unwrap(), "info");

    let empty = extended_event(4, "com.example.disk", Some(""));
    assert_eq!(manager.event_category(&empty).await.unwrap(), "info");
    assert_eq!(sim.category_fetches(), 1);
}
