/*!
 * Process Teardown Tests
 * destroy(), drop and fault handling
 */

use super::common::{kernel, kernel_without_delete, settle, wait_for};
use super::periodic_test::{recorded_process, Event, Recorder};
use pretty_assertions::assert_eq;
use rtos_process::{ProcessBuilder, Service, TaskState};
use serial_test::serial;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
struct Faulty {
    cleanups: AtomicU64,
}

impl Service for Faulty {
    fn service(&self) {
        panic!("actuator stalled");
    }

    fn cleanup(&self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
#[serial]
fn test_destroy_running_process_cleans_up_once() {
    let (kernel, process) = recorded_process(Recorder::default(), 1);

    process.add(true).unwrap();
    let handle = process.handle().unwrap();
    assert!(wait_for(|| process.service().services() > 0));

    process.destroy();

    assert!(wait_for(|| !process.is_not_destroyed()));
    assert_eq!(process.state(), TaskState::Dead);
    assert_eq!(process.handle(), None);
    assert!(wait_for(|| !kernel.contains(handle)));

    settle();
    assert_eq!(process.service().count(Event::Cleanup), 1);
    assert_eq!(process.service().count(Event::Disable), 0);

    // A second request finds nothing left to tear down
    process.destroy();
    assert_eq!(process.service().count(Event::Cleanup), 1);
}

#[test]
#[serial]
fn test_restart_never_overlaps_service_calls() {
    let (kernel, process) = recorded_process(Recorder::with_work(Duration::from_millis(60)), 1);

    process.add(true).unwrap();
    let first = process.handle().unwrap();
    assert!(wait_for(|| process.service().in_service()));

    process.restart().unwrap();

    // The old task finished its service call before cleanup ran
    assert!(!kernel.contains(first));
    let events = process.service().events();
    let cleanup_at = events
        .iter()
        .position(|e| *e == Event::Cleanup)
        .expect("cleanup ran");
    assert_eq!(events[cleanup_at - 1], Event::ServiceEnd);
    let before_cleanup = &events[..cleanup_at];
    assert_eq!(
        before_cleanup.iter().filter(|e| **e == Event::ServiceBegin).count(),
        before_cleanup.iter().filter(|e| **e == Event::ServiceEnd).count()
    );

    assert!(wait_for(|| process.service().count(Event::Setup) == 2));
    let before = process.service().services();
    assert!(wait_for(|| process.service().services() > before + 1));
    assert_eq!(process.service().max_active(), 1);

    process.destroy();
}

#[test]
#[serial]
fn test_destroy_disabled_process() {
    let (kernel, process) = recorded_process(Recorder::default(), 1);

    process.add(true).unwrap();
    let handle = process.handle().unwrap();
    assert!(wait_for(|| process.service().services() > 0));
    process.disable();
    assert!(wait_for(|| process.state() == TaskState::Suspended));

    process.destroy();

    assert_eq!(process.state(), TaskState::Dead);
    assert!(!kernel.contains(handle));
    assert_eq!(process.service().count(Event::Disable), 1);
    assert_eq!(process.service().count(Event::Cleanup), 1);
}

#[test]
#[serial]
fn test_destroy_before_first_enable() {
    let (_kernel, process) = recorded_process(Recorder::default(), 1);

    process.add(false).unwrap();
    settle();
    process.destroy();

    assert_eq!(process.state(), TaskState::Dead);
    settle();
    assert_eq!(
        process.service().events(),
        vec![Event::Cleanup],
        "setup never ran, cleanup ran once"
    );
}

#[test]
#[serial]
fn test_destroy_without_native_delete_parks_process() {
    let kernel = kernel_without_delete();
    let process = ProcessBuilder::new(Recorder::default())
        .with_name("parked")
        .with_period(1)
        .build(kernel.clone());

    process.add(true).unwrap();
    let handle = process.handle().unwrap();
    assert!(wait_for(|| process.service().services() > 0));

    process.destroy();

    assert!(wait_for(|| process.state() == TaskState::Parked));
    assert!(!process.is_not_destroyed());
    assert!(!process.is_enabled());
    assert_eq!(process.handle(), Some(handle));
    assert!(kernel.contains(handle));

    let frozen = process.service().services();
    settle();
    assert_eq!(process.service().services(), frozen);
    assert_eq!(process.service().count(Event::Cleanup), 1);
}

#[test]
#[serial]
fn test_panicking_service_stops_process() {
    let kernel = kernel();
    let process = ProcessBuilder::new(Faulty::default())
        .with_name("faulty")
        .with_period(1)
        .build(kernel.clone());

    process.add(true).unwrap();

    assert!(wait_for(|| !process.is_not_destroyed()));
    assert_eq!(process.state(), TaskState::Dead);
    assert!(wait_for(|| kernel.task_count() == 0));
    assert_eq!(process.service().cleanups.load(Ordering::SeqCst), 1);
}

#[test]
#[serial]
fn test_drop_stops_live_process() {
    let kernel = kernel();
    let process = ProcessBuilder::new(|| {})
        .with_name("orphan")
        .with_period(1)
        .build(kernel.clone());

    process.add(true).unwrap();
    let handle = process.handle().unwrap();
    assert!(kernel.contains(handle));

    drop(process);

    assert!(wait_for(|| !kernel.contains(handle)));
}
