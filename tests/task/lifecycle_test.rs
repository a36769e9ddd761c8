/*!
 * Task Lifecycle Tests
 * Native task creation, suspension and teardown against the hosted kernel
 */

use super::common::{kernel, kernel_without_delete, settle, wait_for};
use pretty_assertions::assert_eq;
use rtos_process::{Task, TaskBuilder, TaskHooks, TaskState, MAX_DELAY};
use serial_test::serial;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// Counts loop laps, one per tick
#[derive(Default)]
struct Looper {
    laps: AtomicU64,
    destroyed: AtomicU64,
}

impl Looper {
    fn laps(&self) -> u64 {
        self.laps.load(Ordering::SeqCst)
    }

    fn destroyed(&self) -> u64 {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl TaskHooks for Looper {
    fn on_run(&self, task: &Task<Self>) {
        loop {
            self.laps.fetch_add(1, Ordering::SeqCst);
            task.delay(1);
        }
    }

    fn on_destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Suspends itself once, then returns
#[derive(Default)]
struct SelfPausing {
    stage: AtomicU64,
}

impl TaskHooks for SelfPausing {
    fn on_run(&self, task: &Task<Self>) {
        self.stage.store(1, Ordering::SeqCst);
        task.pause();
        self.stage.store(2, Ordering::SeqCst);
    }
}

/// Sleeps until its delay is aborted
#[derive(Default)]
struct Sleeper {
    woke: AtomicBool,
}

impl TaskHooks for Sleeper {
    fn on_run(&self, task: &Task<Self>) {
        task.delay(MAX_DELAY);
        self.woke.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Panicker {
    destroyed: AtomicU64,
}

impl TaskHooks for Panicker {
    fn on_run(&self, _task: &Task<Self>) {
        panic!("sensor bus fault");
    }

    fn on_destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Works outside any kernel call, then yields for a tick
#[derive(Default)]
struct Worker {
    working: AtomicBool,
    destroyed_while_working: AtomicU64,
    destroyed: AtomicU64,
}

impl TaskHooks for Worker {
    fn on_run(&self, task: &Task<Self>) {
        loop {
            self.working.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(40));
            self.working.store(false, Ordering::SeqCst);
            task.delay(1);
        }
    }

    fn on_destroy(&self) {
        if self.working.load(Ordering::SeqCst) {
            self.destroyed_while_working.fetch_add(1, Ordering::SeqCst);
        }
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
#[serial]
fn test_external_pause_freezes_task() {
    let kernel = kernel();
    let task = TaskBuilder::new("looper")
        .with_priority(2)
        .build(kernel.clone(), Looper::default());

    task.start().unwrap();
    assert!(wait_for(|| task.hooks().laps() > 2));

    task.pause();
    assert_eq!(task.state(), TaskState::Suspended);
    settle();
    let frozen = task.hooks().laps();
    settle();
    assert_eq!(task.hooks().laps(), frozen);

    task.resume().unwrap();
    assert_eq!(task.state(), TaskState::Alive);
    assert!(wait_for(|| task.hooks().laps() > frozen));

    task.stop();
}

#[test]
#[serial]
fn test_stop_deletes_native_task() {
    let kernel = kernel();
    let task = TaskBuilder::new("looper").build(kernel.clone(), Looper::default());

    task.start().unwrap();
    let handle = task.handle().unwrap();
    assert!(wait_for(|| task.hooks().laps() > 0));

    task.stop();

    assert_eq!(task.state(), TaskState::Dead);
    assert_eq!(task.handle(), None);
    assert_eq!(task.hooks().destroyed(), 1);
    assert!(!kernel.contains(handle));

    settle();
    let frozen = task.hooks().laps();
    settle();
    assert_eq!(task.hooks().laps(), frozen);
}

#[test]
#[serial]
fn test_stop_waits_for_body_before_destroy() {
    let kernel = kernel();
    let task = TaskBuilder::new("worker").build(kernel.clone(), Worker::default());

    task.start().unwrap();
    let handle = task.handle().unwrap();
    assert!(wait_for(|| task.hooks().working.load(Ordering::SeqCst)));

    task.stop();

    assert!(!task.hooks().working.load(Ordering::SeqCst));
    assert!(!kernel.contains(handle));
    assert_eq!(task.hooks().destroyed.load(Ordering::SeqCst), 1);
    assert_eq!(task.hooks().destroyed_while_working.load(Ordering::SeqCst), 0);
}

#[test]
#[serial]
fn test_restart_creates_fresh_native_task() {
    let kernel = kernel();
    let task = TaskBuilder::new("looper")
        .with_priority(4)
        .build(kernel.clone(), Looper::default());

    task.start().unwrap();
    let first = task.handle().unwrap();
    task.stop();
    task.start().unwrap();
    let second = task.handle().unwrap();

    assert_ne!(first, second);
    assert!(!kernel.contains(first));
    assert!(kernel.contains(second));
    assert_eq!(task.priority(), 4);

    task.stop();
}

#[test]
#[serial]
fn test_body_returning_stops_task() {
    let kernel = kernel();
    let task = TaskBuilder::new("self-pausing").build(kernel.clone(), SelfPausing::default());

    task.start().unwrap();
    assert!(wait_for(|| task.hooks().stage.load(Ordering::SeqCst) == 1));
    assert!(wait_for(|| task.is_suspended()));

    settle();
    assert_eq!(task.hooks().stage.load(Ordering::SeqCst), 1);

    task.resume().unwrap();
    assert!(wait_for(|| task.state() == TaskState::Dead));
    assert_eq!(task.hooks().stage.load(Ordering::SeqCst), 2);
    assert!(wait_for(|| kernel.task_count() == 0));
}

#[test]
#[serial]
fn test_abort_delay_wakes_sleeping_task() {
    let kernel = kernel();
    let task = TaskBuilder::new("sleeper").build(kernel.clone(), Sleeper::default());

    assert!(!task.abort_delay());
    task.start().unwrap();

    assert!(wait_for(|| task.abort_delay()));
    assert!(wait_for(|| task.hooks().woke.load(Ordering::SeqCst)));
    assert!(wait_for(|| task.state() == TaskState::Dead));
}

#[test]
#[serial]
fn test_panicking_body_stops_task() {
    let kernel = kernel();
    let task = TaskBuilder::new("faulty").build(kernel.clone(), Panicker::default());

    task.start().unwrap();

    assert!(wait_for(|| task.state() == TaskState::Dead));
    assert_eq!(task.hooks().destroyed.load(Ordering::SeqCst), 1);
    assert!(wait_for(|| kernel.task_count() == 0));
}

#[test]
#[serial]
fn test_stop_without_delete_parks_task() {
    let kernel = kernel_without_delete();
    let task = TaskBuilder::new("looper").build(kernel.clone(), Looper::default());

    task.start().unwrap();
    let handle = task.handle().unwrap();
    assert!(wait_for(|| task.hooks().laps() > 2));

    task.stop();

    assert_eq!(task.state(), TaskState::Parked);
    assert!(!task.is_alive());
    assert_eq!(task.handle(), Some(handle));
    assert!(kernel.contains(handle));
    assert_eq!(task.hooks().destroyed(), 1);

    settle();
    let frozen = task.hooks().laps();
    settle();
    assert_eq!(task.hooks().laps(), frozen);

    // Parked is terminal
    task.start().unwrap();
    assert_eq!(task.state(), TaskState::Parked);
}

#[test]
#[serial]
fn test_native_queries() {
    let kernel = kernel();
    let task = TaskBuilder::new("looper")
        .with_stack_depth(256)
        .build(kernel.clone(), Looper::default());

    assert_eq!(task.native_name(), None);
    assert_eq!(task.stack_headroom(), None);

    task.start().unwrap();
    assert_eq!(task.native_name().as_deref(), Some("looper"));
    assert!(task.stack_headroom().is_some_and(|words| words >= 256));
    assert_eq!(task.stack_depth(), 256);

    task.stop();
}
