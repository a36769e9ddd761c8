/*!
 * Hosted Kernel Simulation
 *
 * Runs native tasks as host threads so the lifecycle wrappers can execute
 * and be tested without target hardware.
 *
 * # Model
 *
 * - Every native task is a `std::thread` with a control block
 *   (suspended / deleted / delaying / abort flags behind a mutex + condvar)
 * - Host threads cannot be stopped from outside, so suspension and deletion
 *   are latched and take effect at the target's next kernel call
 * - A deleted task unwinds to its trampoline with [`TaskExit`] and never
 *   re-enters its own code
 * - Deleting another task waits until its thread has left the task's code,
 *   so nothing it runs can overlap what the deleter does next
 * - Priorities are recorded but not enforced; the host scheduler decides
 * - Calls made from non-task threads degrade to plain host sleeps
 */

use super::traits::Kernel;
use super::types::{TaskExit, TaskSpawn};
use crate::core::config::KernelConfig;
use crate::core::errors::{KernelError, KernelResult};
use crate::core::limits::{MIN_HOST_STACK_BYTES, STACK_WORD_SIZE};
use crate::core::types::{Capabilities, NativeHandle, NativePriority, Ticks, MAX_DELAY};
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

static NEXT_KERNEL_ID: AtomicU64 = AtomicU64::new(1);

/// How long a delete waits on its target before warning that it is stuck
const EXIT_WARN_INTERVAL: Duration = Duration::from_secs(1);

thread_local! {
    /// Control block of the task running on this thread, tagged with its kernel
    static CURRENT: RefCell<Option<(u64, Arc<ControlBlock>)>> = const { RefCell::new(None) };
}

#[derive(Debug, Default)]
struct Control {
    suspended: bool,
    deleted: bool,
    delaying: bool,
    abort: bool,
    exited: bool,
}

/// Per-task kernel state (the simulated TCB)
#[derive(Debug)]
struct ControlBlock {
    handle: NativeHandle,
    name: String,
    priority: NativePriority,
    stack_words: usize,
    control: Mutex<Control>,
    wake: Condvar,
}

impl ControlBlock {
    /// Block while suspended; unwind if deleted
    fn checkpoint(&self) {
        let mut control = self.control.lock();
        loop {
            if control.deleted {
                drop(control);
                TaskExit::unwind();
            }
            if !control.suspended {
                return;
            }
            self.wake.wait(&mut control);
        }
    }

    /// Wait until `deadline` (forever when `None`), an abort or a deletion
    fn sleep_until(&self, deadline: Option<Instant>) {
        let mut control = self.control.lock();
        control.delaying = true;
        control.abort = false;

        while !control.deleted && !control.abort {
            match deadline {
                Some(deadline) => {
                    if self.wake.wait_until(&mut control, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut control),
            }
        }

        control.delaying = false;
        control.abort = false;
    }

    /// Mark the thread as gone for good
    fn exit(&self) {
        self.control.lock().exited = true;
        self.wake.notify_all();
    }

    /// Block until the thread has left the task's code
    fn wait_exited(&self) {
        let mut control = self.control.lock();
        while !control.exited {
            if self
                .wake
                .wait_for(&mut control, EXIT_WARN_INTERVAL)
                .timed_out()
                && !control.exited
            {
                warn!(
                    task = %self.name,
                    handle = %self.handle,
                    "Deleted task has not reached a kernel call yet, still waiting"
                );
            }
        }
    }
}

/// Thread-backed implementation of [`Kernel`]
pub struct SimKernel {
    id: u64,
    config: KernelConfig,
    tasks: Arc<DashMap<u64, Arc<ControlBlock>, RandomState>>,
    next_handle: AtomicU64,
}

impl SimKernel {
    /// Create a kernel with the default configuration
    pub fn new() -> Self {
        Self::build(KernelConfig::default())
    }

    /// Create a kernel with a custom configuration
    pub fn with_config(config: KernelConfig) -> KernelResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: KernelConfig) -> Self {
        let id = NEXT_KERNEL_ID.fetch_add(1, Ordering::Relaxed);
        debug!(
            kernel = id,
            max_priorities = config.max_priorities,
            tick_us = config.tick.as_micros() as u64,
            "Simulated kernel initialized"
        );
        Self {
            id,
            config,
            tasks: Arc::new(DashMap::with_hasher(RandomState::new())),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Number of native tasks currently known to the kernel
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether `handle` names a live native task
    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.tasks.contains_key(&handle.as_raw())
    }

    /// Host duration of `ticks` scheduler ticks
    pub fn ticks_to_duration(&self, ticks: Ticks) -> Duration {
        self.config.tick.saturating_mul(ticks)
    }

    fn lookup(&self, handle: NativeHandle) -> Option<Arc<ControlBlock>> {
        let found = self.tasks.get(&handle.as_raw()).map(|entry| Arc::clone(entry.value()));
        if found.is_none() {
            trace!(%handle, "Kernel call on unknown handle ignored");
        }
        found
    }

    fn current_block(&self) -> Option<Arc<ControlBlock>> {
        CURRENT.with(|current| {
            current
                .borrow()
                .as_ref()
                .filter(|(kernel, _)| *kernel == self.id)
                .map(|(_, block)| Arc::clone(block))
        })
    }

    fn stack_bytes(&self, depth: usize) -> usize {
        depth
            .max(self.config.min_stack_depth)
            .saturating_mul(STACK_WORD_SIZE)
            .max(MIN_HOST_STACK_BYTES)
    }
}

impl Default for SimKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for SimKernel {
    fn create(&self, spawn: TaskSpawn) -> KernelResult<NativeHandle> {
        let TaskSpawn {
            name,
            stack_depth,
            priority,
            entry,
        } = spawn;

        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let handle = NativeHandle::from_raw(raw).ok_or_else(|| KernelError::SpawnFailed {
            name: name.clone(),
            reason: "handle space exhausted".to_string(),
        })?;

        let priority = priority.min(self.config.max_priorities.saturating_sub(1));
        let stack_bytes = self.stack_bytes(stack_depth);
        let block = Arc::new(ControlBlock {
            handle,
            name: name.clone(),
            priority,
            stack_words: stack_bytes / STACK_WORD_SIZE,
            control: Mutex::new(Control::default()),
            wake: Condvar::new(),
        });

        // Registered before the thread exists so an immediate suspend/delete finds it
        self.tasks.insert(raw, Arc::clone(&block));

        let tasks = Arc::clone(&self.tasks);
        let kernel = self.id;
        let thread_block = Arc::clone(&block);

        let spawned = thread::Builder::new()
            .name(name.clone())
            .stack_size(stack_bytes)
            .spawn(move || {
                CURRENT.with(|current| {
                    *current.borrow_mut() = Some((kernel, Arc::clone(&thread_block)))
                });

                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    thread_block.checkpoint();
                    entry();
                }));

                match outcome {
                    Ok(()) => trace!(handle = %thread_block.handle, "Task entry returned"),
                    Err(payload) if TaskExit::is(&*payload) => {
                        trace!(handle = %thread_block.handle, "Task deleted")
                    }
                    Err(_) => error!(
                        task = %thread_block.name,
                        handle = %thread_block.handle,
                        "Task panicked outside its lifecycle wrapper"
                    ),
                }

                tasks.remove(&raw);
                CURRENT.with(|current| current.borrow_mut().take());
                thread_block.exit();
            });

        if let Err(e) = spawned {
            self.tasks.remove(&raw);
            return Err(KernelError::SpawnFailed {
                name,
                reason: e.to_string(),
            });
        }

        debug!(task = %name, %handle, priority, stack_bytes, "Native task created");
        Ok(handle)
    }

    fn delete(&self, handle: NativeHandle) {
        if !self.config.capabilities.delete {
            warn!(%handle, "Task deletion is not supported by this kernel");
            return;
        }

        let own = self
            .current_block()
            .is_some_and(|block| block.handle == handle);

        let Some((_, block)) = self.tasks.remove(&handle.as_raw()) else {
            trace!(%handle, "Delete of unknown handle ignored");
            return;
        };

        block.control.lock().deleted = true;
        block.wake.notify_all();
        debug!(task = %block.name, %handle, own, "Native task deleted");

        if own {
            TaskExit::unwind();
        }
        block.wait_exited();
        trace!(%handle, "Deleted task exited");
    }

    fn suspend(&self, handle: NativeHandle) {
        if let Some(block) = self.lookup(handle) {
            block.control.lock().suspended = true;
            trace!(%handle, "Suspension latched");
        }
    }

    fn resume(&self, handle: NativeHandle) {
        if let Some(block) = self.lookup(handle) {
            block.control.lock().suspended = false;
            block.wake.notify_all();
            trace!(%handle, "Task resumed");
        }
    }

    fn delay(&self, ticks: Ticks) {
        let Some(block) = self.current_block() else {
            if ticks == MAX_DELAY {
                loop {
                    thread::park();
                }
            }
            thread::sleep(self.ticks_to_duration(ticks));
            return;
        };

        if ticks == 0 {
            block.checkpoint();
            thread::yield_now();
            return;
        }

        block.checkpoint();
        let deadline = if ticks == MAX_DELAY {
            None
        } else {
            Instant::now().checked_add(self.ticks_to_duration(ticks))
        };
        block.sleep_until(deadline);
        block.checkpoint();
    }

    fn yield_now(&self) {
        if let Some(block) = self.current_block() {
            block.checkpoint();
        }
        thread::yield_now();
    }

    fn abort_delay(&self, handle: NativeHandle) -> bool {
        if !self.config.capabilities.abort_delay {
            return false;
        }
        let Some(block) = self.lookup(handle) else {
            return false;
        };

        let mut control = block.control.lock();
        if !control.delaying {
            return false;
        }
        control.abort = true;
        drop(control);
        block.wake.notify_all();
        true
    }

    fn task_name(&self, handle: NativeHandle) -> Option<String> {
        self.lookup(handle).map(|block| block.name.clone())
    }

    fn priority(&self, handle: NativeHandle) -> Option<NativePriority> {
        self.lookup(handle).map(|block| block.priority)
    }

    fn stack_headroom(&self, handle: NativeHandle) -> Option<usize> {
        if !self.config.capabilities.stack_headroom {
            return None;
        }
        // Host threads keep no high-water mark; the reserved depth is an upper bound
        self.lookup(handle).map(|block| block.stack_words)
    }

    fn current(&self) -> Option<NativeHandle> {
        self.current_block().map(|block| block.handle)
    }

    fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    fn max_priorities(&self) -> NativePriority {
        self.config.max_priorities
    }
}
