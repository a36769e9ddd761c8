/*!
 * Task Lifecycle
 *
 * Ties one native task's handle, name and priority to an object and exposes
 * the Dead / Alive / Suspended state machine as methods.
 *
 * # Transitions
 *
 * - `start`:  Dead → Alive (creates the native task), Suspended → Alive
 * - `pause`:  Alive → Suspended
 * - `resume`: Dead → Alive → resumed, Suspended → Alive
 * - `stop`:   Alive | Suspended → Dead (deletes), or → Parked without native delete
 *
 * Every other call is a silent no-op, so redundant calls can't corrupt state.
 *
 * # Locking
 *
 * Transitions are serialized by a reentrant lock: hooks may query the task
 * they run on. Native calls that block the calling task (suspending,
 * deleting or parking itself, waiting for another task's deletion) are
 * issued only after the lock is released.
 *
 * Stopping from another context deletes the native task first and runs
 * `on_destroy` once it is gone, so the hook never overlaps the task body.
 */

use super::hooks::TaskHooks;
use super::state::{Lifecycle, TaskState};
use crate::core::errors::TaskResult;
use crate::core::types::{NativeHandle, NativePriority, StackDepth, Ticks, MAX_DELAY};
use crate::kernel::{Kernel, TaskExit, TaskSpawn};
use crate::monitoring::TaskSpan;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

type LifecycleGuard<'a> = ReentrantMutexGuard<'a, Cell<Lifecycle>>;

struct TaskInner<H> {
    name: String,
    priority: NativePriority,
    stack_depth: StackDepth,
    kernel: Arc<dyn Kernel>,
    lifecycle: ReentrantMutex<Cell<Lifecycle>>,
    hooks: H,
}

/// Lifecycle wrapper around one native task
///
/// Cloning yields another handle to the same task.
pub struct Task<H: TaskHooks> {
    inner: Arc<TaskInner<H>>,
}

impl<H: TaskHooks> Clone for Task<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: TaskHooks> Task<H> {
    pub(crate) fn from_parts(
        kernel: Arc<dyn Kernel>,
        name: String,
        priority: NativePriority,
        stack_depth: StackDepth,
        hooks: H,
    ) -> Self {
        Self {
            inner: Arc::new(TaskInner {
                name,
                priority,
                stack_depth,
                kernel,
                lifecycle: ReentrantMutex::new(Cell::new(Lifecycle::dead())),
                hooks,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Name as reported by the kernel, `None` while no native task exists
    pub fn native_name(&self) -> Option<String> {
        self.handle()
            .and_then(|handle| self.inner.kernel.task_name(handle))
    }

    pub fn priority(&self) -> NativePriority {
        self.inner.priority
    }

    pub fn stack_depth(&self) -> StackDepth {
        self.inner.stack_depth
    }

    pub fn state(&self) -> TaskState {
        self.inner.lifecycle.lock().get().state
    }

    pub fn handle(&self) -> Option<NativeHandle> {
        self.inner.lifecycle.lock().get().handle
    }

    /// Alive or Suspended
    pub fn is_alive(&self) -> bool {
        self.state().is_alive()
    }

    pub fn is_suspended(&self) -> bool {
        self.state() == TaskState::Suspended
    }

    pub fn is_parked(&self) -> bool {
        self.state() == TaskState::Parked
    }

    pub fn hooks(&self) -> &H {
        &self.inner.hooks
    }

    pub fn kernel(&self) -> &Arc<dyn Kernel> {
        &self.inner.kernel
    }

    /// Unused stack in words, `None` when unsupported or not running
    pub fn stack_headroom(&self) -> Option<usize> {
        if !self.inner.kernel.capabilities().stack_headroom {
            return None;
        }
        self.handle()
            .and_then(|handle| self.inner.kernel.stack_headroom(handle))
    }

    /// Create the native task, or resume it when suspended
    pub fn start(&self) -> TaskResult<()> {
        let guard = self.inner.lifecycle.lock();
        let current = guard.get();

        match current.state {
            TaskState::Dead => {
                self.inner.hooks.on_start();

                let task = self.clone();
                let spawn = TaskSpawn::new(
                    self.inner.name.clone(),
                    self.inner.stack_depth,
                    self.inner.priority,
                    move || task.run(),
                );
                let handle = self.inner.kernel.create(spawn)?;

                guard.set(Lifecycle::alive(handle));
                debug!(task = %self.inner.name, %handle, "Task started");
            }
            TaskState::Suspended => self.wake(&guard, current),
            TaskState::Alive | TaskState::Parked => {
                trace!(task = %self.inner.name, state = %current.state, "Start ignored");
            }
        }

        self.check(&guard);
        Ok(())
    }

    /// Suspend the task until `start` or `resume`
    ///
    /// Called from the task itself this blocks until resumed.
    pub fn pause(&self) {
        self.pause_unless(|| false);
    }

    /// Like [`Task::pause`], skipped when `cancel` holds
    ///
    /// `cancel` is evaluated under the transition lock, so a `start` or
    /// `resume` racing with this call either sees the task suspended or
    /// happens before `cancel` runs.
    pub fn pause_unless(&self, cancel: impl FnOnce() -> bool) {
        let guard = self.inner.lifecycle.lock();
        let current = guard.get();

        if cancel() {
            trace!(task = %self.inner.name, "Pause cancelled");
            return;
        }

        let Some(handle) = current.handle else {
            trace!(task = %self.inner.name, "Pause ignored, task is dead");
            return;
        };
        let own = self.is_current(handle);

        match current.state {
            TaskState::Alive => {
                guard.set(current.with_state(TaskState::Suspended));
                self.inner.hooks.on_suspend();
                self.inner.kernel.suspend(handle);
                debug!(task = %self.inner.name, %handle, "Task suspended");
            }
            // A running task can't really be suspended: another context latched
            // the suspension and it lands at the yield below
            TaskState::Suspended if own => {}
            _ => {
                trace!(task = %self.inner.name, state = %current.state, "Pause ignored");
                return;
            }
        }

        self.check(&guard);
        drop(guard);

        if own {
            self.inner.kernel.yield_now();
        }
    }

    /// Resume a suspended task, starting it first when dead
    pub fn resume(&self) -> TaskResult<()> {
        let guard = self.inner.lifecycle.lock();
        let current = guard.get();

        match current.state {
            TaskState::Dead => {
                self.start()?;
                let started = guard.get();
                if let Some(handle) = started.handle {
                    self.inner.hooks.on_resume();
                    self.inner.kernel.resume(handle);
                }
            }
            TaskState::Suspended => self.wake(&guard, current),
            TaskState::Alive | TaskState::Parked => {
                trace!(task = %self.inner.name, state = %current.state, "Resume ignored");
            }
        }

        self.check(&guard);
        Ok(())
    }

    /// Tear the native task down
    ///
    /// Without native deletion the task is parked instead. Called from the
    /// task itself this does not return.
    pub fn stop(&self) {
        let guard = self.inner.lifecycle.lock();
        let current = guard.get();

        let handle = match (current.state, current.handle) {
            (TaskState::Alive | TaskState::Suspended, Some(handle)) => handle,
            _ => {
                trace!(task = %self.inner.name, state = %current.state, "Stop ignored");
                return;
            }
        };
        let own = self.is_current(handle);

        if self.inner.kernel.capabilities().delete {
            guard.set(Lifecycle::dead());
            self.check(&guard);
            debug!(task = %self.inner.name, %handle, own, "Task stopped");

            if own {
                self.inner.hooks.on_destroy();
                drop(guard);
                self.inner.kernel.delete(handle);
                return;
            }

            // The target may need the lock to reach the kernel call it unwinds at
            drop(guard);
            self.inner.kernel.delete(handle);

            let _guard = self.inner.lifecycle.lock();
            self.inner.hooks.on_destroy();
            return;
        }

        guard.set(current.with_state(TaskState::Parked));
        self.inner.hooks.on_destroy();
        self.check(&guard);
        warn!(
            task = %self.inner.name,
            %handle,
            "Kernel cannot delete tasks, parking instead"
        );

        if own {
            drop(guard);
            loop {
                self.inner.kernel.delay(MAX_DELAY);
            }
        }
        self.inner.kernel.suspend(handle);
    }

    /// Block the calling task for `ticks`; other tasks keep running
    pub fn delay(&self, ticks: Ticks) {
        self.inner.kernel.delay(ticks);
    }

    /// Give up the processor without a timed wait
    pub fn yield_now(&self) {
        self.inner.kernel.yield_now();
    }

    /// Cut short a delay this task is in, if the kernel supports it
    pub fn abort_delay(&self) -> bool {
        if !self.inner.kernel.capabilities().abort_delay {
            return false;
        }
        self.handle()
            .is_some_and(|handle| self.inner.kernel.abort_delay(handle))
    }

    /// Native entry point, only ever invoked by the kernel trampoline
    fn run(&self) {
        let span = TaskSpan::new(&self.inner.name, self.handle());
        let outcome = {
            let _entered = span.enter();
            panic::catch_unwind(AssertUnwindSafe(|| self.inner.hooks.on_run(self)))
        };

        match outcome {
            Ok(()) => span.record_outcome("returned"),
            Err(payload) if TaskExit::is(&*payload) => {
                span.record_outcome("deleted");
                drop(span);
                panic::resume_unwind(payload);
            }
            Err(_) => {
                span.record_outcome("panicked");
                error!(task = %self.inner.name, "Task body panicked, stopping task");
            }
        }
        drop(span);

        // Never fall off the end of the native entry function
        self.stop();
    }

    /// Suspended → Alive
    fn wake(&self, guard: &LifecycleGuard<'_>, current: Lifecycle) {
        guard.set(current.with_state(TaskState::Alive));
        self.inner.hooks.on_resume();
        if let Some(handle) = current.handle {
            self.inner.kernel.resume(handle);
            debug!(task = %self.inner.name, %handle, "Task resumed");
        }
    }

    fn is_current(&self, handle: NativeHandle) -> bool {
        self.inner.kernel.current() == Some(handle)
    }

    #[inline]
    fn check(&self, guard: &LifecycleGuard<'_>) {
        debug_assert!(
            guard.get().is_consistent(),
            "task {} holds an inconsistent handle for its state: {:?}",
            self.inner.name,
            guard.get()
        );
    }
}

impl<H: TaskHooks> fmt::Debug for Task<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lifecycle = self.inner.lifecycle.lock().get();
        f.debug_struct("Task")
            .field("name", &self.inner.name)
            .field("priority", &self.inner.priority)
            .field("state", &lifecycle.state)
            .field("handle", &lifecycle.handle)
            .finish()
    }
}
