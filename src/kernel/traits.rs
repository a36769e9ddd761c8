/*!
 * Kernel Traits
 * The native task operation set the lifecycle wrappers consume
 */

use super::types::TaskSpawn;
use crate::core::errors::KernelResult;
use crate::core::types::{Capabilities, NativeHandle, NativePriority, Ticks};

/// Native RTOS task primitives
///
/// Operations on a handle the kernel no longer knows are silent no-ops.
#[cfg_attr(test, mockall::automock)]
pub trait Kernel: Send + Sync {
    /// Create and schedule a native task running `spawn.entry`
    fn create(&self, spawn: TaskSpawn) -> KernelResult<NativeHandle>;

    /// Delete a native task. Deleting the calling task does not return.
    fn delete(&self, handle: NativeHandle);

    /// Latch a suspension on a task
    ///
    /// Never blocks the caller. The target stops at its next kernel call,
    /// so a task suspending itself follows up with [`Kernel::yield_now`].
    fn suspend(&self, handle: NativeHandle);

    /// Clear a latched suspension and wake the task
    fn resume(&self, handle: NativeHandle);

    /// Block the calling task for `ticks`; `MAX_DELAY` blocks indefinitely
    fn delay(&self, ticks: Ticks);

    /// Cooperative point: give up the processor, honoring a latched suspension
    fn yield_now(&self);

    /// Cut short a delay in progress, true if the task was delaying
    fn abort_delay(&self, handle: NativeHandle) -> bool;

    /// Name the task was created with
    fn task_name(&self, handle: NativeHandle) -> Option<String>;

    /// Priority the task runs at
    fn priority(&self, handle: NativeHandle) -> Option<NativePriority>;

    /// Unused stack in words, `None` when unsupported or unknown
    fn stack_headroom(&self, handle: NativeHandle) -> Option<usize>;

    /// Handle of the calling task, `None` when called from outside any task
    fn current(&self) -> Option<NativeHandle>;

    fn capabilities(&self) -> Capabilities;

    /// Number of priority levels; valid priorities are `0..max_priorities()`
    fn max_priorities(&self) -> NativePriority;
}
