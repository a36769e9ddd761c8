/*!
 * RTOS Process Library
 *
 * Object-oriented lifecycle control for native RTOS tasks:
 * - [`Task`]: Dead / Alive / Suspended state machine bound to one native task
 * - [`PeriodicProcess`]: enable / disable / restart / destroy requests driven
 *   through a run loop on the process's own task
 * - [`Kernel`]: the native primitives both sit on, with [`SimKernel`] as a
 *   thread-backed host implementation
 */

pub mod core;
pub mod kernel;
pub mod monitoring;
pub mod process;
pub mod task;

// Re-exports
pub use crate::core::{
    Capabilities, KernelConfig, KernelError, KernelResult, NativeHandle, NativePriority,
    StackDepth, TaskError, TaskResult, Ticks, MAX_DELAY,
};
pub use kernel::{Kernel, SimKernel, TaskExit, TaskSpawn};
pub use monitoring::init_tracing;
pub use process::{
    ActionMailbox, PendingAction, PeriodicProcess, ProcessBuilder, ProcessStats, Service,
};
pub use task::{Task, TaskBuilder, TaskHooks, TaskPriority, TaskState};
