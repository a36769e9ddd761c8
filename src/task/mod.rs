/*!
 * Task Module
 * Object lifecycle wrapper around a native RTOS task
 */

pub mod builder;
pub mod hooks;
pub mod lifecycle;
pub mod priority;
pub mod state;

// Re-export for convenience
pub use builder::TaskBuilder;
pub use hooks::TaskHooks;
pub use lifecycle::Task;
pub use priority::TaskPriority;
pub use state::TaskState;
