/*!
 * Kernel Types
 * Arguments and signals exchanged with a native kernel
 */

use crate::core::types::{NativePriority, StackDepth};
use std::any::Any;
use std::fmt;

/// Entry point of a native task
pub type TaskEntry = Box<dyn FnOnce() + Send + 'static>;

/// Everything a kernel needs to create one native task
pub struct TaskSpawn {
    pub name: String,
    pub stack_depth: StackDepth,
    pub priority: NativePriority,
    pub entry: TaskEntry,
}

impl TaskSpawn {
    pub fn new(
        name: impl Into<String>,
        stack_depth: StackDepth,
        priority: NativePriority,
        entry: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            stack_depth,
            priority,
            entry: Box::new(entry),
        }
    }
}

impl fmt::Debug for TaskSpawn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpawn")
            .field("name", &self.name)
            .field("stack_depth", &self.stack_depth)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Unwind payload a hosted kernel uses to tear down a deleted task
///
/// Deleting a task must never hand control back to its code. On a host thread
/// that is done by unwinding to the thread trampoline with this marker, which
/// `std::panic::resume_unwind` raises without invoking the panic hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskExit;

impl TaskExit {
    /// Whether a caught unwind payload is a task teardown rather than a panic
    #[inline]
    pub fn is(payload: &(dyn Any + Send)) -> bool {
        payload.is::<TaskExit>()
    }

    /// Unwind the calling task back to its trampoline
    pub fn unwind() -> ! {
        std::panic::resume_unwind(Box::new(TaskExit))
    }
}
