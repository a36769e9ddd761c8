/*!
 * Task Builder
 */

use super::hooks::TaskHooks;
use super::lifecycle::Task;
use crate::core::limits::DEFAULT_STACK_DEPTH;
use crate::core::types::{NativePriority, StackDepth};
use crate::kernel::Kernel;
use std::sync::Arc;
use tracing::warn;

/// Builder for [`Task`]
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    name: String,
    priority: NativePriority,
    stack_depth: StackDepth,
}

impl TaskBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            stack_depth: DEFAULT_STACK_DEPTH,
        }
    }

    /// Native priority; capped to the kernel's top level on build
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: NativePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Stack depth in words
    #[inline]
    #[must_use]
    pub fn with_stack_depth(mut self, stack_depth: StackDepth) -> Self {
        self.stack_depth = stack_depth;
        self
    }

    /// Build a Dead task bound to `kernel`
    pub fn build<H: TaskHooks>(self, kernel: Arc<dyn Kernel>, hooks: H) -> Task<H> {
        let top = kernel.max_priorities().saturating_sub(1);
        let priority = if self.priority > top {
            warn!(
                task = %self.name,
                requested = self.priority,
                capped = top,
                "Priority above kernel range, capping"
            );
            top
        } else {
            self.priority
        };

        Task::from_parts(kernel, self.name, priority, self.stack_depth, hooks)
    }
}
