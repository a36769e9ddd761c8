/*!
 * Process Builder
 * Configures a PeriodicProcess before its task exists
 */

use super::periodic::{PeriodicProcess, ProcessBody};
use super::service::Service;
use crate::core::limits::{DEFAULT_PROCESS_NAME, DEFAULT_STACK_DEPTH};
use crate::core::types::{NativePriority, StackDepth, Ticks};
use crate::kernel::Kernel;
use crate::task::{TaskBuilder, TaskPriority};
use std::sync::Arc;

/// Builder for [`PeriodicProcess`]
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use rtos_process::{ProcessBuilder, SimKernel, TaskPriority};
/// let kernel = Arc::new(SimKernel::new());
/// let blink = ProcessBuilder::new(|| println!("tick"))
///     .with_name("blink")
///     .with_priority(TaskPriority::Hmi)
///     .with_period(500)
///     .build(kernel);
/// blink.add(true).unwrap();
/// ```
pub struct ProcessBuilder<S: Service> {
    service: S,
    name: String,
    band: TaskPriority,
    native_priority: Option<NativePriority>,
    period: Ticks,
    stack_depth: StackDepth,
}

impl<S: Service> ProcessBuilder<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            name: DEFAULT_PROCESS_NAME.to_string(),
            band: TaskPriority::Idle,
            native_priority: None,
            period: 0,
            stack_depth: DEFAULT_STACK_DEPTH,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Priority band, mapped onto the kernel's levels at build time
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, band: TaskPriority) -> Self {
        self.band = band;
        self
    }

    /// Explicit native priority, overriding the band mapping
    #[inline]
    #[must_use]
    pub fn with_native_priority(mut self, priority: NativePriority) -> Self {
        self.native_priority = Some(priority);
        self
    }

    /// Ticks between `service` calls; 0 services back to back
    #[inline]
    #[must_use]
    pub fn with_period(mut self, period: Ticks) -> Self {
        self.period = period;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_stack_depth(mut self, stack_depth: StackDepth) -> Self {
        self.stack_depth = stack_depth;
        self
    }

    pub fn build(self, kernel: Arc<dyn Kernel>) -> PeriodicProcess<S> {
        let priority = self
            .native_priority
            .unwrap_or_else(|| self.band.to_native(kernel.max_priorities()));

        let task = TaskBuilder::new(self.name)
            .with_priority(priority)
            .with_stack_depth(self.stack_depth)
            .build(kernel, ProcessBody::new(self.service, self.band, self.period));

        PeriodicProcess::from_task(task)
    }
}
