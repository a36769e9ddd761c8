/*!
 * Core Types
 * Common types shared by the kernel seam, tasks and processes
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Scheduler tick count used for delays and periods
pub type Ticks = u32;

/// Native scheduler priority (0 is the idle level, higher runs first)
pub type NativePriority = u32;

/// Stack depth in machine words, as native task creation expects it
pub type StackDepth = usize;

/// Delay value that blocks the calling task indefinitely
pub const MAX_DELAY: Ticks = Ticks::MAX;

/// Opaque identity of one native schedulable unit
///
/// Handles are never reused: recreating a task always yields a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeHandle(NonZeroU64);

impl NativeHandle {
    /// Wrap a raw kernel identifier, `None` for the null handle
    #[inline]
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    #[inline]
    #[must_use]
    pub fn as_raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Optional native capabilities
///
/// Each one missing degrades to a documented fallback instead of failing:
/// no delete parks the task, no abort-delay is a no-op, no stack query reports `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub delete: bool,
    pub abort_delay: bool,
    pub stack_headroom: bool,
}

impl Capabilities {
    /// Every optional capability available
    pub const fn full() -> Self {
        Self {
            delete: true,
            abort_delay: true,
            stack_headroom: true,
        }
    }

    /// Only the mandatory operation set
    pub const fn minimal() -> Self {
        Self {
            delete: false,
            abort_delay: false,
            stack_headroom: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}
