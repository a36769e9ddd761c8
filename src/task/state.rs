/*!
 * Task State
 * Lifecycle states and the handle/state pairing they guard
 */

use crate::core::types::NativeHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// No native task exists; `start` creates one
    Dead,
    /// Native task exists and is schedulable
    Alive,
    /// Native task exists but is suspended until resumed
    Suspended,
    /// Stopped on a kernel without task deletion: the native task is parked
    /// forever and this instance cannot be started again
    Parked,
}

impl TaskState {
    /// Alive or Suspended
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Alive | Self::Suspended)
    }

    /// Whether a native task backs this state
    #[inline]
    pub fn has_native(self) -> bool {
        self != Self::Dead
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dead => "Dead",
            Self::Alive => "Alive",
            Self::Suspended => "Suspended",
            Self::Parked => "Parked",
        };
        f.write_str(name)
    }
}

/// State plus native handle, always updated together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    pub state: TaskState,
    pub handle: Option<NativeHandle>,
}

impl Lifecycle {
    pub const fn dead() -> Self {
        Self {
            state: TaskState::Dead,
            handle: None,
        }
    }

    pub const fn alive(handle: NativeHandle) -> Self {
        Self {
            state: TaskState::Alive,
            handle: Some(handle),
        }
    }

    #[must_use]
    pub const fn with_state(self, state: TaskState) -> Self {
        Self {
            state,
            handle: self.handle,
        }
    }

    /// A handle is held exactly when the state is backed by a native task
    pub fn is_consistent(&self) -> bool {
        self.handle.is_some() == self.state.has_native()
    }
}
