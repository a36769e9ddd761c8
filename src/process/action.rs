/*!
 * Pending Action Mailbox
 *
 * Single-slot request cell between control code (any task) and a process's
 * own run loop.
 *
 * # Contract
 *
 * - External writers `post`: a plain store, the last writer wins and an
 *   unconsumed action is overwritten (no queueing)
 * - The run loop moves `Enable → Run` and `Disable → None` with a
 *   compare-exchange, so a post landing while a hook runs is never clobbered
 * - Acquire/release ordering: whatever a poster wrote before posting is
 *   visible to the loop once it observes the action
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Request for the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PendingAction {
    /// Leave the run loop and tear the task down
    None = 0,
    /// Run `on_enable`, then start servicing
    Enable = 1,
    /// Run `on_disable`, then suspend
    Disable = 2,
    /// Service periodically
    Run = 3,
}

impl PendingAction {
    #[inline]
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Enable,
            2 => Self::Disable,
            3 => Self::Run,
            _ => Self::None,
        }
    }
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Run => "run",
        };
        f.write_str(name)
    }
}

/// Lock-free single-slot mailbox holding one [`PendingAction`]
#[derive(Debug)]
pub struct ActionMailbox {
    slot: AtomicU8,
}

impl ActionMailbox {
    pub const fn new(initial: PendingAction) -> Self {
        Self {
            slot: AtomicU8::new(initial as u8),
        }
    }

    /// Overwrite the pending action
    #[inline]
    pub fn post(&self, action: PendingAction) {
        self.slot.store(action as u8, Ordering::Release);
    }

    #[inline]
    pub fn load(&self) -> PendingAction {
        PendingAction::from_raw(self.slot.load(Ordering::Acquire))
    }

    /// Overwrite the pending action, returning the one it replaced
    #[inline]
    pub fn replace(&self, action: PendingAction) -> PendingAction {
        PendingAction::from_raw(self.slot.swap(action as u8, Ordering::AcqRel))
    }

    /// Replace `from` with `to` unless another action was posted meanwhile
    #[inline]
    pub fn advance(&self, from: PendingAction, to: PendingAction) -> bool {
        self.slot
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for ActionMailbox {
    fn default() -> Self {
        Self::new(PendingAction::Disable)
    }
}
