/*!
 * Task Priority Bands
 *
 * Six semantic bands mapped onto however many native levels the kernel has:
 *
 * | levels N  | 1 | 2 | 3 | 4 | 5 | 6 | N > 6 | Use                                   |
 * |-----------|---|---|---|---|---|---|-------|---------------------------------------|
 * | Idle      | 0 | 0 | 0 | 0 | 0 | 0 | 0     | Non real-time work, never blocks      |
 * | Low       | 0 | 1 | 1 | 1 | 1 | 1 | 1     | Non-critical operations               |
 * | Hmi       | 0 | 1 | 1 | 1 | 1 | 2 | 2     | Normal user interface                 |
 * | Mid       | 0 | 1 | 1 | 2 | 2 | 3 | N/2   | Semi-critical, deadlines, light work  |
 * | High      | 0 | 1 | 2 | 3 | 3 | 4 | N-2   | Urgent, short deadlines               |
 * | Highest   | 0 | 1 | 2 | 3 | 4 | 5 | N-1   | Critical, must be quick               |
 *
 * With few levels several bands share one native priority.
 */

use crate::core::types::NativePriority;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[default]
    Idle,
    Low,
    Hmi,
    Mid,
    High,
    Highest,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 6] = [
        Self::Idle,
        Self::Low,
        Self::Hmi,
        Self::Mid,
        Self::High,
        Self::Highest,
    ];

    /// Native priority of this band on a kernel with `max_priorities` levels
    pub fn to_native(self, max_priorities: NativePriority) -> NativePriority {
        let levels = max_priorities.max(1);
        let low = NativePriority::from(levels > 1);
        match self {
            Self::Idle => 0,
            Self::Low => low,
            Self::Hmi => low + NativePriority::from(levels > 5),
            Self::Mid => levels / 2,
            Self::High => levels - 1 - NativePriority::from(levels > 4),
            Self::Highest => levels - 1,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Low => "low",
            Self::Hmi => "hmi",
            Self::Mid => "mid",
            Self::High => "high",
            Self::Highest => "highest",
        };
        f.write_str(name)
    }
}
