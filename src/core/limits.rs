/*!
 * System Limits and Constants
 *
 * Defaults for the native kernel and the hosted simulation, grouped by domain.
 */

use crate::core::types::{NativePriority, StackDepth};
use std::time::Duration;

// =============================================================================
// SCHEDULER
// =============================================================================

/// Number of native priority levels (configMAX_PRIORITIES)
pub const DEFAULT_MAX_PRIORITIES: NativePriority = 7;

/// Length of one scheduler tick (1 kHz tick rate)
pub const DEFAULT_TICK: Duration = Duration::from_millis(1);

// =============================================================================
// TASK STACKS
// =============================================================================

/// Minimal stack depth in words (configMINIMAL_STACK_SIZE)
pub const DEFAULT_STACK_DEPTH: StackDepth = 128;

/// Bytes per stack word
pub const STACK_WORD_SIZE: usize = std::mem::size_of::<usize>();

/// Smallest host thread stack the simulation will request (64KB)
/// Host threads carry runtime frames an MCU task never sees
pub const MIN_HOST_STACK_BYTES: usize = 64 * 1024;

// =============================================================================
// PROCESSES
// =============================================================================

/// Task name used when a process is built without one
pub const DEFAULT_PROCESS_NAME: &str = "X";
