/*!
 * Kernel Configuration
 *
 * Build-time constants of a real RTOS (priority count, tick rate, optional
 * API switches) expressed as runtime configuration for the hosted kernel.
 */

use super::errors::{KernelError, KernelResult};
use super::limits::{DEFAULT_MAX_PRIORITIES, DEFAULT_STACK_DEPTH, DEFAULT_TICK};
use super::types::{Capabilities, NativePriority, StackDepth};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Native kernel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Number of priority levels, valid priorities are `0..max_priorities`
    pub max_priorities: NativePriority,
    /// Wall-clock length of one tick
    pub tick: Duration,
    /// Stack depth handed to tasks that don't ask for one
    pub min_stack_depth: StackDepth,
    /// Optional operations the kernel provides
    pub capabilities: Capabilities,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            max_priorities: DEFAULT_MAX_PRIORITIES,
            tick: DEFAULT_TICK,
            min_stack_depth: DEFAULT_STACK_DEPTH,
            capabilities: Capabilities::full(),
        }
    }
}

impl KernelConfig {
    /// Smallest viable kernel: one priority level, no optional capabilities
    pub fn minimal() -> Self {
        Self {
            max_priorities: 1,
            capabilities: Capabilities::minimal(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_max_priorities(mut self, max_priorities: NativePriority) -> Self {
        self.max_priorities = max_priorities;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Load configuration from the environment, falling back to defaults
    ///
    /// Environment variables:
    /// - RTOS_MAX_PRIORITIES: priority level count (default: 7)
    /// - RTOS_TICK_MICROS: tick length in microseconds (default: 1000)
    /// - RTOS_NO_DELETE / RTOS_NO_ABORT_DELAY / RTOS_NO_STACK_HEADROOM: drop a capability
    pub fn from_env() -> KernelResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("RTOS_MAX_PRIORITIES") {
            config.max_priorities = raw.parse().map_err(|_| {
                KernelError::InvalidConfig(format!("RTOS_MAX_PRIORITIES={raw} is not a number"))
            })?;
        }

        if let Ok(raw) = std::env::var("RTOS_TICK_MICROS") {
            let micros: u64 = raw.parse().map_err(|_| {
                KernelError::InvalidConfig(format!("RTOS_TICK_MICROS={raw} is not a number"))
            })?;
            config.tick = Duration::from_micros(micros);
        }

        config.capabilities.delete &= !env_flag("RTOS_NO_DELETE");
        config.capabilities.abort_delay &= !env_flag("RTOS_NO_ABORT_DELAY");
        config.capabilities.stack_headroom &= !env_flag("RTOS_NO_STACK_HEADROOM");

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KernelResult<()> {
        if self.max_priorities == 0 {
            return Err(KernelError::InvalidConfig(
                "max_priorities must be at least 1".to_string(),
            ));
        }
        if self.tick.is_zero() {
            return Err(KernelError::InvalidConfig(
                "tick length must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}
