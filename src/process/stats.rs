/*!
 * Lock-Free Process Statistics
 * Atomic counters updated from the run loop without contention
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a process's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Native tasks created for this process
    pub starts: u64,
    /// Run loop iterations
    pub iterations: u64,
    /// Completed `service` calls
    pub services: u64,
    /// `on_enable` calls
    pub enables: u64,
    /// `on_disable` calls
    pub disables: u64,
}

/// Atomic process statistics
///
/// Relaxed ordering throughout: counters are monitoring data, each one is
/// exact but a snapshot may mix values from slightly different instants.
#[derive(Debug, Default)]
pub struct AtomicProcessStats {
    starts: AtomicU64,
    iterations: AtomicU64,
    services: AtomicU64,
    enables: AtomicU64,
    disables: AtomicU64,
}

impl AtomicProcessStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_starts(&self) {
        self.starts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_iterations(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_services(&self) {
        self.services.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_enables(&self) {
        self.enables.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_disables(&self) {
        self.disables.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn snapshot(&self) -> ProcessStats {
        ProcessStats {
            starts: self.starts.load(Ordering::Relaxed),
            iterations: self.iterations.load(Ordering::Relaxed),
            services: self.services.load(Ordering::Relaxed),
            enables: self.enables.load(Ordering::Relaxed),
            disables: self.disables.load(Ordering::Relaxed),
        }
    }
}
