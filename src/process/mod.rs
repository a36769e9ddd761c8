/*!
 * Process Module
 * Periodic processes driven by a pending-action run loop
 */

pub mod action;
pub mod builder;
pub mod periodic;
pub mod service;
pub mod stats;

// Re-export for convenience
pub use action::{ActionMailbox, PendingAction};
pub use builder::ProcessBuilder;
pub use periodic::{PeriodicProcess, ProcessBody};
pub use service::Service;
pub use stats::{AtomicProcessStats, ProcessStats};
