/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * Lifecycle misuse is never an error (inapplicable transitions are no-ops),
 * so only native creation failures and configuration problems surface here.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Errors reported by a native kernel implementation
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum KernelError {
    #[error("Failed to create native task '{name}': {reason}")]
    #[diagnostic(
        code(kernel::spawn_failed),
        help("The host could not allocate a thread. Check stack depth and system limits.")
    )]
    SpawnFailed { name: String, reason: String },

    #[error("Invalid kernel configuration: {0}")]
    #[diagnostic(
        code(kernel::invalid_config),
        help("Priority count and tick length must both be non-zero.")
    )]
    InvalidConfig(String),
}

/// Errors surfaced by task lifecycle transitions
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum TaskError {
    #[error("Kernel error: {0}")]
    #[diagnostic(transparent)]
    Kernel(#[from] KernelError),
}

pub type KernelResult<T> = Result<T, KernelError>;

pub type TaskResult<T> = Result<T, TaskError>;
