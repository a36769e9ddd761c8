/*!
 * Kernel Module
 * Native RTOS capability seam and its hosted implementation
 */

pub mod simulation;
pub mod traits;
pub mod types;

pub use simulation::SimKernel;
pub use traits::Kernel;
pub use types::{TaskEntry, TaskExit, TaskSpawn};

#[cfg(test)]
pub use traits::MockKernel;
