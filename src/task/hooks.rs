/*!
 * Task Hooks
 * Behavior injected into the fixed lifecycle skeleton
 */

use super::lifecycle::Task;

/// Override points called by [`Task`] transitions
///
/// All hooks default to no-ops. They run while the task's transition lock is
/// held, so they may query the task but should stay short.
pub trait TaskHooks: Send + Sync + Sized + 'static {
    /// Before the native task is created
    fn on_start(&self) {}

    /// Body of the native task; when it returns the task stops itself
    fn on_run(&self, _task: &Task<Self>) {}

    /// On the way from Suspended (or Dead, via `resume`) to Alive
    fn on_resume(&self) {}

    /// Before the native task is suspended
    fn on_suspend(&self) {}

    /// Before the native task is deleted or parked
    fn on_destroy(&self) {}
}
