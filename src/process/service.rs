/*!
 * Service Hooks
 * User behavior plugged into a periodic process
 */

/// Behavior of a [`PeriodicProcess`](super::PeriodicProcess)
///
/// Every hook runs on the process's own task. `service` is the periodic
/// payload; the rest default to no-ops.
pub trait Service: Send + Sync + 'static {
    /// Once per native task, before the first action is handled
    fn setup(&self) {}

    /// Periodic work, called once per period while enabled
    fn service(&self);

    /// Once, when the process is torn down
    fn cleanup(&self) {}

    /// Each time the process becomes enabled
    fn on_enable(&self) {}

    /// Each time the process becomes disabled
    fn on_disable(&self) {}
}

impl<F> Service for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn service(&self) {
        self()
    }
}
