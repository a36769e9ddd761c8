/*!
 * Periodic Process
 *
 * A request/action loop on top of [`Task`]: enable, disable, restart and
 * destroy requests from any context are posted to a single-slot mailbox and
 * turned into state transitions inside the process's own task.
 *
 * # Run loop
 *
 * ```text
 * if action == Disable { pause }          // parked before setup
 * setup()
 * loop {
 *     Enable  => on_enable(),  Enable → Run
 *     Disable => on_disable(), Disable → None, pause unless re-enabled
 *     Run     => service(), delay(period) or yield when period == 0
 *     None    => stop
 * }
 * ```
 *
 * A disable never interrupts `service()`: the loop only looks at the
 * mailbox between iterations.
 */

use super::action::{ActionMailbox, PendingAction};
use super::service::Service;
use super::stats::{AtomicProcessStats, ProcessStats};
use crate::core::errors::TaskResult;
use crate::core::types::{NativeHandle, NativePriority, Ticks};
use crate::task::{Task, TaskHooks, TaskPriority, TaskState};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info, trace, warn};

/// Task hooks driving the run loop of a [`PeriodicProcess`]
pub struct ProcessBody<S: Service> {
    service: S,
    mailbox: ActionMailbox,
    period: AtomicU32,
    band: TaskPriority,
    stats: AtomicProcessStats,
}

impl<S: Service> ProcessBody<S> {
    pub(crate) fn new(service: S, band: TaskPriority, period: Ticks) -> Self {
        Self {
            service,
            mailbox: ActionMailbox::new(PendingAction::Disable),
            period: AtomicU32::new(period),
            band,
            stats: AtomicProcessStats::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn mailbox(&self) -> &ActionMailbox {
        &self.mailbox
    }
}

impl<S: Service> TaskHooks for ProcessBody<S> {
    fn on_start(&self) {
        self.stats.inc_starts();
    }

    fn on_run(&self, task: &Task<Self>) {
        if self.mailbox.load() == PendingAction::Disable {
            task.pause_unless(|| self.mailbox.load() != PendingAction::Disable);
        }
        self.service.setup();

        loop {
            self.stats.inc_iterations();

            match self.mailbox.load() {
                PendingAction::Enable => {
                    self.service.on_enable();
                    self.stats.inc_enables();
                    if !self.mailbox.advance(PendingAction::Enable, PendingAction::Run) {
                        trace!(process = %task.name(), "Enable superseded by a newer request");
                    }
                }
                PendingAction::Disable => {
                    self.service.on_disable();
                    self.stats.inc_disables();
                    if self.mailbox.advance(PendingAction::Disable, PendingAction::None) {
                        // An enable landing after the advance must not be slept through
                        task.pause_unless(|| self.mailbox.load() != PendingAction::None);
                    }
                }
                PendingAction::Run => {
                    self.service.service();
                    self.stats.inc_services();
                    match self.period.load(Ordering::Relaxed) {
                        0 => task.yield_now(),
                        period => task.delay(period),
                    }
                }
                PendingAction::None => {
                    debug!(process = %task.name(), "Run loop finished");
                    task.stop();
                    return;
                }
            }
        }
    }

    fn on_resume(&self) {
        self.mailbox.post(PendingAction::Enable);
    }

    fn on_destroy(&self) {
        if self.mailbox.load() == PendingAction::Disable {
            self.service.on_disable();
            self.stats.inc_disables();
        }
        self.service.cleanup();
    }
}

/// Periodic service running on its own native task
///
/// Created disabled. Dropping a process that is still alive stops its task.
pub struct PeriodicProcess<S: Service> {
    task: Task<ProcessBody<S>>,
}

impl<S: Service> PeriodicProcess<S> {
    pub(crate) fn from_task(task: Task<ProcessBody<S>>) -> Self {
        Self { task }
    }

    fn body(&self) -> &ProcessBody<S> {
        self.task.hooks()
    }

    /// Start the native task, enabled or parked disabled
    pub fn add(&self, enable: bool) -> TaskResult<()> {
        if enable {
            self.body().mailbox.post(PendingAction::Enable);
            self.task.start()?;
        } else {
            self.body().mailbox.post(PendingAction::Disable);
            self.task.start()?;
            self.task.pause();
        }
        info!(process = %self.task.name(), enable, "Process added");
        Ok(())
    }

    /// Resume the process, starting its task when it has none
    ///
    /// A process that is already enabled is left alone.
    pub fn enable(&self) -> TaskResult<()> {
        if matches!(
            self.body().mailbox.load(),
            PendingAction::Disable | PendingAction::None
        ) {
            self.body().mailbox.post(PendingAction::Enable);
        }
        self.task.resume()
    }

    /// Request a disable; the loop acts on it between two `service` calls
    pub fn disable(&self) {
        self.body().mailbox.post(PendingAction::Disable);
        debug!(process = %self.task.name(), "Disable requested");
    }

    /// Tear the native task down and recreate it enabled
    pub fn restart(&self) -> TaskResult<()> {
        if self.task.is_parked() {
            warn!(process = %self.task.name(), "Restart ignored, process is parked");
            return Ok(());
        }
        self.task.stop();
        self.body().mailbox.post(PendingAction::Enable);
        self.task.start()?;
        info!(process = %self.task.name(), handle = ?self.task.handle(), "Process restarted");
        Ok(())
    }

    /// Request teardown; the loop exits and stops the task at its next iteration
    ///
    /// A process parked by a disable never reaches another iteration, so it
    /// is stopped from the calling context instead.
    pub fn destroy(&self) {
        let previous = self.body().mailbox.replace(PendingAction::None);
        debug!(process = %self.task.name(), %previous, "Destroy requested");

        if previous == PendingAction::None || self.task.is_suspended() {
            self.task.stop();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.task.is_alive()
            && !matches!(
                self.body().mailbox.load(),
                PendingAction::Disable | PendingAction::None
            )
    }

    pub fn is_not_destroyed(&self) -> bool {
        self.task.is_alive()
    }

    pub fn period(&self) -> Ticks {
        self.body().period.load(Ordering::Relaxed)
    }

    /// Takes effect from the next delay on
    pub fn set_period(&self, period: Ticks) {
        self.body().period.store(period, Ordering::Relaxed);
    }

    /// Semantic priority band
    pub fn priority(&self) -> TaskPriority {
        self.body().band
    }

    pub fn native_priority(&self) -> NativePriority {
        self.task.priority()
    }

    pub fn pending_action(&self) -> PendingAction {
        self.body().mailbox.load()
    }

    pub fn name(&self) -> &str {
        self.task.name()
    }

    pub fn state(&self) -> TaskState {
        self.task.state()
    }

    pub fn handle(&self) -> Option<NativeHandle> {
        self.task.handle()
    }

    pub fn service(&self) -> &S {
        &self.body().service
    }

    pub fn stats(&self) -> ProcessStats {
        self.body().stats.snapshot()
    }

    /// Underlying task, for stack and delay queries
    pub fn task(&self) -> &Task<ProcessBody<S>> {
        &self.task
    }
}

impl<S: Service> fmt::Debug for PeriodicProcess<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicProcess")
            .field("name", &self.task.name())
            .field("priority", &self.body().band)
            .field("period", &self.period())
            .field("state", &self.task.state())
            .field("pending", &self.pending_action())
            .finish()
    }
}

impl<S: Service> Drop for PeriodicProcess<S> {
    fn drop(&mut self) {
        if self.task.is_alive() {
            warn!(
                process = %self.task.name(),
                "PeriodicProcess dropped while alive - stopping its task. \
                 Call destroy() for an orderly shutdown."
            );
            self.task.stop();
        }
    }
}
