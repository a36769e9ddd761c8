/*!
 * RTOS Process Demo
 *
 * Runs two periodic processes on the hosted kernel and walks them through
 * their lifecycle:
 * - heartbeat: enabled on add, fast period
 * - sampler: added disabled, enabled later, then restarted
 */

use anyhow::{Context, Result};
use rtos_process::{
    init_tracing, Kernel, KernelConfig, ProcessBuilder, Service, SimKernel, TaskPriority,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Default)]
struct Sampler {
    readings: AtomicU64,
}

impl Service for Sampler {
    fn setup(&self) {
        info!("Sampler calibrated");
    }

    fn service(&self) {
        self.readings.fetch_add(1, Ordering::Relaxed);
    }

    fn cleanup(&self) {
        info!(readings = self.readings.load(Ordering::Relaxed), "Sampler released");
    }

    fn on_enable(&self) {
        info!("Sampler enabled");
    }

    fn on_disable(&self) {
        info!("Sampler disabled");
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = KernelConfig::from_env().context("Invalid kernel configuration")?;
    let kernel = Arc::new(SimKernel::with_config(config)?);
    info!(
        max_priorities = kernel.max_priorities(),
        capabilities = ?kernel.capabilities(),
        "RTOS process demo starting"
    );

    let beats = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&beats);
    let heartbeat = ProcessBuilder::new(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    })
    .with_name("heartbeat")
    .with_priority(TaskPriority::Hmi)
    .with_period(5)
    .build(kernel.clone());

    let sampler = ProcessBuilder::new(Sampler::default())
        .with_name("sampler")
        .with_priority(TaskPriority::Mid)
        .with_period(20)
        .build(kernel.clone());

    heartbeat.add(true)?;
    sampler.add(false)?;
    thread::sleep(Duration::from_millis(100));

    sampler.enable()?;
    thread::sleep(Duration::from_millis(100));

    heartbeat.disable();
    sampler.restart()?;
    thread::sleep(Duration::from_millis(100));

    heartbeat.destroy();
    sampler.destroy();
    thread::sleep(Duration::from_millis(50));

    let report = serde_json::json!({
        "heartbeat": {
            "beats": beats.load(Ordering::Relaxed),
            "state": heartbeat.state().to_string(),
            "stats": heartbeat.stats(),
        },
        "sampler": {
            "readings": sampler.service().readings.load(Ordering::Relaxed),
            "state": sampler.state().to_string(),
            "stats": sampler.stats(),
        },
        "live_tasks": kernel.task_count(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("RTOS process demo finished");
    Ok(())
}
