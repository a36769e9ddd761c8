/*!
 * Kernel Configuration Tests
 * Environment loading and priority band mapping on configured kernels
 */

use pretty_assertions::assert_eq;
use rtos_process::{
    Kernel, KernelConfig, KernelError, ProcessBuilder, SimKernel, TaskPriority,
};
use serial_test::serial;
use std::env;
use std::sync::Arc;
use std::time::Duration;

const VARS: [&str; 5] = [
    "RTOS_MAX_PRIORITIES",
    "RTOS_TICK_MICROS",
    "RTOS_NO_DELETE",
    "RTOS_NO_ABORT_DELAY",
    "RTOS_NO_STACK_HEADROOM",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    assert_eq!(KernelConfig::from_env().unwrap(), KernelConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    env::set_var("RTOS_MAX_PRIORITIES", "32");
    env::set_var("RTOS_TICK_MICROS", "250");
    env::set_var("RTOS_NO_DELETE", "1");
    env::set_var("RTOS_NO_STACK_HEADROOM", "true");

    let config = KernelConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.max_priorities, 32);
    assert_eq!(config.tick, Duration::from_micros(250));
    assert!(!config.capabilities.delete);
    assert!(config.capabilities.abort_delay);
    assert!(!config.capabilities.stack_headroom);
}

#[test]
#[serial]
fn test_from_env_rejects_garbage() {
    clear_env();
    env::set_var("RTOS_MAX_PRIORITIES", "plenty");
    let err = KernelConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(err, KernelError::InvalidConfig(_)));
}

#[test]
#[serial]
fn test_from_env_rejects_zero_priorities() {
    clear_env();
    env::set_var("RTOS_MAX_PRIORITIES", "0");
    let result = KernelConfig::from_env();
    clear_env();

    assert!(result.is_err());
}

#[test]
fn test_invalid_config_refused_by_kernel() {
    let config = KernelConfig::default().with_tick(Duration::ZERO);
    assert!(SimKernel::with_config(config).is_err());
}

#[test]
fn test_bands_follow_kernel_levels() {
    for (levels, expected) in [
        (1, [0, 0, 0, 0, 0, 0]),
        (4, [0, 1, 1, 2, 3, 3]),
        (7, [0, 1, 2, 3, 5, 6]),
    ] {
        let kernel = Arc::new(
            SimKernel::with_config(KernelConfig::default().with_max_priorities(levels)).unwrap(),
        );
        let natives: Vec<u32> = TaskPriority::ALL
            .iter()
            .map(|band| {
                ProcessBuilder::new(|| {})
                    .with_priority(*band)
                    .build(kernel.clone())
                    .native_priority()
            })
            .collect();

        assert_eq!(natives, expected.to_vec(), "{levels} levels");
        assert_eq!(kernel.max_priorities(), levels);
    }
}

#[test]
fn test_native_priority_override_is_capped() {
    let kernel = Arc::new(
        SimKernel::with_config(KernelConfig::default().with_max_priorities(5)).unwrap(),
    );
    let process = ProcessBuilder::new(|| {})
        .with_priority(TaskPriority::Low)
        .with_native_priority(12)
        .build(kernel);

    assert_eq!(process.native_priority(), 4);
    assert_eq!(process.priority(), TaskPriority::Low);
}
