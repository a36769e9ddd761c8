/*!
 * Task Tracing
 * Structured tracing setup and a span covering one native task's body
 *
 * Every log line emitted while a task body runs carries the task name and
 * native handle, so interleaved output from several tasks stays readable.
 */

use crate::core::types::NativeHandle;
use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - RTOS_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RTOS_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span entered for the lifetime of a task body
pub struct TaskSpan {
    span: tracing::Span,
    start: Instant,
}

impl TaskSpan {
    pub fn new(task: &str, handle: Option<NativeHandle>) -> Self {
        let span = span!(
            Level::DEBUG,
            "task",
            task = task,
            handle = tracing::field::display(
                handle.map_or_else(|| "-".to_string(), |h| h.to_string())
            ),
            outcome = tracing::field::Empty,
            runtime_ms = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    /// Record how the body ended: "returned", "panicked" or "deleted"
    pub fn record_outcome(&self, outcome: &'static str) {
        self.span.record("outcome", outcome);
    }
}

impl Drop for TaskSpan {
    fn drop(&mut self) {
        let runtime = self.start.elapsed();
        self.span.record("runtime_ms", runtime.as_millis() as u64);
        let _entered = self.span.enter();
        debug!(runtime_ms = runtime.as_millis() as u64, "Task body left");
    }
}
