/*!
 * Monitoring
 * Structured tracing for task bodies and the demo binary
 */

mod tracer;

pub use tracer::{init_tracing, TaskSpan};
