//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Engine logic MUST NOT depend on `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, OpKind, metrics_report, metrics_reset_all};
