//! Metrics sink boundary.
//!
//! This module is the only allowed bridge between engine logic and the
//! global metrics state.

use crate::{error::ErrorKind, obs::metrics};

///
/// OpKind
///

#[derive(Clone, Copy, Debug)]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    OpFinish {
        kind: OpKind,
        entity_path: &'static str,
        rows_written: u64,
    },
    OpFailed {
        kind: OpKind,
        entity_path: &'static str,
        error_kind: ErrorKind,
    },
    NoOpUpdate {
        entity_path: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-wide sink that writes into global metrics state.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::OpFinish {
                kind,
                entity_path,
                rows_written,
            } => {
                metrics::with_state_mut(|m| {
                    bump_calls(&mut m.ops, kind);
                    m.ops.rows_written = m.ops.rows_written.saturating_add(rows_written);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    bump_entity_calls(entry, kind);
                    entry.rows_written = entry.rows_written.saturating_add(rows_written);
                });
            }

            MetricsEvent::OpFailed {
                kind,
                entity_path,
                error_kind,
            } => {
                metrics::with_state_mut(|m| {
                    bump_calls(&mut m.ops, kind);
                    m.ops.failures = m.ops.failures.saturating_add(1);

                    let by_kind = m.failures_by_kind.entry(error_kind.to_string()).or_default();
                    *by_kind = by_kind.saturating_add(1);

                    // failures still count as calls at the entity level
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    bump_entity_calls(entry, kind);
                    entry.failures = entry.failures.saturating_add(1);
                });
            }

            MetricsEvent::NoOpUpdate { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.update_calls = m.ops.update_calls.saturating_add(1);
                    m.ops.no_op_updates = m.ops.no_op_updates.saturating_add(1);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.update_calls = entry.update_calls.saturating_add(1);
                });
            }
        }
    }
}

fn bump_calls(ops: &mut metrics::EventOps, kind: OpKind) {
    match kind {
        OpKind::Create => ops.create_calls = ops.create_calls.saturating_add(1),
        OpKind::Update => ops.update_calls = ops.update_calls.saturating_add(1),
        OpKind::Delete => ops.delete_calls = ops.delete_calls.saturating_add(1),
    }
}

fn bump_entity_calls(entry: &mut metrics::EntityCounters, kind: OpKind) {
    match kind {
        OpKind::Create => entry.create_calls = entry.create_calls.saturating_add(1),
        OpKind::Update => entry.update_calls = entry.update_calls.saturating_add(1),
        OpKind::Delete => entry.delete_calls = entry.delete_calls.saturating_add(1),
    }
}

pub(crate) fn record(event: MetricsEvent) {
    GlobalMetricsSink.record(event);
}

/// Point-in-time copy of the global metrics counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all global metrics counters.
pub fn metrics_reset_all() {
    metrics::reset()
}
