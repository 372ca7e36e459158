use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{LazyLock, Mutex, PoisonError},
};

static STATE: LazyLock<Mutex<EventReport>> = LazyLock::new(|| Mutex::new(EventReport::default()));

///
/// EventReport
///
/// Ephemeral, in-memory counters for reconciliation operations, global
/// and per record path. Diagnostics only; counters saturate on
/// overflow.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,

    /// Failure totals keyed by the outcome taxonomy's snake label.
    pub failures_by_kind: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    pub create_calls: u64,
    pub update_calls: u64,
    pub delete_calls: u64,

    /// Updates that produced an empty dirty set and skipped the store.
    pub no_op_updates: u64,
    pub rows_written: u64,
    pub failures: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub create_calls: u64,
    pub update_calls: u64,
    pub delete_calls: u64,
    pub rows_written: u64,
    pub failures: u64,
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventReport) -> R) -> R {
    let mut state = STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut state)
}

/// Point-in-time copy of the global counters.
#[must_use]
pub(crate) fn report() -> EventReport {
    with_state_mut(|state| state.clone())
}

pub(crate) fn reset() {
    with_state_mut(|state| *state = EventReport::default());
}
