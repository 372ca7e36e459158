//! ## Crate layout
//! - `core::tristate`: tri-state payload values and their wire contract.
//! - `core::engine`: the snapshot/diff reconciliation engine.
//! - `core::store`: the unit-of-work storage port.
//! - `core::outcome` / `core::error`: the closed operation taxonomy.
//! - `core::obs`: process-wide operation counters.
//!
//! The `prelude` module mirrors the runtime surface used by callers that
//! define records and payloads.

pub use patchdb_core as core;

// re-exported so field tables can be declared without importing the
// core crate directly
pub use patchdb_core::field_table;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Caller Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        cancel::CancelToken,
        engine::{HookContext, Reconciler},
        error::{ErrorKind, OpError},
        obs::{metrics_report, metrics_reset_all},
        outcome::Outcome,
        snapshot::{DirtyFields, Snapshot},
        store::{FailureSignal, StoreFailure, UnitOfWork},
        traits::{CreateView, FieldAccessor, PatchView, Record, TouchedFields},
        tristate::TriState,
        value::{FieldValue, RecordId},
    };
    pub use serde::{Deserialize, Serialize};
}
