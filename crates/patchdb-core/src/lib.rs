//! Core runtime for patchdb: tri-state payload values, snapshot/diff
//! reconciliation, the storage port, and the closed outcome taxonomy.
#![warn(unreachable_pub)]

#[macro_use]
mod macros;

// public exports are one module level down
pub mod cancel;
pub mod classify;
pub mod engine;
pub mod error;
pub mod obs;
pub mod outcome;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod tristate;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, engines, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        traits::{CreateView, PatchView, Record, TouchedFields},
        tristate::TriState,
        value::{FieldValue, RecordId},
    };
}
