use crate::{
    error::OpError,
    value::{FieldValue, RecordId},
};
use std::collections::BTreeSet;

///
/// Record
///
/// A persisted domain record targeted by partial updates. The field
/// table is declared statically per record type; the reconciler never
/// discovers attributes at runtime.
///

pub trait Record: Sized + 'static {
    /// Fully-qualified record path, used in diagnostics and metrics.
    const PATH: &'static str;

    /// Statically-declared attribute table: name plus accessor, one
    /// entry per diffable attribute.
    const FIELDS: &'static [FieldAccessor<Self>];

    /// The record's stable identity key.
    fn id(&self) -> RecordId;

    /// Construct a blank record carrying only its identity.
    ///
    /// This is what lets the reconciler attach a target to a unit of
    /// work without a prior fetch round-trip.
    fn from_id(id: RecordId) -> Self;
}

///
/// FieldAccessor
///
/// One entry of a record's static field table.
///

#[derive(Clone, Copy)]
pub struct FieldAccessor<E> {
    pub name: &'static str,
    pub get: fn(&E) -> FieldValue,
}

impl<E> FieldAccessor<E> {
    /// Read the attribute's current value from the record.
    #[must_use]
    pub fn read(&self, entity: &E) -> FieldValue {
        (self.get)(entity)
    }
}

/// Attribute names explicitly named by a payload, in table order.
pub type TouchedFields = BTreeSet<&'static str>;

///
/// PatchView
///
/// Decoded partial-update payload for one record type: one tri-state
/// field per mutable attribute, named identically to the attribute.
/// Owned by the request boundary and never retained past the operation.
///

pub trait PatchView<E: Record> {
    /// Cross-field business rules, checked before any mutation occurs.
    fn validate(&self) -> Result<(), OpError> {
        Ok(())
    }

    /// Write every non-absent field into the record and return the
    /// attribute names the payload explicitly named. Explicit nulls are
    /// written as the attribute's empty state, not skipped.
    fn apply(&self, entity: &mut E) -> TouchedFields;
}

///
/// CreateView
///
/// Decoded creation payload for one record type.
///

pub trait CreateView<E: Record> {
    /// Cross-field business rules, checked before the record is built.
    fn validate(&self) -> Result<(), OpError> {
        Ok(())
    }

    /// Build the record this payload describes.
    fn into_record(self) -> E;
}
