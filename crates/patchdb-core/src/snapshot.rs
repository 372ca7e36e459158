use crate::{
    traits::{Record, TouchedFields},
    value::FieldValue,
};
use derive_more::{Deref, IntoIterator};
use std::collections::BTreeMap;

///
/// Snapshot
///
/// Immutable, field-keyed capture of a record's in-memory values at a
/// fixed point, taken by copy through the static field table. Created
/// once per operation, used as the diff baseline, then discarded; there
/// is no mutating API, so the baseline cannot be disturbed by the same
/// operation it freezes.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Snapshot {
    /// Capture every table attribute of `entity` by value.
    #[must_use]
    pub fn capture<E: Record>(entity: &E) -> Self {
        let values = E::FIELDS
            .iter()
            .map(|field| (field.name, field.read(entity)))
            .collect();

        Self { values }
    }

    /// Baseline value for an attribute, if the table declares it.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

///
/// DirtyFields
///
/// The minimal set of attributes to persist: everything explicitly
/// named by the payload, unioned with every attribute whose value
/// drifted from the snapshot baseline. Consumed exactly once by the
/// persist step.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct DirtyFields {
    #[deref]
    #[into_iterator(owned, ref)]
    values: BTreeMap<&'static str, FieldValue>,
}

impl DirtyFields {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    /// Attribute names in stable order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

/// Compute the dirty-field set for one reconciliation.
///
/// Attributes named by the payload stay dirty even when their value did
/// not change; explicit intent must survive to the storage layer so
/// side effects (timestamps, triggers) still fire. This deliberately
/// breaks idempotence for explicit writes and is pinned by tests.
/// Un-named attributes are diffed against the baseline by value
/// equality, including null-vs-non-null.
#[must_use]
pub fn diff_against<E: Record>(
    entity: &E,
    baseline: &Snapshot,
    touched: &TouchedFields,
) -> DirtyFields {
    let mut dirty = DirtyFields::new();

    for field in E::FIELDS {
        let current = field.read(entity);

        if touched.contains(field.name) || baseline.value(field.name) != Some(&current) {
            dirty.insert(field.name, current);
        }
    }

    dirty
}
