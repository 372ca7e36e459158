use crate::{snapshot::DirtyFields, traits::Record, value::RecordId};
use thiserror::Error as ThisError;

///
/// FailureSignal
///
/// Well-known storage failure signatures recognized by the classifier.
/// The surface is open-ended: adapters for new backends may grow it, so
/// downstream matches carry a mandatory default arm.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum FailureSignal {
    /// The target changed or vanished between attach and persist.
    ConcurrentModification,
    UniqueViolation,
    NotNullViolation,
    /// A child row references a parent that does not exist.
    ForeignKeyMissingParent,
    /// The target is still referenced by child rows.
    ForeignKeyStillReferenced,
    /// The backend rejected the write for a reason it did report.
    StorageRejected,
    Other,
}

///
/// StoreFailure
///
/// Raw failure surfaced by a persistence adapter: the recognized
/// signature (if any), the backend's raw message, and whether a
/// cooperative cancellation was observed while the write was in flight.
/// Never returned to callers directly; always classified first.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("store failure ({signal:?}): {message}")]
pub struct StoreFailure {
    pub cancelled: bool,
    pub signal: FailureSignal,
    pub message: String,
}

impl StoreFailure {
    pub fn new(signal: FailureSignal, message: impl Into<String>) -> Self {
        Self {
            cancelled: false,
            signal,
            message: message.into(),
        }
    }

    /// A failure raised while a cancellation signal was pending.
    /// Classification lets cancellation win over the wrapped signal.
    pub fn cancelled(signal: FailureSignal, message: impl Into<String>) -> Self {
        Self {
            cancelled: true,
            signal,
            message: message.into(),
        }
    }
}

///
/// UnitOfWork
///
/// Narrow persistence port consumed by the reconciler; the engine
/// depends on this contract and never on a query language. One unit of
/// work serves exactly one operation and holds no state beyond it.
///

pub trait UnitOfWork<E: Record> {
    /// Attach the identity to the pending write set without a prior
    /// read; the caller supplies only the identity, not prior state.
    fn attach(&mut self, id: RecordId) -> Result<(), StoreFailure>;

    /// Stage a brand-new record for insertion.
    fn insert(&mut self, entity: &E) -> Result<(), StoreFailure>;

    /// Stage removal of the attached identity.
    fn remove(&mut self, id: RecordId) -> Result<(), StoreFailure>;

    /// Mark exactly the given attributes for the pending write; the
    /// persist step must not widen this to a full-row rewrite.
    fn mark_dirty(&mut self, entity: &E, fields: &DirtyFields);

    /// Flush staged work, returning the affected row count.
    fn save(&mut self) -> Result<u64, StoreFailure>;
}
