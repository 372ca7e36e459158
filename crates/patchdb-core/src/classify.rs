use crate::{
    error::{ErrorKind, OpError},
    store::{FailureSignal, StoreFailure},
};

/// Map one raw storage failure onto the closed outcome taxonomy.
///
/// Total by construction: a single ordered match with a mandatory
/// default arm, so no failure signature ever falls through
/// unclassified. Cancellation takes priority over any wrapped storage
/// signal. The backend's raw message always lands in `detail`, never in
/// the operator-facing message.
#[must_use]
pub fn classify(failure: StoreFailure) -> OpError {
    if failure.cancelled {
        return OpError::cancelled().with_detail(failure.message);
    }

    match failure.signal {
        FailureSignal::ConcurrentModification => OpError::new(
            ErrorKind::Conflict,
            "record was modified or removed by another process",
        ),
        FailureSignal::UniqueViolation => {
            OpError::new(ErrorKind::Conflict, "unique constraint violated")
        }
        FailureSignal::NotNullViolation => OpError::new(
            ErrorKind::RequiredFieldMissing,
            "attempted to write null into a required column",
        ),
        FailureSignal::ForeignKeyMissingParent => OpError::new(
            ErrorKind::ReferentialIntegrity,
            "referential integrity violation: referenced record does not exist",
        ),
        FailureSignal::ForeignKeyStillReferenced => OpError::new(
            ErrorKind::ReferentialIntegrity,
            "referential integrity violation: record is still referenced",
        ),
        // Mandatory default arm; unknown signatures are diagnostics,
        // never rethrown.
        _ => OpError::new(ErrorKind::Unexpected, "unexpected storage failure"),
    }
    .with_detail(failure.message)
}
