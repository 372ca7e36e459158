use crate::error::{ErrorKind, OpError};
use serde::{Deserialize, Serialize};

///
/// Outcome
///
/// Closed result of a mutating operation: success with data (create
/// operations carry the generated identity), success without data
/// (update/delete), or a typed failure. No panic or untyped error
/// crosses the engine boundary; this is the whole surface.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    OkVoid,
    Err(OpError),
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Ok(_) | Self::OkVoid)
    }

    #[must_use]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// The failure tag, when this outcome is a failure.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Err(err) => Some(err.kind),
            Self::Ok(_) | Self::OkVoid => None,
        }
    }

    /// Extract the success payload, if any.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::OkVoid | Self::Err(_) => None,
        }
    }

    /// Extract the failure, if any.
    #[must_use]
    pub fn err(self) -> Option<OpError> {
        match self {
            Self::Err(err) => Some(err),
            Self::Ok(_) | Self::OkVoid => None,
        }
    }

    /// Map the success payload, preserving void and failure states.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::OkVoid => Outcome::OkVoid,
            Self::Err(err) => Outcome::Err(err),
        }
    }

    /// Re-tag a failed outcome for a different payload type.
    /// Returns `None` when the outcome is a success.
    #[must_use]
    pub fn into_error<U>(self) -> Option<Outcome<U>> {
        match self {
            Self::Err(err) => Some(Outcome::Err(err)),
            Self::Ok(_) | Self::OkVoid => None,
        }
    }

    /// Lift a data-carrying result into an outcome.
    pub fn from_result(result: Result<T, OpError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Err(err),
        }
    }

    /// Lift a void result into an outcome (`Ok(())` becomes `OkVoid`).
    pub fn from_void(result: Result<(), OpError>) -> Self {
        match result {
            Ok(()) => Self::OkVoid,
            Err(err) => Self::Err(err),
        }
    }
}

impl<T> From<OpError> for Outcome<T> {
    fn from(err: OpError) -> Self {
        Self::Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_results_lift_to_ok_void() {
        let outcome = Outcome::<()>::from_void(Ok(()));
        assert_eq!(outcome, Outcome::OkVoid);
        assert!(outcome.is_success());
    }

    #[test]
    fn failures_keep_their_kind_across_retagging() {
        let outcome = Outcome::<u64>::from(OpError::validation("bad payload"));
        assert_eq!(outcome.kind(), Some(ErrorKind::Validation));

        let retagged = outcome.into_error::<String>().expect("failure retags");
        assert_eq!(retagged.kind(), Some(ErrorKind::Validation));
    }

    #[test]
    fn successes_never_retag() {
        assert!(Outcome::Ok(1u64).into_error::<String>().is_none());
        assert!(Outcome::<u64>::OkVoid.into_error::<String>().is_none());
    }
}
