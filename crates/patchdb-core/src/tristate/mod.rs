
use serde::{Deserialize, Deserializer, Serialize, Serializer};

///
/// TriState
///
/// Wire-level optional value with three distinguishable states:
/// - `Absent`: the key was not present in the payload at all.
/// - `Null`: the key was present with a literal null.
/// - `Value`: the key was present with a typed value.
///
/// `Value` never holds a wire null; a null payload decodes to `Null`.
/// Instances are constructed once during request decoding and read-only
/// thereafter.
///
/// Wire contract: serialization emits the value for `Value` and literal
/// null for `Null`; `Absent` must omit the key entirely. Key omission
/// cannot be expressed from inside a value serializer, so payload
/// fields pair this type with the field attributes
/// `#[serde(default, skip_serializing_if = "TriState::is_absent")]`.
/// The omit-on-absent asymmetry is what lets one payload type serve as
/// both a creation DTO and a patch DTO.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum TriState<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> TriState<T> {
    /// A key not present in the payload.
    #[must_use]
    pub const fn absent() -> Self {
        Self::Absent
    }

    /// A key present with an explicit null.
    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }

    /// Route a nullable value: `None` becomes `Null`, never `Value`.
    #[must_use]
    pub fn from_value(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }

    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub const fn is_absent_or_null(&self) -> bool {
        !self.is_value()
    }

    /// Borrow the contained value, if any.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// The nullable-write form: `Value(v)` yields `Some(v)`, both null
    /// states collapse to `None`. Used when writing to a nullable
    /// attribute, where `Null` and the attribute's empty state coincide.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Return the contained value.
    ///
    /// # Panics
    /// Panics when the state is not `Value`; intended only where
    /// presence has already been checked.
    #[must_use]
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Self::Value(value) => value,
            Self::Absent | Self::Null => {
                panic!("called `unwrap()` on a non-value TriState")
            }
        }
    }

    /// Return the contained value, panicking with `msg` otherwise.
    ///
    /// # Panics
    /// Panics when the state is not `Value`.
    #[must_use]
    #[track_caller]
    pub fn expect(self, msg: &str) -> T {
        match self {
            Self::Value(value) => value,
            Self::Absent | Self::Null => panic!("{msg}"),
        }
    }

    /// Return the contained value or `fallback`.
    #[must_use]
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Absent | Self::Null => fallback,
        }
    }

    /// Return the contained value or the result of `fallback`.
    #[must_use]
    pub fn unwrap_or_else(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Absent | Self::Null => fallback(),
        }
    }

    /// Return self when it holds a value, otherwise `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        if self.is_value() { self } else { fallback }
    }

    /// Map the contained value, preserving the null state otherwise.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TriState<U> {
        match self {
            Self::Value(value) => TriState::Value(f(value)),
            Self::Absent => TriState::Absent,
            Self::Null => TriState::Null,
        }
    }

    #[must_use]
    pub const fn as_ref(&self) -> TriState<&T> {
        match self {
            Self::Value(value) => TriState::Value(value),
            Self::Absent => TriState::Absent,
            Self::Null => TriState::Null,
        }
    }
}

impl<T> From<Option<T>> for TriState<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_value(value)
    }
}

impl<T: Serialize> Serialize for TriState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => serializer.serialize_some(value),
            // Absent only reaches a serializer when the payload field
            // forgot `skip_serializing_if`; emit null rather than a
            // value the wire contract cannot represent.
            Self::Null | Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TriState<T> {
    // A missing key never reaches this impl; `#[serde(default)]` on the
    // payload field yields `Absent` for it.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from_value)
    }
}
