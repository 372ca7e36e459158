
use derive_more::{Deref, Display, FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ulid::Ulid as WrappedUlid;

///
/// RecordId
///
/// Stable identity key carried by every record. ULIDs keep ids sortable
/// by creation time while staying opaque to callers.
///
/// Returned ids are public correlation/reporting/lookup values, not
/// authority-bearing tokens.
///

#[derive(Clone, Copy, Debug, Deref, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct RecordId(WrappedUlid);

impl RecordId {
    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(WrappedUlid::from_parts(timestamp_ms, random))
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<WrappedUlid> for RecordId {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        WrappedUlid::from_string(&text)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

///
/// FieldValue
///
/// Owned scalar union used for snapshots and dirty sets. Covers exactly
/// the families the reconciler compares; equality includes
/// null-vs-non-null distinctions.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    Id(RecordId),
}

impl FieldValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Id(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<RecordId> for FieldValue {
    fn from(v: RecordId) -> Self {
        Self::Id(v)
    }
}

impl<V> From<Option<V>> for FieldValue
where
    V: Into<FieldValue>,
{
    fn from(v: Option<V>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
