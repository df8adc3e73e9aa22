//! # Domain Scalars
//!
//! The closed set of scalar values a mapped field can hold, plus [`Slot`],
//! the three-state cell that keeps "property absent" and "property explicitly
//! null" distinguishable all the way through unpacking.

use std::fmt;

use time::OffsetDateTime;

/// A single scalar domain value.
///
/// Fields of a mapped resource always hold one of these variants; the
/// matching `ScalarMapper` variant converts it to and from its wire
/// representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Timestamp(OffsetDateTime),
}

impl FieldValue {
    /// Short name used in mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Flag(_) => "flag",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Flag(b) => write!(f, "{b}"),
            FieldValue::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<OffsetDateTime> for FieldValue {
    fn from(value: OffsetDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// A value cell with three states: absent, explicitly null, or present.
///
/// Wire objects distinguish a property that is not there from a property set
/// to `null`. Mappers preserve that distinction on unpack (the timestamp
/// mapper keeps all three states apart; the flag mapper collapses absent and
/// null to `false`), so the cell type has to carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<T> {
    Missing,
    Null,
    Present(T),
}

impl<T> Slot<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Slot::Present(_))
    }

    /// Borrowing view of the slot.
    pub fn as_ref(&self) -> Slot<&T> {
        match self {
            Slot::Missing => Slot::Missing,
            Slot::Null => Slot::Null,
            Slot::Present(value) => Slot::Present(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Slot<U> {
        match self {
            Slot::Missing => Slot::Missing,
            Slot::Null => Slot::Null,
            Slot::Present(value) => Slot::Present(f(value)),
        }
    }

    /// Collapses the absent/null distinction for callers that do not care.
    pub fn into_option(self) -> Option<T> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }
}
