//! # Validation Checks
//!
//! A [`Check`] is a pure predicate over a single field slot. Checks are
//! stateless, total (they never fail or panic, whatever the value looks
//! like), and shareable: one `Arc<dyn Check>` may be attached to any number
//! of fields across any number of resources.
//!
//! A [`CheckCollection`] runs every contained check and merges the results.
//! There is no short-circuiting: a caller always sees every violation at
//! once, in the order the checks were declared.

use std::sync::Arc;

use serde::Serialize;

use crate::messages::{keys, MessageLookup};
use crate::value::{FieldValue, Slot};

/// The outcome of validating a value: valid, or invalid with an ordered
/// list of reasons.
///
/// Immutable value type. Invariant: the result is invalid iff the reason
/// list is non-empty. Validation failures travel as data; they are never
/// raised as errors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    reasons: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            reasons: Vec::new(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            reasons: vec![reason.into()],
        }
    }

    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self { reasons }
    }

    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Concatenates two results, preserving reason order.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.reasons.extend(other.reasons);
        self
    }
}

/// A pure predicate over a single field slot.
///
/// `validate` must be total for any slot state, including [`Slot::Missing`]
/// and [`Slot::Null`], and must not mutate anything. Reason text is resolved
/// through the injected [`MessageLookup`] so it can be localized without
/// changing check logic.
pub trait Check: Send + Sync {
    fn validate(&self, value: Slot<&FieldValue>, messages: &dyn MessageLookup) -> ValidationResult;
}

/// An ordered, immutable set of checks attached to one field.
///
/// Built once at resource-declaration time and reused for every validate
/// call. Insertion order is meaningful: reasons surface in the order the
/// checks were declared.
#[derive(Clone, Default)]
pub struct CheckCollection {
    checks: Vec<Arc<dyn Check>>,
}

impl CheckCollection {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Attaches an already-shared check.
    pub fn with_shared(mut self, check: Arc<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Runs every check against the same slot and merges the results.
    ///
    /// The merged result is valid iff all member results are valid; its
    /// reasons are the concatenation, in declaration order, of every invalid
    /// member's reasons.
    pub fn validate(
        &self,
        value: Slot<&FieldValue>,
        messages: &dyn MessageLookup,
    ) -> ValidationResult {
        self.checks
            .iter()
            .map(|check| check.validate(value, messages))
            .fold(ValidationResult::valid(), ValidationResult::merge)
    }
}

/// Rejects empty and whitespace-only text.
///
/// Absent and null slots count as empty; a field whose nullability should
/// exempt it simply does not attach this check. Non-text values pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Check for NotEmpty {
    fn validate(&self, value: Slot<&FieldValue>, messages: &dyn MessageLookup) -> ValidationResult {
        let empty = match value {
            Slot::Missing | Slot::Null => true,
            Slot::Present(FieldValue::Text(s)) => s.trim().is_empty(),
            Slot::Present(_) => false,
        };
        if empty {
            ValidationResult::invalid(messages.resolve(keys::NOT_EMPTY))
        } else {
            ValidationResult::valid()
        }
    }
}

/// Rejects text longer than `limit` characters. Absent, null, and non-text
/// values pass; emptiness is [`NotEmpty`]'s business.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength {
    pub limit: usize,
}

impl MaxLength {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Check for MaxLength {
    fn validate(&self, value: Slot<&FieldValue>, messages: &dyn MessageLookup) -> ValidationResult {
        match value {
            Slot::Present(FieldValue::Text(s)) if s.chars().count() > self.limit => {
                let template = messages.resolve(keys::MAX_LENGTH);
                ValidationResult::invalid(template.replace("{limit}", &self.limit.to_string()))
            }
            _ => ValidationResult::valid(),
        }
    }
}

/// Rejects numeric values below `min`. Absent, null, and non-numeric values
/// pass.
#[derive(Debug, Clone, Copy)]
pub struct MinValue {
    pub min: f64,
}

impl MinValue {
    pub fn new(min: f64) -> Self {
        Self { min }
    }
}

impl Check for MinValue {
    fn validate(&self, value: Slot<&FieldValue>, messages: &dyn MessageLookup) -> ValidationResult {
        let below = match value {
            Slot::Present(FieldValue::Integer(i)) => (*i as f64) < self.min,
            Slot::Present(FieldValue::Float(f)) => *f < self.min,
            _ => false,
        };
        if below {
            let template = messages.resolve(keys::MIN_VALUE);
            ValidationResult::invalid(template.replace("{min}", &self.min.to_string()))
        } else {
            ValidationResult::valid()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::StaticMessages;

    fn text(s: &str) -> Slot<FieldValue> {
        Slot::Present(FieldValue::Text(s.to_string()))
    }

    #[test]
    fn invalid_iff_reasons_nonempty() {
        assert!(ValidationResult::valid().is_valid());
        assert!(!ValidationResult::invalid("nope").is_valid());
        assert!(ValidationResult::from_reasons(Vec::new()).is_valid());
    }

    #[test]
    fn not_empty_rejects_whitespace_only_with_one_reason() {
        let messages = StaticMessages::new();
        for s in ["", " ", "\t", "  \n "] {
            let value = text(s);
            let result = NotEmpty.validate(value.as_ref(), &messages);
            assert!(!result.is_valid(), "{s:?} should be invalid");
            assert_eq!(result.reasons().len(), 1);
            assert_eq!(result.reasons()[0], "must not be empty");
        }
        let hi = text("hi");
        assert!(NotEmpty.validate(hi.as_ref(), &messages).is_valid());
        let padded = text(" x ");
        assert!(NotEmpty.validate(padded.as_ref(), &messages).is_valid());
    }

    #[test]
    fn not_empty_treats_missing_and_null_as_empty() {
        let messages = StaticMessages::new();
        assert!(!NotEmpty.validate(Slot::Missing, &messages).is_valid());
        assert!(!NotEmpty.validate(Slot::Null, &messages).is_valid());
    }

    #[test]
    fn max_length_counts_characters() {
        let messages = StaticMessages::new();
        let check = MaxLength::new(3);
        let ok = text("abc");
        assert!(check.validate(ok.as_ref(), &messages).is_valid());
        let long = text("abcd");
        let result = check.validate(long.as_ref(), &messages);
        assert_eq!(result.reasons(), ["must be at most 3 characters"]);
        // Absent values are MaxLength's business only when present.
        assert!(check.validate(Slot::Missing, &messages).is_valid());
    }

    #[test]
    fn min_value_covers_integers_and_floats() {
        let messages = StaticMessages::new();
        let check = MinValue::new(1.0);
        let one = FieldValue::Integer(1);
        assert!(check.validate(Slot::Present(&one), &messages).is_valid());
        let half = FieldValue::Float(0.5);
        assert!(!check.validate(Slot::Present(&half), &messages).is_valid());
    }

    #[test]
    fn collection_runs_every_check_in_declaration_order() {
        let messages = StaticMessages::new();
        let checks = CheckCollection::new()
            .with(NotEmpty)
            .with(MaxLength::new(3));

        // Four spaces fail both checks; both reasons surface, declaration order.
        let spaces = text("    ");
        let result = checks.validate(spaces.as_ref(), &messages);
        assert_eq!(
            result.reasons(),
            ["must not be empty", "must be at most 3 characters"]
        );

        // A missing slot only trips NotEmpty.
        let result = checks.validate(Slot::Missing, &messages);
        assert_eq!(result.reasons(), ["must not be empty"]);

        // Declaring the checks in the other order flips the reason order.
        let flipped = CheckCollection::new()
            .with(MaxLength::new(3))
            .with(NotEmpty);
        let result = flipped.validate(spaces.as_ref(), &messages);
        assert_eq!(
            result.reasons(),
            ["must be at most 3 characters", "must not be empty"]
        );
    }

    #[test]
    fn collection_concatenates_reasons_without_short_circuit() {
        let messages = StaticMessages::new();

        struct AlwaysInvalid(&'static str);
        impl Check for AlwaysInvalid {
            fn validate(
                &self,
                _value: Slot<&FieldValue>,
                _messages: &dyn MessageLookup,
            ) -> ValidationResult {
                ValidationResult::invalid(self.0)
            }
        }

        let checks = CheckCollection::new()
            .with(AlwaysInvalid("first"))
            .with(AlwaysInvalid("second"));
        let anything = text("anything");
        let result = checks.validate(anything.as_ref(), &messages);
        assert_eq!(result.reasons(), ["first", "second"]);
    }

    #[test]
    fn shared_checks_can_be_reused_across_collections() {
        let messages = StaticMessages::new();
        let shared: Arc<dyn Check> = Arc::new(NotEmpty);
        let a = CheckCollection::new().with_shared(shared.clone());
        let b = CheckCollection::new().with_shared(shared);
        assert!(!a.validate(Slot::Null, &messages).is_valid());
        assert!(!b.validate(Slot::Null, &messages).is_valid());
    }
}
