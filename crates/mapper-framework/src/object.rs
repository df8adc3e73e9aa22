//! # Object Mapper
//!
//! Composite codec for a whole resource record plus identity-key recovery.
//! An [`ObjectMapper`] is built once from declared [`MappedField`] entries
//! and is immutable afterwards; it holds one scalar mapper and one check
//! collection per field, so composition replaces inheritance.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::check::{Check, CheckCollection, ValidationResult};
use crate::error::{invariant_violation, MapperError};
use crate::mapper::{json_type_name, ScalarMapper};
use crate::messages::MessageLookup;
use crate::payload::{MediaType, RequestPayload, ResponseBody};
use crate::value::{FieldValue, Slot};

/// The wire-derived identity of a composite resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    Text(String),
    Number(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(s) => write!(f, "{s}"),
            Key::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Number(value)
    }
}

/// A dynamic, domain-typed record: one slot per declared field, addressed by
/// the field's local (domain) name. An entry that was never set is
/// [`Slot::Missing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    slots: BTreeMap<String, Slot<FieldValue>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.slots
            .insert(name.into(), Slot::Present(value.into()));
    }

    /// Marks the field explicitly null, as opposed to simply unset.
    pub fn set_null(&mut self, name: impl Into<String>) {
        self.slots.insert(name.into(), Slot::Null);
    }

    /// Returns the field to the unset state.
    pub fn clear(&mut self, name: &str) {
        self.slots.remove(name);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.set_null(name);
        self
    }

    pub fn slot(&self, name: &str) -> Slot<&FieldValue> {
        match self.slots.get(name) {
            None => Slot::Missing,
            Some(slot) => slot.as_ref(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.slot(name).into_option()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_integer)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_float)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_flag)
    }

    pub fn timestamp(&self, name: &str) -> Option<OffsetDateTime> {
        self.get(name).and_then(FieldValue::as_timestamp)
    }

    pub(crate) fn insert_slot(&mut self, name: impl Into<String>, slot: Slot<FieldValue>) {
        match slot {
            Slot::Missing => {}
            other => {
                self.slots.insert(name.into(), other);
            }
        }
    }
}

/// One declared field of a resource: domain name, wire name, scalar mapper,
/// and the checks attached to it. Created once at declaration time,
/// immutable afterwards.
#[derive(Clone)]
pub struct MappedField {
    local_name: String,
    wire_name: String,
    mapper: ScalarMapper,
    checks: CheckCollection,
}

impl MappedField {
    /// Declares a field whose wire name equals its local name.
    pub fn new(local_name: impl Into<String>, mapper: ScalarMapper) -> Self {
        let local_name = local_name.into();
        Self {
            wire_name: local_name.clone(),
            local_name,
            mapper,
            checks: CheckCollection::new(),
        }
    }

    /// Renames the field on the wire (renaming contract: wire and domain
    /// names are independent).
    pub fn wire_name(mut self, name: impl Into<String>) -> Self {
        self.wire_name = name.into();
        self
    }

    /// Attaches a check. Declaration order is the order reasons surface in.
    pub fn check(mut self, check: impl Check + 'static) -> Self {
        self.checks = self.checks.with(check);
        self
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn wire(&self) -> &str {
        &self.wire_name
    }

    pub fn mapper(&self) -> ScalarMapper {
        self.mapper
    }

    pub fn checks(&self) -> &CheckCollection {
        &self.checks
    }
}

/// Composite codec: maps a [`Record`] to and from a JSON wire object and
/// recovers the record's identity key.
pub struct ObjectMapper {
    fields: Vec<MappedField>,
    key_property: Option<String>,
}

impl ObjectMapper {
    /// Builds the mapper from declared fields. Duplicate local names are an
    /// authoring bug and abort construction.
    pub fn new(fields: Vec<MappedField>) -> Self {
        for (index, field) in fields.iter().enumerate() {
            if fields[..index]
                .iter()
                .any(|earlier| earlier.local_name == field.local_name)
            {
                invariant_violation(&format!("duplicate field declaration: {}", field.local_name));
            }
        }
        Self {
            fields,
            key_property: None,
        }
    }

    pub fn fields(&self) -> &[MappedField] {
        &self.fields
    }

    pub fn field(&self, local_name: &str) -> Option<&MappedField> {
        self.fields
            .iter()
            .find(|field| field.local_name == local_name)
    }

    pub fn response_type(&self) -> MediaType {
        MediaType::Json
    }

    /// Designates the identity field by local name. Idempotent; replaces any
    /// previous designation. Naming an undeclared field is an authoring bug.
    pub fn set_key_property(&mut self, local_name: &str) {
        if self.field(local_name).is_none() {
            invariant_violation(&format!(
                "key property {local_name:?} does not name a declared field"
            ));
        }
        self.key_property = Some(local_name.to_string());
    }

    pub fn key_property(&self) -> Option<&str> {
        self.key_property.as_deref()
    }

    /// Validates every field's slot against its check collection.
    ///
    /// The aggregate is valid iff every field is valid; reasons concatenate
    /// in field-declaration order. Validation is inspection only: it does
    /// not gate [`Self::pack`], which stays pure (callers enforce).
    pub fn validate(&self, record: &Record, messages: &dyn MessageLookup) -> ValidationResult {
        self.fields
            .iter()
            .map(|field| field.checks.validate(record.slot(&field.local_name), messages))
            .fold(ValidationResult::valid(), ValidationResult::merge)
    }

    /// Packs every set field under its wire name into one JSON object.
    ///
    /// The null short-circuit is uniform: missing and explicitly-null slots
    /// both pack as an omitted property, exactly like a standalone
    /// `pack(None)`. Packing never consults validity.
    pub fn pack_object(&self, record: &Record) -> Result<Value, MapperError> {
        let mut wire = Map::new();
        for field in &self.fields {
            if let Slot::Present(value) = record.slot(&field.local_name) {
                wire.insert(field.wire_name.clone(), field.mapper.pack_value(value)?);
            }
        }
        Ok(Value::Object(wire))
    }

    pub fn pack(&self, record: &Record) -> Result<RequestPayload, MapperError> {
        Ok(RequestPayload::Json(self.pack_object(record)?))
    }

    /// Decodes a wire object into a fully-typed record.
    ///
    /// Every declared field is unpacked from its wire property through its
    /// own scalar mapper; wire properties no field declares are ignored.
    pub fn unpack_object(&self, wire: &Value) -> Result<Record, MapperError> {
        let Some(object) = wire.as_object() else {
            return Err(MapperError::TypeMismatch {
                expected: "object",
                found: json_type_name(wire),
            });
        };
        let mut record = Record::new();
        for field in &self.fields {
            let raw = match object.get(&field.wire_name) {
                None => Slot::Missing,
                Some(value) => Slot::Present(value),
            };
            let slot = field.mapper.unpack_value(raw)?;
            record.insert_slot(field.local_name.clone(), slot);
        }
        Ok(record)
    }

    /// Awaits the JSON body and decodes it. Suspends until the body
    /// materializes.
    pub async fn unpack(&self, body: ResponseBody) -> Result<Record, MapperError> {
        let wire = body.json().await?;
        self.unpack_object(&wire)
    }

    /// Attempts to read just the identity field from a wire object.
    ///
    /// Returns `None` when no key property is designated, the property is
    /// missing or null, or its value is neither a string nor an integer.
    /// Sibling fields are never touched, so a malformed record still yields
    /// its key. This exists because identity must often be recovered from a
    /// creation response before the caller has, or wants, the full record.
    pub fn try_to_unpack_key(&self, wire: &Value) -> Option<Key> {
        let local_name = self.key_property.as_deref()?;
        let field = self.field(local_name)?;
        let raw = wire.as_object()?.get(&field.wire_name)?;
        match raw {
            Value::String(s) => Some(Key::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(Key::Number),
            _ => None,
        }
    }

    /// Suspending variant of [`Self::try_to_unpack_key`] over a raw body.
    pub async fn unpack_key(&self, body: ResponseBody) -> Result<Option<Key>, MapperError> {
        let wire = body.json().await?;
        Ok(self.try_to_unpack_key(&wire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::NotEmpty;
    use crate::messages::StaticMessages;
    use serde_json::json;
    use time::macros::datetime;

    fn article_mapper() -> ObjectMapper {
        let mut mapper = ObjectMapper::new(vec![
            MappedField::new("id", ScalarMapper::Integer),
            MappedField::new("title", ScalarMapper::Text).check(NotEmpty),
            MappedField::new("published", ScalarMapper::Flag),
            MappedField::new("created_at", ScalarMapper::Timestamp).wire_name("createdAt"),
        ]);
        mapper.set_key_property("id");
        mapper
    }

    #[test]
    fn pack_renames_fields_and_omits_unset_ones() {
        let mapper = article_mapper();
        let record = Record::new()
            .with("title", "Hello")
            .with("created_at", datetime!(2024-01-02 03:04:05 UTC));
        let wire = mapper.pack_object(&record).unwrap();
        assert_eq!(
            wire,
            json!({"title": "Hello", "createdAt": "2024-01-02T03:04:05Z"})
        );
    }

    #[test]
    fn null_slots_pack_as_omitted_properties() {
        let mapper = article_mapper();
        let record = Record::new().with("title", "t").with_null("created_at");
        let wire = mapper.pack_object(&record).unwrap();
        assert_eq!(wire, json!({"title": "t"}));
    }

    #[test]
    fn validate_reports_only_the_failing_fields_reasons() {
        let mapper = article_mapper();
        let messages = StaticMessages::new();
        let record = Record::new().with("title", "   ").with("published", true);
        let result = mapper.validate(&record, &messages);
        assert_eq!(result.reasons(), ["must not be empty"]);
    }

    #[test]
    fn unpack_ignores_unknown_wire_properties() {
        let mapper = article_mapper();
        let record = mapper
            .unpack_object(&json!({
                "id": 7,
                "title": "Hi",
                "unknownField": {"anything": true}
            }))
            .unwrap();
        assert_eq!(record.integer("id"), Some(7));
        assert_eq!(record.text("title"), Some("Hi"));
        assert_eq!(record.get("unknownField"), None);
    }

    #[test]
    fn unpack_keeps_null_and_missing_apart_per_field_mapper() {
        let mapper = article_mapper();
        let record = mapper
            .unpack_object(&json!({"id": 1, "createdAt": null}))
            .unwrap();
        assert_eq!(record.slot("created_at"), Slot::Null);
        assert_eq!(record.slot("title"), Slot::Missing);
        // Flag collapses its missing property to a present false.
        assert_eq!(record.flag("published"), Some(false));
    }

    #[test]
    fn unpack_rejects_non_objects() {
        let mapper = article_mapper();
        assert!(matches!(
            mapper.unpack_object(&json!([1, 2])),
            Err(MapperError::TypeMismatch { expected: "object", .. })
        ));
    }

    #[test]
    fn key_extraction_reads_strings_and_numbers() {
        let mapper = article_mapper();
        assert_eq!(
            mapper.try_to_unpack_key(&json!({"id": 42})),
            Some(Key::Number(42))
        );

        let mut by_slug = ObjectMapper::new(vec![MappedField::new("slug", ScalarMapper::Text)]);
        by_slug.set_key_property("slug");
        assert_eq!(
            by_slug.try_to_unpack_key(&json!({"slug": "intro"})),
            Some(Key::Text("intro".to_string()))
        );
    }

    #[test]
    fn key_extraction_is_absent_when_undesignated_missing_or_null() {
        let undesignated = ObjectMapper::new(vec![MappedField::new("id", ScalarMapper::Integer)]);
        assert_eq!(undesignated.try_to_unpack_key(&json!({"id": 1})), None);

        let mapper = article_mapper();
        assert_eq!(mapper.try_to_unpack_key(&json!({})), None);
        assert_eq!(mapper.try_to_unpack_key(&json!({"id": null})), None);
        assert_eq!(mapper.try_to_unpack_key(&json!({"id": {"x": 1}})), None);
    }

    #[test]
    fn key_extraction_tolerates_malformed_sibling_fields() {
        let mapper = article_mapper();
        // "title" is an object here, which full unpacking would reject.
        let wire = json!({"id": 9, "title": {"bogus": true}});
        assert!(mapper.unpack_object(&wire).is_err());
        assert_eq!(mapper.try_to_unpack_key(&wire), Some(Key::Number(9)));
    }

    #[test]
    fn set_key_property_is_idempotent_and_replaces() {
        let mut mapper = ObjectMapper::new(vec![
            MappedField::new("id", ScalarMapper::Integer),
            MappedField::new("slug", ScalarMapper::Text),
        ]);
        mapper.set_key_property("id");
        mapper.set_key_property("id");
        assert_eq!(mapper.key_property(), Some("id"));
        mapper.set_key_property("slug");
        assert_eq!(mapper.key_property(), Some("slug"));
    }

    #[test]
    #[should_panic(expected = "internal invariant violated")]
    fn duplicate_field_declarations_abort() {
        let _ = ObjectMapper::new(vec![
            MappedField::new("id", ScalarMapper::Integer),
            MappedField::new("id", ScalarMapper::Text),
        ]);
    }

    #[test]
    #[should_panic(expected = "internal invariant violated")]
    fn key_property_must_name_a_declared_field() {
        let mut mapper = ObjectMapper::new(vec![MappedField::new("id", ScalarMapper::Integer)]);
        mapper.set_key_property("nope");
    }

    #[tokio::test]
    async fn unpack_key_from_body() {
        let mapper = article_mapper();
        let key = mapper
            .unpack_key(ResponseBody::from_json(json!({"id": 3, "title": "x"})))
            .await
            .unwrap();
        assert_eq!(key, Some(Key::Number(3)));
    }
}
