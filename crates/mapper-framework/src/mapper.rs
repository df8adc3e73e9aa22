//! # Value Mappers
//!
//! Primitive codecs between one scalar domain type and its canonical wire
//! primitive. The mapper kinds form a closed set ([`ScalarMapper`] for
//! scalars, [`crate::object::ObjectMapper`] for composites, [`NoBodyMapper`]
//! for operations without a payload), each an independent implementation of
//! the same pack/unpack/response-type capability rather than an inheritance
//! chain.
//!
//! One behavior is shared by every scalar variant: the null short-circuit.
//! `pack` turns an absent domain value into [`RequestPayload::None`] before
//! any variant-specific encoding runs, so no subtype ever sees a null.

use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::MapperError;
use crate::payload::{MediaType, RequestPayload, ResponseBody};
use crate::value::{FieldValue, Slot};

/// Short JSON type name for diagnostics.
pub(crate) fn json_type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

/// Codec for exactly one scalar domain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarMapper {
    Text,
    Integer,
    Float,
    Flag,
    Timestamp,
}

impl ScalarMapper {
    /// Domain type this mapper handles, for diagnostics.
    pub fn domain_type(&self) -> &'static str {
        match self {
            ScalarMapper::Text => "text",
            ScalarMapper::Integer => "integer",
            ScalarMapper::Float => "float",
            ScalarMapper::Flag => "flag",
            ScalarMapper::Timestamp => "timestamp",
        }
    }

    /// Media type this mapper expects in a response. Plain text for the text
    /// mapper, JSON for everything else.
    pub fn response_type(&self) -> MediaType {
        match self {
            ScalarMapper::Text => MediaType::Text,
            _ => MediaType::Json,
        }
    }

    /// Packs a domain value into a standalone request payload.
    ///
    /// An absent value short-circuits to [`RequestPayload::None`] uniformly,
    /// without invoking the variant's encoding.
    pub fn pack(&self, value: Option<&FieldValue>) -> Result<RequestPayload, MapperError> {
        let Some(value) = value else {
            return Ok(RequestPayload::None);
        };
        match self {
            ScalarMapper::Text => match value {
                FieldValue::Text(s) => Ok(RequestPayload::Text(s.clone())),
                other => Err(self.mismatch(other)),
            },
            _ => Ok(RequestPayload::Json(self.pack_value(value)?)),
        }
    }

    /// Packs a domain value into the wire primitive used inside a JSON
    /// object property.
    pub fn pack_value(&self, value: &FieldValue) -> Result<Value, MapperError> {
        match (self, value) {
            (ScalarMapper::Text, FieldValue::Text(s)) => Ok(Value::String(s.clone())),
            (ScalarMapper::Integer, FieldValue::Integer(i)) => Ok(Value::from(*i)),
            (ScalarMapper::Float, FieldValue::Float(f)) => Ok(Value::from(*f)),
            (ScalarMapper::Flag, FieldValue::Flag(b)) => Ok(Value::Bool(*b)),
            (ScalarMapper::Timestamp, FieldValue::Timestamp(ts)) => {
                let rendered = ts
                    .format(&Rfc3339)
                    .map_err(|e| MapperError::TimestampFormat(e.to_string()))?;
                Ok(Value::String(rendered))
            }
            (mapper, value) => Err(mapper.mismatch(value)),
        }
    }

    /// Unpacks a raw wire slot into a domain slot.
    ///
    /// Absent and explicitly-null wire properties stay distinguishable in
    /// the output, except for the flag mapper, which coerces every slot
    /// state through JSON truthiness and never rejects a value.
    pub fn unpack_value(&self, raw: Slot<&Value>) -> Result<Slot<FieldValue>, MapperError> {
        if let ScalarMapper::Flag = self {
            return Ok(Slot::Present(FieldValue::Flag(truthy(&raw))));
        }
        let value = match raw {
            Slot::Missing => return Ok(Slot::Missing),
            Slot::Null | Slot::Present(Value::Null) => return Ok(Slot::Null),
            Slot::Present(value) => value,
        };
        let unpacked = match self {
            ScalarMapper::Text => match value {
                Value::String(s) => FieldValue::Text(s.clone()),
                other => return Err(self.mismatch_wire(other)),
            },
            ScalarMapper::Integer => match value.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => return Err(self.mismatch_wire(value)),
            },
            ScalarMapper::Float => match value.as_f64() {
                Some(f) => FieldValue::Float(f),
                None => return Err(self.mismatch_wire(value)),
            },
            ScalarMapper::Timestamp => FieldValue::Timestamp(parse_timestamp(value)?),
            ScalarMapper::Flag => unreachable!("flag handled above"),
        };
        Ok(Slot::Present(unpacked))
    }

    /// Awaits the response accessor matching [`Self::response_type`] and
    /// unpacks the raw value. Suspends until the body materializes.
    pub async fn unpack(&self, body: ResponseBody) -> Result<Slot<FieldValue>, MapperError> {
        match self.response_type() {
            MediaType::Text => {
                let text = body.text().await?;
                Ok(Slot::Present(FieldValue::Text(text)))
            }
            MediaType::Json => {
                let value = body.json().await?;
                self.unpack_value(Slot::Present(&value))
            }
        }
    }

    fn mismatch(&self, value: &FieldValue) -> MapperError {
        MapperError::TypeMismatch {
            expected: self.domain_type(),
            found: value.type_name().to_string(),
        }
    }

    fn mismatch_wire(&self, value: &Value) -> MapperError {
        MapperError::TypeMismatch {
            expected: self.domain_type(),
            found: json_type_name(value),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are false, everything
/// else (arrays and objects included) is true. Absent slots count as false.
fn truthy(raw: &Slot<&Value>) -> bool {
    match raw {
        Slot::Missing | Slot::Null => false,
        Slot::Present(value) => match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        },
    }
}

/// A timestamp arrives as RFC 3339 text or as epoch milliseconds.
fn parse_timestamp(value: &Value) -> Result<OffsetDateTime, MapperError> {
    match value {
        Value::String(s) => OffsetDateTime::parse(s, &Rfc3339)
            .map_err(|_| MapperError::UnparseableTimestamp(s.clone())),
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(i) => i as i128,
                None => match n.as_f64() {
                    Some(f) => f.round() as i128,
                    None => return Err(MapperError::UnparseableTimestamp(n.to_string())),
                },
            };
            OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000)
                .map_err(|_| MapperError::UnparseableTimestamp(n.to_string()))
        }
        other => Err(MapperError::TypeMismatch {
            expected: "timestamp",
            found: json_type_name(other),
        }),
    }
}

/// Sentinel mapper for operations that carry no payload at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBodyMapper;

impl NoBodyMapper {
    pub fn pack(&self) -> RequestPayload {
        RequestPayload::None
    }

    /// No expected media type: the dispatch layer sends no `Accept` header.
    pub fn response_type(&self) -> Option<MediaType> {
        None
    }

    /// Drains and discards whatever the server sent back.
    pub async fn unpack(&self, body: ResponseBody) -> Result<(), MapperError> {
        let _ = body.bytes().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn pack_absent_is_uniform_across_all_variants() {
        for mapper in [
            ScalarMapper::Text,
            ScalarMapper::Integer,
            ScalarMapper::Float,
            ScalarMapper::Flag,
            ScalarMapper::Timestamp,
        ] {
            assert_eq!(mapper.pack(None).unwrap(), RequestPayload::None);
        }
    }

    #[test]
    fn text_packs_as_plain_text_payload() {
        let payload = ScalarMapper::Text
            .pack(Some(&FieldValue::Text("hello".to_string())))
            .unwrap();
        assert_eq!(payload, RequestPayload::Text("hello".to_string()));
        assert_eq!(ScalarMapper::Text.response_type(), MediaType::Text);
    }

    #[test]
    fn scalar_round_trips() {
        let cases = [
            (ScalarMapper::Text, FieldValue::Text("abc".to_string())),
            (ScalarMapper::Integer, FieldValue::Integer(-7)),
            (ScalarMapper::Float, FieldValue::Float(2.5)),
            (ScalarMapper::Flag, FieldValue::Flag(true)),
        ];
        for (mapper, value) in cases {
            let wire = mapper.pack_value(&value).unwrap();
            let back = mapper.unpack_value(Slot::Present(&wire)).unwrap();
            assert_eq!(back, Slot::Present(value));
        }
    }

    #[test]
    fn timestamp_round_trips_millisecond_equal() {
        let ts = datetime!(2024-03-01 12:30:45.250 UTC);
        let wire = ScalarMapper::Timestamp
            .pack_value(&FieldValue::Timestamp(ts))
            .unwrap();
        let back = ScalarMapper::Timestamp
            .unpack_value(Slot::Present(&wire))
            .unwrap();
        match back {
            Slot::Present(FieldValue::Timestamp(parsed)) => {
                assert_eq!(parsed.unix_timestamp_nanos(), ts.unix_timestamp_nanos());
            }
            other => panic!("expected a timestamp, got {other:?}"),
        }
    }

    #[test]
    fn timestamp_unpacks_epoch_milliseconds() {
        let millis = json!(1_709_294_445_250_i64);
        let back = ScalarMapper::Timestamp
            .unpack_value(Slot::Present(&millis))
            .unwrap();
        let expected = datetime!(2024-03-01 12:00:45.250 UTC);
        assert_eq!(
            back,
            Slot::Present(FieldValue::Timestamp(expected)),
            "epoch millis should decode to the same instant"
        );
    }

    #[test]
    fn timestamp_keeps_missing_and_null_distinct() {
        let mapper = ScalarMapper::Timestamp;
        assert_eq!(mapper.unpack_value(Slot::Missing).unwrap(), Slot::Missing);
        assert_eq!(mapper.unpack_value(Slot::Null).unwrap(), Slot::Null);
        let null = Value::Null;
        assert_eq!(
            mapper.unpack_value(Slot::Present(&null)).unwrap(),
            Slot::Null
        );
    }

    #[test]
    fn timestamp_rejects_garbage_text() {
        let garbage = json!("not-a-date");
        assert!(matches!(
            ScalarMapper::Timestamp.unpack_value(Slot::Present(&garbage)),
            Err(MapperError::UnparseableTimestamp(_))
        ));
    }

    #[test]
    fn flag_collapses_missing_and_null_to_false() {
        let mapper = ScalarMapper::Flag;
        assert_eq!(
            mapper.unpack_value(Slot::Missing).unwrap(),
            Slot::Present(FieldValue::Flag(false))
        );
        assert_eq!(
            mapper.unpack_value(Slot::Null).unwrap(),
            Slot::Present(FieldValue::Flag(false))
        );
    }

    #[test]
    fn flag_never_rejects_any_wire_value() {
        let mapper = ScalarMapper::Flag;
        let cases = [
            (json!(0), false),
            (json!(1), true),
            (json!(""), false),
            (json!("no"), true),
            (json!([]), true),
            (json!({}), true),
            (json!(null), false),
            (json!(false), false),
        ];
        for (wire, expected) in cases {
            assert_eq!(
                mapper.unpack_value(Slot::Present(&wire)).unwrap(),
                Slot::Present(FieldValue::Flag(expected)),
                "truthiness of {wire}"
            );
        }
    }

    #[test]
    fn integer_rejects_non_numeric_wire_values() {
        let text = json!("12");
        assert!(matches!(
            ScalarMapper::Integer.unpack_value(Slot::Present(&text)),
            Err(MapperError::TypeMismatch { expected: "integer", .. })
        ));
    }

    #[test]
    fn pack_value_rejects_mismatched_domain_values() {
        assert!(matches!(
            ScalarMapper::Integer.pack_value(&FieldValue::Text("x".to_string())),
            Err(MapperError::TypeMismatch { expected: "integer", .. })
        ));
    }

    #[tokio::test]
    async fn unpack_uses_the_declared_accessor() {
        let text = ScalarMapper::Text
            .unpack(ResponseBody::from_text("plain"))
            .await
            .unwrap();
        assert_eq!(text, Slot::Present(FieldValue::Text("plain".to_string())));

        let number = ScalarMapper::Integer
            .unpack(ResponseBody::from_json(json!(42)))
            .await
            .unwrap();
        assert_eq!(number, Slot::Present(FieldValue::Integer(42)));
    }

    #[tokio::test]
    async fn no_body_mapper_is_a_true_sentinel() {
        assert_eq!(NoBodyMapper.pack(), RequestPayload::None);
        assert_eq!(NoBodyMapper.response_type(), None);
        NoBodyMapper
            .unpack(ResponseBody::from_text("ignored"))
            .await
            .unwrap();
    }
}
