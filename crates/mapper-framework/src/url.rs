//! # URL Templating
//!
//! Builds the endpoint for one resource operation from a base URL, path
//! segments, and optional object-valued query parameters. How a nested
//! object becomes query-string pairs is a configuration point
//! ([`ObjectSerialization`]) because backends disagree about the encoding.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{invariant_violation, ConfigError};

/// How an object-valued query parameter is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectSerialization {
    /// `filter[author]=jan&filter[tags][0]=rust`
    #[default]
    Brackets,
    /// `filter.author=jan&filter.tags.0=rust`
    Flat,
    /// `filter={"author":"jan","tags":["rust"]}` in a single parameter.
    Json,
}

impl ObjectSerialization {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectSerialization::Brackets => "brackets",
            ObjectSerialization::Flat => "flat",
            ObjectSerialization::Json => "json",
        }
    }
}

impl FromStr for ObjectSerialization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brackets" => Ok(ObjectSerialization::Brackets),
            "flat" => Ok(ObjectSerialization::Flat),
            "json" => Ok(ObjectSerialization::Json),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// An addressable endpoint rooted at a parsed base URL.
///
/// Construction fails fast on an unparseable base; rendering afterwards is
/// infallible. No trailing-slash normalization happens beyond what
/// [`url::Url`] itself performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    base: Url,
}

impl UrlTemplate {
    pub fn parse(base: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base).map_err(|source| ConfigError::InvalidUrl {
            given: base.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBase(base.to_string()));
        }
        Ok(Self { base: parsed })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Concatenates the base with path segments and appends query
    /// parameters, serializing object values per `strategy`.
    pub fn render(
        &self,
        segments: &[&str],
        query: &[(String, Value)],
        strategy: ObjectSerialization,
    ) -> Url {
        let mut url = self.base.clone();
        match url.path_segments_mut() {
            Ok(mut path) => {
                path.pop_if_empty().extend(segments.iter().copied());
            }
            // Ruled out at parse time.
            Err(()) => invariant_violation("base URL rejected path segments after construction"),
        }
        if !query.is_empty() {
            let mut pairs = Vec::new();
            for (name, value) in query {
                flatten_param(&mut pairs, name, value, strategy);
            }
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }
}

/// Recursively flattens one query parameter into encoded-ready pairs.
/// Null values are omitted; scalars render the same under every strategy.
fn flatten_param(
    out: &mut Vec<(String, String)>,
    name: &str,
    value: &Value,
    strategy: ObjectSerialization,
) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((name.to_string(), b.to_string())),
        Value::Number(n) => out.push((name.to_string(), n.to_string())),
        Value::String(s) => out.push((name.to_string(), s.clone())),
        Value::Array(items) => match strategy {
            ObjectSerialization::Json => out.push((name.to_string(), value.to_string())),
            ObjectSerialization::Brackets => {
                for (index, item) in items.iter().enumerate() {
                    flatten_param(out, &format!("{name}[{index}]"), item, strategy);
                }
            }
            ObjectSerialization::Flat => {
                for (index, item) in items.iter().enumerate() {
                    flatten_param(out, &format!("{name}.{index}"), item, strategy);
                }
            }
        },
        Value::Object(map) => match strategy {
            ObjectSerialization::Json => out.push((name.to_string(), value.to_string())),
            ObjectSerialization::Brackets => {
                for (key, item) in map {
                    flatten_param(out, &format!("{name}[{key}]"), item, strategy);
                }
            }
            ObjectSerialization::Flat => {
                for (key, item) in map {
                    flatten_param(out, &format!("{name}.{key}"), item, strategy);
                }
            }
        },
    }
}
