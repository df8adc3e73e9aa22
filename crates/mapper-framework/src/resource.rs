//! # Resource Facade
//!
//! The only surface application code touches directly: declare a resource's
//! shape once with [`ResourceDescriptor::builder`], then pack, unpack, and
//! dispatch typed records through the resulting [`RemoteResource`].
//!
//! Every operation threads an optional per-call [`ConfigOverride`]; the
//! effective configuration is resolved per call from the default, the
//! global override, and that parameter.
//!
//! Validation runs before any mutating dispatch, but packing itself stays
//! pure: it never consults validity. A record that fails its checks comes
//! back as [`Outcome::Rejected`] carrying the reasons, as plain data, and
//! nothing is sent.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::check::ValidationResult;
use crate::config::{resolve_config, ConfigOverride};
use crate::error::{BindingError, ConfigError, MapperError};
use crate::mapper::{json_type_name, NoBodyMapper};
use crate::messages::{MessageLookup, StaticMessages};
use crate::object::{Key, MappedField, ObjectMapper, Record};
use crate::payload::{MediaType, RequestPayload, ResponseBody};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse};
use crate::url::{ObjectSerialization, UrlTemplate};

/// Validation and pure packing, side by side.
///
/// The payload is produced whether or not the record is valid; enforcing
/// validity is the caller's decision.
#[derive(Debug)]
pub struct PackOutcome {
    pub validation: ValidationResult,
    pub payload: RequestPayload,
}

/// Result of a mutating resource operation.
///
/// `Rejected` is a validation failure travelling as data; it is never an
/// error and means no network activity took place.
#[derive(Debug)]
pub enum Outcome<T> {
    Rejected(ValidationResult),
    Completed(T),
}

impl<T> Outcome<T> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejected(self) -> Option<ValidationResult> {
        match self {
            Outcome::Rejected(validation) => Some(validation),
            Outcome::Completed(_) => None,
        }
    }
}

/// Entry point of the declarative authoring surface.
pub struct ResourceDescriptor;

impl ResourceDescriptor {
    /// Starts declaring a resource named `name` (also its collection path
    /// segment).
    pub fn builder(name: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            name: name.into(),
            fields: Vec::new(),
            key_property: None,
            messages: None,
        }
    }
}

/// Collects field declarations and produces an immutable [`RemoteResource`].
pub struct ResourceBuilder {
    name: String,
    fields: Vec<MappedField>,
    key_property: Option<String>,
    messages: Option<Arc<dyn MessageLookup>>,
}

impl ResourceBuilder {
    /// Declares the next field. Declaration order is validation order.
    pub fn field(mut self, field: MappedField) -> Self {
        self.fields.push(field);
        self
    }

    /// Designates the identity field by its local name.
    pub fn key_property(mut self, name: impl Into<String>) -> Self {
        self.key_property = Some(name.into());
        self
    }

    /// Swaps in a different message lookup (e.g. for another locale).
    pub fn messages(mut self, messages: Arc<dyn MessageLookup>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Builds the resource rooted at `base_url`. Fails fast on an
    /// unparseable base, before any network activity.
    pub fn build(self, base_url: &str) -> Result<RemoteResource, ConfigError> {
        let endpoint = UrlTemplate::parse(base_url)?;
        let mut mapper = ObjectMapper::new(self.fields);
        if let Some(key) = &self.key_property {
            mapper.set_key_property(key);
        }
        Ok(RemoteResource {
            name: self.name,
            endpoint,
            mapper,
            messages: self
                .messages
                .unwrap_or_else(|| Arc::new(StaticMessages::new())),
        })
    }
}

/// A declared resource bound to an endpoint: the mapper facade.
///
/// Immutable after construction and safe to share across concurrently
/// suspended calls.
pub struct RemoteResource {
    name: String,
    endpoint: UrlTemplate,
    mapper: ObjectMapper,
    messages: Arc<dyn MessageLookup>,
}

impl fmt::Debug for RemoteResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteResource")
            .field("name", &self.name)
            .field("base", &self.endpoint.base().as_str())
            .field("fields", &self.mapper.fields().len())
            .finish()
    }
}

impl RemoteResource {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mapper(&self) -> &ObjectMapper {
        &self.mapper
    }

    /// Validates the record against every declared check.
    pub fn validate(&self, record: &Record) -> ValidationResult {
        self.mapper.validate(record, self.messages.as_ref())
    }

    /// Validation plus pure packing; neither consults the other.
    pub fn pack(&self, record: &Record) -> Result<PackOutcome, MapperError> {
        Ok(PackOutcome {
            validation: self.validate(record),
            payload: self.mapper.pack(record)?,
        })
    }

    /// Decodes a response body into a typed record. Suspends until the body
    /// materializes.
    pub async fn unpack(&self, body: ResponseBody) -> Result<Record, MapperError> {
        self.mapper.unpack(body).await
    }

    /// Recovers just the identity key from a response body.
    pub async fn unpack_key(&self, body: ResponseBody) -> Result<Option<Key>, MapperError> {
        self.mapper.unpack_key(body).await
    }

    /// POSTs a new record to the collection.
    ///
    /// On success the identity key is recovered from the creation response
    /// when the server includes it; the rest of the response shape is not
    /// required to decode.
    #[instrument(skip_all, fields(resource = %self.name))]
    pub async fn create(
        &self,
        record: &Record,
        overrides: Option<&ConfigOverride>,
    ) -> Result<Outcome<Option<Key>>, BindingError> {
        let validation = self.validate(record);
        if !validation.is_valid() {
            debug!(reasons = validation.reasons().len(), "create rejected by validation");
            return Ok(Outcome::Rejected(validation));
        }
        let config = resolve_config(overrides);
        let url = self.collection_url(&[], config.object_serialization);
        let request = self.request(HttpMethod::Post, url, self.mapper.pack(record)?);
        let response = config.transport.send(request).await?;
        let response = require_success(response, &self.name).await?;
        let key = self.mapper.unpack_key(response.body).await?;
        debug!(key = ?key, "created");
        Ok(Outcome::Completed(key))
    }

    /// GETs one record by key.
    #[instrument(skip_all, fields(resource = %self.name, key = %key))]
    pub async fn fetch(
        &self,
        key: &Key,
        overrides: Option<&ConfigOverride>,
    ) -> Result<Record, BindingError> {
        let config = resolve_config(overrides);
        let url = self.member_url(key, config.object_serialization);
        let request = self.request(HttpMethod::Get, url, NoBodyMapper.pack());
        let response = config.transport.send(request).await?;
        let context = format!("{}/{key}", self.name);
        let response = require_success(response, &context).await?;
        Ok(self.mapper.unpack(response.body).await?)
    }

    /// GETs the collection, with optional object-valued query parameters
    /// serialized per the resolved strategy.
    #[instrument(skip_all, fields(resource = %self.name))]
    pub async fn list(
        &self,
        query: &[(String, Value)],
        overrides: Option<&ConfigOverride>,
    ) -> Result<Vec<Record>, BindingError> {
        let config = resolve_config(overrides);
        let url = self.collection_url(query, config.object_serialization);
        let request = self.request(HttpMethod::Get, url, NoBodyMapper.pack());
        let response = config.transport.send(request).await?;
        let response = require_success(response, &self.name).await?;
        let wire = response.body.json().await?;
        let Value::Array(items) = wire else {
            return Err(MapperError::TypeMismatch {
                expected: "array",
                found: json_type_name(&wire),
            }
            .into());
        };
        let mut records = Vec::with_capacity(items.len());
        for item in &items {
            records.push(self.mapper.unpack_object(item)?);
        }
        debug!(count = records.len(), "listed");
        Ok(records)
    }

    /// PUTs a record to a member URL and decodes the server's view back.
    #[instrument(skip_all, fields(resource = %self.name, key = %key))]
    pub async fn update(
        &self,
        key: &Key,
        record: &Record,
        overrides: Option<&ConfigOverride>,
    ) -> Result<Outcome<Record>, BindingError> {
        let validation = self.validate(record);
        if !validation.is_valid() {
            debug!(reasons = validation.reasons().len(), "update rejected by validation");
            return Ok(Outcome::Rejected(validation));
        }
        let config = resolve_config(overrides);
        let url = self.member_url(key, config.object_serialization);
        let request = self.request(HttpMethod::Put, url, self.mapper.pack(record)?);
        let response = config.transport.send(request).await?;
        let context = format!("{}/{key}", self.name);
        let response = require_success(response, &context).await?;
        Ok(Outcome::Completed(self.mapper.unpack(response.body).await?))
    }

    /// DELETEs one record by key. No payload either way.
    #[instrument(skip_all, fields(resource = %self.name, key = %key))]
    pub async fn delete(
        &self,
        key: &Key,
        overrides: Option<&ConfigOverride>,
    ) -> Result<(), BindingError> {
        let config = resolve_config(overrides);
        let url = self.member_url(key, config.object_serialization);
        let request = HttpRequest::new(HttpMethod::Delete, url).payload(NoBodyMapper.pack());
        let response = config.transport.send(request).await?;
        let context = format!("{}/{key}", self.name);
        let response = require_success(response, &context).await?;
        NoBodyMapper.unpack(response.body).await?;
        Ok(())
    }

    fn collection_url(&self, query: &[(String, Value)], strategy: ObjectSerialization) -> Url {
        self.endpoint.render(&[self.name.as_str()], query, strategy)
    }

    fn member_url(&self, key: &Key, strategy: ObjectSerialization) -> Url {
        let segment = key.to_string();
        self.endpoint
            .render(&[self.name.as_str(), segment.as_str()], &[], strategy)
    }

    /// Assembles a request with content negotiation headers: content type
    /// from the payload, accept from the mapper's expected response type.
    fn request(&self, method: HttpMethod, url: Url, payload: RequestPayload) -> HttpRequest {
        let mut request = HttpRequest::new(method, url);
        if let Some(content_type) = payload.content_type() {
            request = request.header("content-type", content_type);
        }
        let accept: MediaType = self.mapper.response_type();
        request = request.header("accept", accept.as_str());
        request.payload(payload)
    }
}

/// Maps non-success statuses to errors before any unpacking. 404 gets its
/// own variant; other failures carry the status and a best-effort body.
async fn require_success(
    response: HttpResponse,
    context: &str,
) -> Result<HttpResponse, BindingError> {
    if response.ok() {
        return Ok(response);
    }
    if response.status == 404 {
        warn!(context, "not found");
        return Err(BindingError::NotFound(context.to_string()));
    }
    let status = response.status;
    let body = response.body.text().await.unwrap_or_default();
    warn!(status, "unexpected status");
    Err(BindingError::UnexpectedStatus { status, body })
}
