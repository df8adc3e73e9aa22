//! # Wire Payloads
//!
//! The request/response body abstractions at the transport boundary.
//! Requests carry a [`RequestPayload`] (plain data, built by mappers);
//! responses expose a [`ResponseBody`] with lazy, single-use accessors that
//! suspend until the body is fully materialized.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::{MapperError, TransportError};

/// Boxed future used where the transport hands over a body that is still in
/// flight.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Media type a mapper expects in the response.
///
/// The dispatch layer derives the `Accept` header from it, and `unpack` uses
/// it to choose which raw-body accessor to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Json,
    Text,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Text => "text/plain",
        }
    }
}

/// An outbound request body as plain data.
///
/// `None` signals "no body at all": the transport sends nothing and sets no
/// content type. Mappers produce `None` uniformly for absent domain values.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    None,
    Text(String),
    Json(serde_json::Value),
}

impl RequestPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, RequestPayload::None)
    }

    /// Content type the transport should declare, if any.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestPayload::None => None,
            RequestPayload::Text(_) => Some("text/plain"),
            RequestPayload::Json(_) => Some("application/json"),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestPayload::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            RequestPayload::Json(v) => Some(v),
            _ => None,
        }
    }
}

enum BodyInner {
    Ready(Vec<u8>),
    Pending(BoxFuture<Result<Vec<u8>, TransportError>>),
}

/// An inbound response body.
///
/// Accessors consume the body (single use) and suspend until the bytes are
/// fully materialized. Transports that already hold the bytes construct it
/// with [`ResponseBody::from_bytes`]; streaming transports hand over a
/// future via [`ResponseBody::pending`].
pub struct ResponseBody {
    inner: BodyInner,
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            inner: BodyInner::Ready(bytes),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_bytes(text.into().into_bytes())
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        Self::from_bytes(value.to_string().into_bytes())
    }

    /// Wraps a body that is still being received.
    pub fn pending(future: BoxFuture<Result<Vec<u8>, TransportError>>) -> Self {
        Self {
            inner: BodyInner::Pending(future),
        }
    }

    /// Awaits the raw bytes.
    pub async fn bytes(self) -> Result<Vec<u8>, MapperError> {
        match self.inner {
            BodyInner::Ready(bytes) => Ok(bytes),
            BodyInner::Pending(future) => Ok(future.await?),
        }
    }

    /// Awaits the body as UTF-8 text.
    pub async fn text(self) -> Result<String, MapperError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes).map_err(|_| MapperError::NonUtf8Body)
    }

    /// Awaits the body as a JSON value. An empty body reads as JSON `null`.
    pub async fn json(self) -> Result<serde_json::Value, MapperError> {
        let bytes = self.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            BodyInner::Ready(bytes) => write!(f, "ResponseBody(ready, {} bytes)", bytes.len()),
            BodyInner::Pending(_) => write!(f, "ResponseBody(pending)"),
        }
    }
}
