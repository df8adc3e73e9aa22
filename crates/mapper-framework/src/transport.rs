//! # Transport Capability
//!
//! The engine does not speak HTTP itself; it only requires a capability
//! that can send a request and yield a response. Any concrete networking
//! implementation may provide it, and a chain of interceptors can wrap it
//! transparently. Requests and responses are plain data so callers and
//! tests can inspect them without touching a network.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::TransportError;
use crate::payload::{RequestPayload, ResponseBody};

/// HTTP method for a resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request described as plain data.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub payload: RequestPayload,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            payload: RequestPayload::None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn payload(mut self, payload: RequestPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// An inbound response: status, headers, and a lazily-readable body.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The consumed networking capability.
///
/// `send` suspends until the response headers arrive; the body may keep
/// materializing behind [`ResponseBody`]. The engine never retries a send;
/// retry policy belongs to the implementation behind this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Hook pair applied around a wrapped transport's `send`.
pub trait Interceptor: Send + Sync {
    fn before(&self, _request: &mut HttpRequest) {}
    fn after(&self, _response: &mut HttpResponse) {}
}

/// Wraps a transport with an interceptor chain.
///
/// `before` hooks run in registration order on the way out; `after` hooks
/// run in reverse order on the way back, so the outermost interceptor sees
/// both edges last-in-first-out.
pub struct InterceptedTransport {
    inner: Arc<dyn Transport>,
    chain: Vec<Arc<dyn Interceptor>>,
}

impl InterceptedTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self {
            inner,
            chain: Vec::new(),
        }
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.chain.push(Arc::new(interceptor));
        self
    }
}

#[async_trait]
impl Transport for InterceptedTransport {
    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        for interceptor in &self.chain {
            interceptor.before(&mut request);
        }
        let mut response = self.inner.send(request).await?;
        for interceptor in self.chain.iter().rev() {
            interceptor.after(&mut response);
        }
        Ok(response)
    }
}

/// Placeholder transport resolved when nothing was configured.
///
/// Dispatching through it fails with [`TransportError::Unconfigured`]; real
/// transports arrive via `set_global_config` at startup or per-call
/// overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredTransport;

#[async_trait]
impl Transport for UnconfiguredTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::warn!(method = %request.method, url = %request.url, "dispatch with no transport configured");
        Err(TransportError::Unconfigured)
    }
}
