//! # Mock Transport
//!
//! An in-memory [`Transport`] with expectation tracking for tests. Instead
//! of standing up a server, a test queues the responses it wants, hands the
//! mock to the engine (globally or per call), runs the flow, and calls
//! [`MockTransport::verify`] to ensure every queued expectation was
//! consumed.
//!
//! Expectations are strict and ordered: each `send` pops the front of the
//! queue and asserts the request's method and path match it. An unexpected
//! request panics, which is exactly what a test wants to see.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::payload::ResponseBody;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};

struct CannedResponse {
    status: u16,
    body: Vec<u8>,
}

struct Expectation {
    method: HttpMethod,
    path: String,
    response: Result<CannedResponse, TransportError>,
}

/// Expectation-queue transport for tests.
///
/// Cheap to clone; clones share the same queue, so the handle kept by the
/// test and the handle handed to the engine stay in sync.
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an expectation for `method` on `path` (the URL path only,
    /// query excluded). Finish it with one of the builder's `return_*`
    /// methods.
    pub fn expect(&self, method: HttpMethod, path: impl Into<String>) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            mock: self,
            method,
            path: path.into(),
        }
    }

    /// The mock as the capability the engine consumes.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Panics if any queued expectation was never consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("not all expectations were met, {remaining} remaining");
        }
    }

    fn push(&self, expectation: Expectation) {
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

/// Builder for one queued expectation.
pub struct ExpectationBuilder<'a> {
    mock: &'a MockTransport,
    method: HttpMethod,
    path: String,
}

impl ExpectationBuilder<'_> {
    pub fn return_json(self, status: u16, body: serde_json::Value) {
        self.finish(Ok(CannedResponse {
            status,
            body: body.to_string().into_bytes(),
        }));
    }

    pub fn return_text(self, status: u16, body: &str) {
        self.finish(Ok(CannedResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    /// An empty-bodied response, e.g. a bare 204 or an error status.
    pub fn return_status(self, status: u16) {
        self.finish(Ok(CannedResponse {
            status,
            body: Vec::new(),
        }));
    }

    pub fn return_err(self, error: TransportError) {
        self.finish(Err(error));
    }

    fn finish(self, response: Result<CannedResponse, TransportError>) {
        self.mock.push(Expectation {
            method: self.method,
            path: self.path,
            response,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!(
                "unexpected request: {} {} (no expectations queued)",
                request.method, request.url
            );
        };
        assert_eq!(
            expectation.method, request.method,
            "expectation mismatch on method for {}",
            request.url
        );
        assert_eq!(
            expectation.path,
            request.url.path(),
            "expectation mismatch on path"
        );
        expectation.response.map(|canned| HttpResponse {
            status: canned.status,
            headers: Vec::new(),
            body: ResponseBody::from_bytes(canned.body),
        })
    }
}
