//! # Framework Errors
//!
//! Error types for the mapping engine, one enum per concern. Validation
//! failures are deliberately *not* here: a failed check is ordinary data
//! (`ValidationResult`), returned to the caller, never raised as an error.

use thiserror::Error;

/// Errors raised while converting between domain values and wire values.
///
/// A `MapperError` means a mapper received a wire value it fundamentally
/// cannot interpret as its declared type. The engine never retries these;
/// they propagate to the resource-operation caller.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The wire value has a shape the mapper cannot interpret.
    #[error("wire value mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A textual or numeric wire value could not be read as a timestamp.
    #[error("unparseable timestamp: {0}")]
    UnparseableTimestamp(String),

    /// A domain timestamp could not be rendered in the wire format.
    #[error("timestamp cannot be rendered: {0}")]
    TimestampFormat(String),

    /// The response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body was not valid UTF-8 text.
    #[error("response body is not valid UTF-8 text")]
    NonUtf8Body,

    /// The response body could not be materialized at all.
    #[error("response body could not be read: {0}")]
    Body(#[from] TransportError),
}

/// Errors detected while resolving configuration or building endpoints.
///
/// These fail fast at construction/resolution time, before any network
/// activity takes place.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("invalid base URL {given:?}: {source}")]
    InvalidUrl {
        given: String,
        source: url::ParseError,
    },

    /// The base URL parses but cannot carry path segments (e.g. `mailto:`).
    #[error("base URL cannot carry path segments: {0}")]
    OpaqueBase(String),

    /// An object-serialization strategy name was not recognized.
    #[error("unknown object serialization strategy: {0:?}")]
    UnknownStrategy(String),
}

/// Errors surfaced by the transport capability.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No transport was configured globally or per call.
    #[error("no transport configured; set one via set_global_config or a per-call override")]
    Unconfigured,

    /// The underlying transport implementation failed.
    #[error("transport failed: {0}")]
    Failed(String),
}

/// Top-level error for resource operations: the union of everything a
/// pack/dispatch/unpack round-trip can surface, plus HTTP status mapping.
///
/// `NotFound` gets a dedicated variant because callers routinely distinguish
/// "the resource does not exist" from "the server returned something odd".
#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404 for the addressed resource.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server returned a non-success status other than 404.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// A condition the design asserts can never occur (an authoring bug, not a
/// runtime failure). Logged on a dedicated target, then aborted via panic.
/// Intentionally never caught, so contract violations surface during
/// development instead of being masked.
#[track_caller]
pub(crate) fn invariant_violation(context: &str) -> ! {
    tracing::error!(
        target: "mapper_framework::invariant",
        context,
        "internal invariant violated"
    );
    panic!("internal invariant violated: {context}");
}
