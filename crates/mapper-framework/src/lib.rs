//! # Mapper Framework
//!
//! A declarative data-binding layer: describe a remote resource's shape
//! once and get bidirectional conversion between typed domain values and
//! wire-level HTTP requests/responses, plus constraint validation on those
//! values.
//!
//! ## Architecture Overview
//!
//! The engine separates concerns into three layers:
//!
//! 1. **Codec layer** ([`ScalarMapper`], [`ObjectMapper`], [`NoBodyMapper`]):
//!    a closed set of mapper kinds behind one pack/unpack capability. The
//!    composite mapper *holds* a scalar mapper per field; there is no
//!    inheritance chain.
//! 2. **Validation layer** ([`Check`], [`CheckCollection`]): pure predicates
//!    whose failures travel as [`ValidationResult`] data, never as errors.
//! 3. **Dispatch layer** ([`RemoteResource`], [`UrlTemplate`],
//!    [`Transport`]): addresses an operation, resolves configuration, and
//!    hands the request to the consumed transport capability.
//!
//! ## Concurrency Model
//!
//! Everything built at declaration time (checks, fields, mappers,
//! resources) is immutable and freely shared across concurrently suspended
//! calls; no locking is involved. The one shared mutable value is the
//! process-wide configuration override, with a documented
//! set-once-at-startup lifecycle (see [`config`]).
//!
//! ## Declaring a resource
//!
//! ```rust
//! use mapper_framework::{
//!     ConfigOverride, HttpMethod, MappedField, MockTransport, NotEmpty, Record,
//!     ResourceDescriptor, ScalarMapper,
//! };
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let articles = ResourceDescriptor::builder("articles")
//!         .field(MappedField::new("id", ScalarMapper::Integer))
//!         .field(MappedField::new("title", ScalarMapper::Text).check(NotEmpty))
//!         .key_property("id")
//!         .build("https://my-api.com/v2")
//!         .unwrap();
//!
//!     let mock = MockTransport::new();
//!     mock.expect(HttpMethod::Post, "/v2/articles")
//!         .return_json(201, json!({"id": 7, "title": "Hello"}));
//!     let per_call = ConfigOverride::empty().transport(mock.transport());
//!
//!     let record = Record::new().with("title", "Hello");
//!     let outcome = articles.create(&record, Some(&per_call)).await.unwrap();
//!     let key = outcome.completed().flatten().unwrap();
//!     assert_eq!(key.to_string(), "7");
//!     mock.verify();
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockTransport`] implements the same [`Transport`] capability the
//! engine consumes, backed by a fluent expectation queue, so resource flows
//! are testable without a server.

pub mod check;
pub mod config;
pub mod error;
pub mod mapper;
pub mod messages;
pub mod mock;
pub mod object;
pub mod payload;
pub mod resource;
pub mod tracing;
pub mod transport;
pub mod url;
pub mod value;

// Re-export the authoring and dispatch surface for convenience.
pub use check::{Check, CheckCollection, MaxLength, MinValue, NotEmpty, ValidationResult};
pub use config::{
    get_global_config, reset_global_config, resolve_config, set_global_config, BindingConfig,
    ConfigOverride,
};
pub use error::{BindingError, ConfigError, MapperError, TransportError};
pub use mapper::{NoBodyMapper, ScalarMapper};
pub use messages::{MessageLookup, StaticMessages};
pub use mock::MockTransport;
pub use object::{Key, MappedField, ObjectMapper, Record};
pub use payload::{MediaType, RequestPayload, ResponseBody};
pub use resource::{Outcome, PackOutcome, RemoteResource, ResourceDescriptor};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, InterceptedTransport, Interceptor, Transport,
};
pub use url::{ObjectSerialization, UrlTemplate};
pub use value::{FieldValue, Slot};
