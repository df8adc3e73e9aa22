//! # Mapper Sample
//!
//! A small consumer of the mapping engine, wired the way an application
//! would do it:
//!
//! - **[model]**: pure domain data ([`model::Article`]).
//! - **[binding]**: the declarative resource description: fields, wire
//!   renames, checks, identity property.
//! - **[clients]**: a typed wrapper ([`clients::ArticleClient`]) so the rest
//!   of the application never touches records or payloads.
//!
//! The demo binary in `main.rs` runs the whole flow against the engine's
//! mock transport, including a validation rejection.

pub mod binding;
pub mod clients;
pub mod model;
