//! # Article Binding
//!
//! The declarative description of how an [`crate::model::Article`] travels
//! over the wire: field names and renames, per-field mappers, checks, and
//! the identity property. Declared once at startup; the resulting
//! [`RemoteResource`] is immutable and shared.

use mapper_framework::{
    ConfigError, MappedField, MaxLength, MinValue, NotEmpty, RemoteResource, ResourceDescriptor,
    ScalarMapper,
};

/// Builds the `articles` resource rooted at `base_url`.
///
/// The backend uses camelCase wire names where the domain uses snake_case;
/// the renaming contract keeps the two independent.
pub fn article_resource(base_url: &str) -> Result<RemoteResource, ConfigError> {
    ResourceDescriptor::builder("articles")
        .field(MappedField::new("id", ScalarMapper::Integer))
        .field(
            MappedField::new("title", ScalarMapper::Text)
                .check(NotEmpty)
                .check(MaxLength::new(120)),
        )
        .field(MappedField::new("body", ScalarMapper::Text))
        .field(MappedField::new("published", ScalarMapper::Flag))
        .field(MappedField::new("rating", ScalarMapper::Float).check(MinValue::new(0.0)))
        .field(MappedField::new("created_at", ScalarMapper::Timestamp).wire_name("createdAt"))
        .key_property("id")
        .build(base_url)
}
