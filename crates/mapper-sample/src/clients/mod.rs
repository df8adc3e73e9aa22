//! Typed client wrappers that hide records and wire payloads from
//! application code.

mod article_client;

pub use article_client::{ArticleClient, ArticleError};
