//! # Article Client
//!
//! Typed wrapper around the generic resource facade: application code deals
//! in [`Article`] values and [`ArticleError`], never in records or wire
//! payloads.

use mapper_framework::{BindingError, ConfigOverride, Key, Outcome, RemoteResource};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::model::Article;

/// Errors surfaced by [`ArticleClient`].
#[derive(Debug, Error)]
pub enum ArticleError {
    /// The article failed its declared checks; the reasons are the
    /// human-readable messages in declaration order.
    #[error("article is invalid: {0:?}")]
    Invalid(Vec<String>),

    /// The requested article does not exist.
    #[error("article not found: {0}")]
    NotFound(String),

    /// Anything else the binding layer reported.
    #[error(transparent)]
    Binding(BindingError),
}

impl From<BindingError> for ArticleError {
    fn from(error: BindingError) -> Self {
        match error {
            BindingError::NotFound(context) => ArticleError::NotFound(context),
            other => ArticleError::Binding(other),
        }
    }
}

/// Collapses a facade outcome into the client's error model.
///
/// The facade reports validation failures as data; this application chooses
/// to treat them as errors at its own boundary.
fn require_completed<T>(outcome: Outcome<T>) -> Result<T, ArticleError> {
    match outcome {
        Outcome::Completed(value) => Ok(value),
        Outcome::Rejected(validation) => {
            Err(ArticleError::Invalid(validation.reasons().to_vec()))
        }
    }
}

/// Client for the remote `articles` collection.
pub struct ArticleClient {
    resource: RemoteResource,
    overrides: Option<ConfigOverride>,
}

impl ArticleClient {
    /// Uses the process-wide configuration for every call.
    pub fn new(resource: RemoteResource) -> Self {
        Self {
            resource,
            overrides: None,
        }
    }

    /// Pins a per-call configuration override (e.g. a dedicated transport).
    pub fn with_overrides(mut self, overrides: ConfigOverride) -> Self {
        self.overrides = Some(overrides);
        self
    }

    #[instrument(skip_all, fields(title = %article.title))]
    pub async fn create(&self, article: &Article) -> Result<Option<i64>, ArticleError> {
        debug!("creating article");
        let outcome = self
            .resource
            .create(&article.to_record(), self.overrides.as_ref())
            .await?;
        let key = require_completed(outcome)?;
        Ok(key.and_then(|key| match key {
            Key::Number(id) => Some(id),
            // Articles use numeric ids; tolerate a numeric string.
            Key::Text(text) => text.parse().ok(),
        }))
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, id: i64) -> Result<Article, ArticleError> {
        debug!("fetching article");
        let record = self
            .resource
            .fetch(&Key::Number(id), self.overrides.as_ref())
            .await?;
        Ok(Article::from_record(&record))
    }

    #[instrument(skip(self, article))]
    pub async fn update(&self, id: i64, article: &Article) -> Result<Article, ArticleError> {
        debug!("updating article");
        let outcome = self
            .resource
            .update(&Key::Number(id), &article.to_record(), self.overrides.as_ref())
            .await?;
        let record = require_completed(outcome)?;
        Ok(Article::from_record(&record))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ArticleError> {
        debug!("deleting article");
        self.resource
            .delete(&Key::Number(id), self.overrides.as_ref())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Article>, ArticleError> {
        let records = self.resource.list(&[], self.overrides.as_ref()).await?;
        Ok(records.iter().map(Article::from_record).collect())
    }
}
