//! The `Article` domain type and its conversions to and from the dynamic
//! [`Record`] the mapping engine works with.

use mapper_framework::{Key, Record};
use time::OffsetDateTime;

/// A blog article as the application sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: Option<i64>,
    pub title: String,
    pub body: Option<String>,
    pub published: bool,
    pub rating: Option<f64>,
    pub created_at: Option<OffsetDateTime>,
}

impl Article {
    /// A fresh, unpublished draft.
    pub fn draft(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: None,
            published: false,
            rating: None,
            created_at: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn publish(mut self) -> Self {
        self.published = true;
        self
    }

    pub fn key(&self) -> Option<Key> {
        self.id.map(Key::Number)
    }

    /// Packs the article into the engine's record shape. Unset optionals
    /// stay missing so they are omitted on the wire.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        if let Some(id) = self.id {
            record.set("id", id);
        }
        record.set("title", self.title.clone());
        if let Some(body) = &self.body {
            record.set("body", body.clone());
        }
        record.set("published", self.published);
        if let Some(rating) = self.rating {
            record.set("rating", rating);
        }
        if let Some(created_at) = self.created_at {
            record.set("created_at", created_at);
        }
        record
    }

    /// Rebuilds the article from a decoded record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.integer("id"),
            title: record.text("title").unwrap_or_default().to_string(),
            body: record.text("body").map(str::to_string),
            published: record.flag("published").unwrap_or(false),
            rating: record.float("rating"),
            created_at: record.timestamp("created_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn record_round_trip_preserves_every_field() {
        let article = Article {
            id: Some(3),
            title: "Title".to_string(),
            body: Some("Body".to_string()),
            published: true,
            rating: Some(4.5),
            created_at: Some(datetime!(2024-05-06 07:08:09 UTC)),
        };
        let back = Article::from_record(&article.to_record());
        assert_eq!(back, article);
    }

    #[test]
    fn unset_optionals_stay_missing_in_the_record() {
        let record = Article::draft("t").to_record();
        assert_eq!(record.get("id"), None);
        assert_eq!(record.get("body"), None);
        assert_eq!(record.flag("published"), Some(false));
    }
}
