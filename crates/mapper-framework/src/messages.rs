//! # Message Lookup
//!
//! Checks never hard-code the text of a failure reason. They resolve a
//! message key through the [`MessageLookup`] capability, so an application
//! can localize or reword reasons without touching check logic. Locale
//! selection happens entirely on the application side: construct the lookup
//! for the locale you want and hand it to the resource descriptor.

use std::collections::HashMap;

/// Well-known message keys used by the built-in checks.
pub mod keys {
    pub const NOT_EMPTY: &str = "check.not_empty";
    pub const MAX_LENGTH: &str = "check.max_length";
    pub const MIN_VALUE: &str = "check.min_value";
}

/// Capability for turning a message key into a human-readable string.
///
/// Implementations must be total: an unknown key resolves to *something*
/// (the built-in lookup falls back to the key itself) rather than failing.
pub trait MessageLookup: Send + Sync {
    fn resolve(&self, key: &str) -> String;
}

/// In-memory message table with English defaults for the built-in checks.
///
/// Applications override individual entries with [`StaticMessages::with`] or
/// supply a different [`MessageLookup`] implementation altogether.
pub struct StaticMessages {
    entries: HashMap<String, String>,
}

impl StaticMessages {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(keys::NOT_EMPTY.to_string(), "must not be empty".to_string());
        entries.insert(
            keys::MAX_LENGTH.to_string(),
            "must be at most {limit} characters".to_string(),
        );
        entries.insert(
            keys::MIN_VALUE.to_string(),
            "must be at least {min}".to_string(),
        );
        Self { entries }
    }

    /// Adds or replaces a single message.
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }
}

impl Default for StaticMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLookup for StaticMessages {
    fn resolve(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_keys() {
        let messages = StaticMessages::new();
        assert_eq!(messages.resolve(keys::NOT_EMPTY), "must not be empty");
    }

    #[test]
    fn unknown_key_falls_back_to_itself() {
        let messages = StaticMessages::new();
        assert_eq!(messages.resolve("check.custom"), "check.custom");
    }

    #[test]
    fn overrides_replace_builtin_text() {
        let messages = StaticMessages::new().with(keys::NOT_EMPTY, "darf nicht leer sein");
        assert_eq!(messages.resolve(keys::NOT_EMPTY), "darf nicht leer sein");
    }
}
