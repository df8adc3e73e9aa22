//! # Configuration Resolution
//!
//! One process-wide default configuration exists at startup. It can be
//! overridden globally (intended lifecycle: once, before traffic begins)
//! and again per call. Resolution is field-granular: for each field the
//! per-call override wins over the global override, which wins over the
//! static default, and supplying a partial override never erases unrelated
//! fields.
//!
//! The global override is the engine's only shared mutable state. It is
//! deliberately not transactionally isolated: a call that resolved its
//! configuration before a concurrent `set_global_config` simply keeps the
//! snapshot it captured. That race is accepted and documented rather than
//! locked away, because the supported use is set-once-at-startup.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::transport::{Transport, UnconfiguredTransport};
use crate::url::ObjectSerialization;

/// The merged, call-specific configuration.
#[derive(Clone)]
pub struct BindingConfig {
    pub object_serialization: ObjectSerialization,
    pub transport: Arc<dyn Transport>,
}

impl fmt::Debug for BindingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingConfig")
            .field("object_serialization", &self.object_serialization)
            .field("transport", &"<capability>")
            .finish()
    }
}

/// A partial configuration: every field optional, merged field-by-field.
#[derive(Clone, Default)]
pub struct ConfigOverride {
    pub object_serialization: Option<ObjectSerialization>,
    pub transport: Option<Arc<dyn Transport>>,
}

impl ConfigOverride {
    pub const fn empty() -> Self {
        Self {
            object_serialization: None,
            transport: None,
        }
    }

    pub fn strategy(mut self, strategy: ObjectSerialization) -> Self {
        self.object_serialization = Some(strategy);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Field-granular merge: `other`'s set fields replace this override's,
    /// unset fields leave it untouched.
    fn merge_from(&mut self, other: &ConfigOverride) {
        if let Some(strategy) = other.object_serialization {
            self.object_serialization = Some(strategy);
        }
        if let Some(transport) = &other.transport {
            self.transport = Some(transport.clone());
        }
    }
}

impl fmt::Debug for ConfigOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverride")
            .field("object_serialization", &self.object_serialization)
            .field(
                "transport",
                if self.transport.is_some() {
                    &"<set>"
                } else {
                    &"<unset>"
                },
            )
            .finish()
    }
}

static GLOBAL_OVERRIDE: RwLock<ConfigOverride> = RwLock::new(ConfigOverride::empty());

fn default_config() -> BindingConfig {
    BindingConfig {
        object_serialization: ObjectSerialization::default(),
        transport: Arc::new(UnconfiguredTransport),
    }
}

/// Merges a partial override into the process-wide configuration.
///
/// Affects every subsequent call that does not supply a more specific
/// per-call override. Intended to run once, during startup wiring.
pub fn set_global_config(overrides: ConfigOverride) {
    let mut global = GLOBAL_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    global.merge_from(&overrides);
    tracing::info!(
        strategy = ?global.object_serialization,
        transport_set = global.transport.is_some(),
        "global configuration updated"
    );
}

/// Clears every global override back to the static defaults.
pub fn reset_global_config() {
    let mut global = GLOBAL_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *global = ConfigOverride::empty();
}

/// Resolves the configuration for one call:
/// per-call field > global override field > static default field.
pub fn resolve_config(per_call: Option<&ConfigOverride>) -> BindingConfig {
    let mut layered = ConfigOverride::empty();
    {
        let global = GLOBAL_OVERRIDE
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        layered.merge_from(&global);
    }
    if let Some(overrides) = per_call {
        layered.merge_from(overrides);
    }
    let defaults = default_config();
    BindingConfig {
        object_serialization: layered
            .object_serialization
            .unwrap_or(defaults.object_serialization),
        transport: layered.transport.unwrap_or(defaults.transport),
    }
}

/// The currently effective process-wide configuration.
pub fn get_global_config() -> BindingConfig {
    resolve_config(None)
}
