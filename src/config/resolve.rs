//! Option resolution.
//!
//! Options are resolved by deep-merging a partial options document over a
//! base document and deserializing the result. The base is either an
//! explicit document or the process-wide defaults, which start out as
//! `Options::default()` and only change through [`set_global_defaults`].

use std::sync::{LazyLock, PoisonError, RwLock};

use serde_json::Value;

use super::{ConfigError, Options};
use crate::util::deep_merge;

/// Process-wide default options document. Lives for the whole process.
static GLOBAL_DEFAULTS: LazyLock<RwLock<Value>> = LazyLock::new(|| {
    RwLock::new(serde_json::to_value(Options::default()).unwrap_or_else(|_| empty_document()))
});

fn empty_document() -> Value {
    Value::Object(Default::default())
}

/// Deep-merge `partial` into the process-wide defaults.
///
/// Only options resolved after this call see the change; pipelines that
/// already exist keep the options they were built with.
pub fn set_global_defaults(partial: Value) -> Result<(), ConfigError> {
    if !partial.is_object() {
        return Err(ConfigError::NotAMapping);
    }

    let mut merged = global_defaults();
    deep_merge(&mut merged, partial);
    // Reject documents that would break every later resolution.
    serde_json::from_value::<Options>(merged.clone())?;

    let mut defaults = GLOBAL_DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *defaults = merged;
    tracing::debug!("updated global default options");
    Ok(())
}

/// A snapshot of the current process-wide defaults document.
pub fn global_defaults() -> Value {
    GLOBAL_DEFAULTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

impl Options {
    /// Resolve a partial options document over the process-wide defaults.
    ///
    /// `Value::Null` is treated as "no overrides".
    pub fn resolve(overrides: Value) -> Result<Self, ConfigError> {
        Self::resolve_over(&global_defaults(), overrides)
    }

    /// Resolve a partial options document over an explicit base document.
    pub fn resolve_over(base: &Value, overrides: Value) -> Result<Self, ConfigError> {
        let overrides = match overrides {
            Value::Null => empty_document(),
            Value::Object(_) => overrides,
            _ => return Err(ConfigError::NotAMapping),
        };

        let mut merged = base.clone();
        deep_merge(&mut merged, overrides);
        Ok(serde_json::from_value(merged)?)
    }
}
