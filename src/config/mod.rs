//! Configuration resolution.
//!
//! Resolves [`Settings`] from two sources:
//! 1. **Base document** - `config/config.yaml`, embedded at build time
//! 2. **Overrides** - environment variables, falling back to `env/local.env`
//!
//! ## Precedence
//! For each leaf in the schema an override wins (coerced from text), then the
//! document value (used as-is). Required leaves with neither are reported
//! together in one [`ConfigError::Missing`](crate::error::ConfigError::Missing).
//!
//! ## Variable names
//! Path segments upper-cased and joined with `_`: `logging.level` is read from
//! `LOGGING_LEVEL`.
//!
//! The first successful resolution is cached for the life of the resolver.

pub mod coerce;
mod resolver;
pub mod schema;
pub mod source;
mod types;
pub mod walk;

pub use resolver::ConfigResolver;
pub use schema::{FieldSpec, FieldType, Optionality, Schema, SchemaNode, flatten, override_var_name};
pub use source::{
    DocumentSource, EmbeddedDocument, EnvOverrides, FileDocument, InlineDocument, OverrideSource,
    ProcessEnv,
};
pub use types::*;

use crate::error::ConfigResult;
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<ConfigResolver<Settings>> =
    LazyLock::new(ConfigResolver::<Settings>::from_environment);

/// Process-wide [`Settings`], resolved on first successful call and cached
/// afterwards.
///
/// Uses the embedded document and the process environment over
/// `env/local.env`, looked up relative to the current working directory. A
/// failed call caches nothing; the next call reads the sources again.
/// Prefer building a [`ConfigResolver`] and passing the result down; this
/// exists for the startup path.
pub fn resolve() -> ConfigResult<Arc<Settings>> {
    GLOBAL.resolve()
}
