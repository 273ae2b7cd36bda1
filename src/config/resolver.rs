//! Resolver lifecycle: load, walk, build, cache.
//!
//! The first successful [`ConfigResolver::resolve`] stores its result; every
//! later call returns the same `Arc` without touching any source. A miss is
//! serialized behind a mutex so concurrent first callers resolve once.

use super::schema::Schema;
use super::source::{
    DEFAULT_ENV_FILE, DocumentSource, EmbeddedDocument, EnvOverrides, OverrideSource,
};
use super::walk::walk;
use crate::error::{ConfigError, ConfigResult};
use arc_swap::ArcSwapOption;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Where overrides come from.
enum Overrides {
    /// A source built up front.
    Ready(Box<dyn OverrideSource>),
    /// Process environment over a dotenv file read on every resolution attempt.
    EnvFile(PathBuf),
}

/// Resolves a [`Schema`] type from a base document and override source.
pub struct ConfigResolver<T> {
    document: Box<dyn DocumentSource>,
    overrides: Overrides,
    cache: ArcSwapOption<T>,
    init_lock: Mutex<()>,
    _target: PhantomData<fn() -> T>,
}

impl<T> ConfigResolver<T>
where
    T: Schema + DeserializeOwned,
{
    pub fn new(
        document: impl DocumentSource + 'static,
        overrides: impl OverrideSource + 'static,
    ) -> Self {
        Self::with_overrides(document, Overrides::Ready(Box::new(overrides)))
    }

    /// Process environment over the dotenv file at `env_file`.
    ///
    /// The file is read when resolution runs, not here, so a broken file that
    /// is later fixed is picked up by the next [`resolve`](Self::resolve).
    pub fn with_env_file(
        document: impl DocumentSource + 'static,
        env_file: impl Into<PathBuf>,
    ) -> Self {
        Self::with_overrides(document, Overrides::EnvFile(env_file.into()))
    }

    /// Embedded document with the process environment over `env/local.env`
    /// (relative to the working directory).
    pub fn from_environment() -> Self {
        Self::with_env_file(EmbeddedDocument, DEFAULT_ENV_FILE)
    }

    fn with_overrides(document: impl DocumentSource + 'static, overrides: Overrides) -> Self {
        Self {
            document: Box::new(document),
            overrides,
            cache: ArcSwapOption::empty(),
            init_lock: Mutex::new(()),
            _target: PhantomData,
        }
    }

    /// Return the cached configuration, resolving it on first use.
    pub fn resolve(&self) -> ConfigResult<Arc<T>> {
        if let Some(cached) = self.cache.load_full() {
            return Ok(cached);
        }

        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished while we waited.
        if let Some(cached) = self.cache.load_full() {
            return Ok(cached);
        }

        match self.resolve_uncached() {
            Ok(config) => {
                let config = Arc::new(config);
                self.cache.store(Some(Arc::clone(&config)));
                Ok(config)
            }
            Err(err) => {
                warn!(code = %err.code(), error = %err, "configuration resolution failed");
                Err(err)
            }
        }
    }

    /// The cached configuration, without triggering resolution.
    pub fn cached(&self) -> Option<Arc<T>> {
        self.cache.load_full()
    }

    fn resolve_uncached(&self) -> ConfigResult<T> {
        let origin = self.document.origin();
        debug!(origin = %origin, "loading base document");
        let document = self.document.load()?;

        let loaded;
        let overrides: &dyn OverrideSource = match &self.overrides {
            Overrides::Ready(source) => &**source,
            Overrides::EnvFile(path) => {
                loaded = EnvOverrides::with_env_file(path)?;
                &loaded
            }
        };

        let outcome = walk(T::schema(), &document, overrides)?;
        let overridden = outcome.overridden.len();
        let values = outcome.into_values()?;

        let config = serde_json::from_value(values).map_err(ConfigError::Build)?;
        info!(origin = %origin, overrides = overridden, "configuration resolved");
        Ok(config)
    }
}

impl<T> std::fmt::Debug for ConfigResolver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("document", &self.document.origin())
            .field("cached", &self.cache.load().is_some())
            .finish()
    }
}
