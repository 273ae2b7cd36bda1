//! Base document and override sources.
//!
//! The base document is YAML parsed into a `serde_json::Value` tree. Overrides
//! are a flat name → text lookup; the resolver only ever asks for names it
//! derived from the schema.

use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base document compiled into the binary.
pub const EMBEDDED_CONFIG: &str = include_str!("../../config/config.yaml");

/// Dotenv file consulted for variables missing from the process environment.
///
/// Relative, so it is resolved against the current working directory.
pub const DEFAULT_ENV_FILE: &str = "env/local.env";

/// Provides the base document.
pub trait DocumentSource: Send + Sync {
    /// Label used in diagnostics.
    fn origin(&self) -> String;

    /// Raw document text.
    fn read(&self) -> ConfigResult<String>;

    /// Read and parse the document.
    fn load(&self) -> ConfigResult<Value> {
        let text = self.read()?;
        parse_document(&text, &self.origin())
    }
}

/// Parse YAML text into a document tree.
///
/// An empty document is an empty mapping.
pub fn parse_document(text: &str, origin: &str) -> ConfigResult<Value> {
    let value: Value =
        serde_yaml::from_str(text).map_err(|e| ConfigError::source_failure(origin, e))?;
    Ok(match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    })
}

/// The `config/config.yaml` document embedded at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDocument;

impl DocumentSource for EmbeddedDocument {
    fn origin(&self) -> String {
        "embedded config/config.yaml".to_string()
    }

    fn read(&self) -> ConfigResult<String> {
        Ok(EMBEDDED_CONFIG.to_string())
    }
}

/// A YAML document on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileDocument {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> ConfigResult<String> {
        debug!(path = %self.path.display(), "reading configuration document");
        std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::source_failure(self.origin(), e))
    }
}

/// A YAML document held in memory.
#[derive(Debug, Clone)]
pub struct InlineDocument {
    text: String,
}

impl InlineDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentSource for InlineDocument {
    fn origin(&self) -> String {
        "inline document".to_string()
    }

    fn read(&self) -> ConfigResult<String> {
        Ok(self.text.clone())
    }
}

/// Flat lookup of override values by exact variable name.
pub trait OverrideSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl OverrideSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

impl OverrideSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl OverrideSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

/// Process environment layered over a dotenv file.
///
/// Process variables always win; file variables only fill gaps. The process
/// environment itself is never modified.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    env_file: Option<PathBuf>,
    file_vars: HashMap<String, String>,
}

impl EnvOverrides {
    /// Process environment only.
    pub fn process_only() -> Self {
        Self::default()
    }

    /// Process environment over [`DEFAULT_ENV_FILE`] when it exists.
    ///
    /// The path is relative: run from the project root, or use
    /// [`with_env_file`](Self::with_env_file) with an absolute path.
    pub fn discover() -> ConfigResult<Self> {
        Self::with_env_file(DEFAULT_ENV_FILE)
    }

    /// Process environment over the given dotenv file.
    ///
    /// A missing file yields process-only overrides. An unreadable or
    /// malformed file is a source error.
    pub fn with_env_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "env file not found, using process environment only");
            return Ok(Self::process_only());
        }

        let origin = path.display().to_string();
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| ConfigError::source_failure(origin.clone(), e))?;
        let mut file_vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::source_failure(origin.clone(), e))?;
            // Later definitions replace earlier ones.
            file_vars.insert(key, value);
        }

        debug!(path = %origin, count = file_vars.len(), "loaded env file");
        Ok(Self {
            env_file: Some(path.to_path_buf()),
            file_vars,
        })
    }

    /// The env file that was loaded, if any.
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Value defined by the env file alone.
    pub fn file_value(&self, name: &str) -> Option<&str> {
        self.file_vars.get(name).map(String::as_str)
    }
}

impl OverrideSource for EnvOverrides {
    fn get(&self, name: &str) -> Option<String> {
        ProcessEnv
            .get(name)
            .or_else(|| self.file_vars.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_document_nested() {
        let text = "logging:\n  level: info\n  json_format: true\n";
        let value = parse_document(text, "test").unwrap();
        assert_eq!(
            value,
            json!({"logging": {"level": "info", "json_format": true}})
        );
    }

    #[test]
    fn test_parse_empty_document_is_empty_mapping() {
        assert_eq!(parse_document("", "test").unwrap(), json!({}));
        assert_eq!(parse_document("# only a comment\n", "test").unwrap(), json!({}));
    }

    #[test]
    fn test_parse_invalid_yaml_is_source_error() {
        let err = parse_document("logging: [unclosed", "broken.yaml").unwrap_err();
        match err {
            ConfigError::Source { origin, .. } => assert_eq!(origin, "broken.yaml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_embedded_document_parses() {
        let value = EmbeddedDocument.load().unwrap();
        assert!(value.get("app").is_some());
        assert!(value.get("logging").is_some());
    }

    #[test]
    fn test_file_document_missing_is_source_error() {
        let temp = TempDir::new().unwrap();
        let doc = FileDocument::new(temp.path().join("absent.yaml"));
        assert!(matches!(doc.load(), Err(ConfigError::Source { .. })));
    }

    #[test]
    fn test_map_override_source() {
        let mut vars = HashMap::new();
        vars.insert("LOGGING_LEVEL".to_string(), "debug".to_string());
        assert_eq!(OverrideSource::get(&vars, "LOGGING_LEVEL").as_deref(), Some("debug"));
        assert_eq!(OverrideSource::get(&vars, "logging_level"), None);
    }

    #[test]
    fn test_env_file_missing_is_process_only() {
        let temp = TempDir::new().unwrap();
        let overrides = EnvOverrides::with_env_file(temp.path().join("local.env")).unwrap();
        assert!(overrides.env_file().is_none());
    }

    #[test]
    fn test_env_file_fills_absent_variables_last_definition_wins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local.env");
        std::fs::write(
            &path,
            "PM_SETTINGS_TEST_ONLY_IN_FILE=from-file\nPM_SETTINGS_TEST_ONLY_IN_FILE=second\n",
        )
        .unwrap();

        let overrides = EnvOverrides::with_env_file(&path).unwrap();
        assert_eq!(overrides.env_file(), Some(path.as_path()));
        assert_eq!(
            overrides.get("PM_SETTINGS_TEST_ONLY_IN_FILE").as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_process_env_wins_over_env_file() {
        // PATH is set in any environment the tests run in.
        let Some(process_path) = ProcessEnv.get("PATH") else {
            return;
        };
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local.env");
        std::fs::write(&path, "PATH=/from/env/file\n").unwrap();

        let overrides = EnvOverrides::with_env_file(&path).unwrap();
        assert_eq!(overrides.file_value("PATH"), Some("/from/env/file"));
        assert_eq!(overrides.get("PATH"), Some(process_path));
    }
}
