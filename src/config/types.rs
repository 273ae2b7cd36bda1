//! Application configuration types and their schema tables.
//!
//! Every field here has a matching [`SchemaNode`]; the tables are what the
//! resolver walks, the structs are what it builds.

use super::schema::{FieldType, Schema, SchemaNode};
use serde::{Deserialize, Serialize};

const APP_FIELDS: &[SchemaNode] = &[
    SchemaNode::required("name", FieldType::String),
    SchemaNode::required("host", FieldType::String),
    SchemaNode::required("port", FieldType::Int),
    SchemaNode::required("workers", FieldType::Int),
];

const LOGGING_FIELDS: &[SchemaNode] = &[
    SchemaNode::required("level", FieldType::String),
    SchemaNode::required("json_format", FieldType::Bool),
    SchemaNode::required("file_enabled", FieldType::Bool),
    SchemaNode::required("file_path", FieldType::String),
    SchemaNode::required("rotation", FieldType::String),
    SchemaNode::required("retention", FieldType::String),
    SchemaNode::required("backtrace", FieldType::Bool),
    SchemaNode::required("diagnose", FieldType::Bool),
    SchemaNode::required("colorize", FieldType::Bool),
    SchemaNode::required("enqueue", FieldType::Bool),
];

/// Root schema for [`Settings`].
pub const SETTINGS_SCHEMA: &[SchemaNode] = &[
    SchemaNode::section("app", APP_FIELDS),
    SchemaNode::section("logging", LOGGING_FIELDS),
];

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppConfig,
    pub logging: LoggingConfig,
}

impl Schema for Settings {
    fn schema() -> &'static [SchemaNode] {
        SETTINGS_SCHEMA
    }
}

/// HTTP service identity and bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service title.
    pub name: String,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Worker process count.
    pub workers: u32,
}

/// Logging sinks and formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level (`trace`..`error`, also `warning`, `critical`, `success`).
    pub level: String,
    /// Emit events as JSON lines.
    pub json_format: bool,
    /// Also write to a rolling log file.
    pub file_enabled: bool,
    /// Log file location when `file_enabled` is set.
    pub file_path: String,
    /// Rotation period: `minutely`, `hourly`, `daily` or `never`.
    pub rotation: String,
    /// Number of rotated files to keep; empty or `0` keeps all.
    pub retention: String,
    /// Include source file and line on events.
    pub backtrace: bool,
    /// Include thread ids and targets on events.
    pub diagnose: bool,
    /// ANSI colors on the console.
    pub colorize: bool,
    /// Write the log file from a background worker.
    pub enqueue: bool,
}
