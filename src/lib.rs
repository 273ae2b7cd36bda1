//! pm-settings library
//!
//! Resolves the service configuration from an embedded YAML document and
//! environment overrides. Exported for the binary and for integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
