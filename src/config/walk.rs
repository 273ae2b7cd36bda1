//! Recursive schema walk applying override precedence.
//!
//! For every leaf: an override wins (coerced), then the document value at the
//! same position (verbatim), otherwise the leaf is missing. Missing required
//! leaves are collected across the whole walk and reported together.

use super::coerce::coerce;
use super::schema::{FieldType, SchemaNode, dotted_path, override_var_name};
use super::source::OverrideSource;
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Result of walking a schema against a document and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    /// Collected values shaped like the schema.
    pub values: Value,
    /// Variables of unresolved required leaves, sorted and deduplicated.
    pub missing: Vec<String>,
    /// Variables whose override was applied, in walk order.
    pub overridden: Vec<String>,
}

impl WalkOutcome {
    /// Fail with [`ConfigError::Missing`] if any required leaf is unresolved.
    pub fn into_values(self) -> ConfigResult<Value> {
        if self.missing.is_empty() {
            Ok(self.values)
        } else {
            Err(ConfigError::Missing {
                variables: self.missing,
            })
        }
    }
}

/// Walk `nodes` starting at the document root.
pub fn walk(
    nodes: &'static [SchemaNode],
    document: &Value,
    overrides: &dyn OverrideSource,
) -> ConfigResult<WalkOutcome> {
    let mut walker = Walker {
        overrides,
        missing: BTreeSet::new(),
        overridden: Vec::new(),
    };
    let mut path = Vec::new();
    let values = walker.section(nodes, document, &mut path)?;

    Ok(WalkOutcome {
        values: Value::Object(values),
        missing: walker.missing.into_iter().collect(),
        overridden: walker.overridden,
    })
}

struct Walker<'a> {
    overrides: &'a dyn OverrideSource,
    missing: BTreeSet<String>,
    overridden: Vec<String>,
}

impl Walker<'_> {
    fn section(
        &mut self,
        nodes: &'static [SchemaNode],
        section: &Value,
        path: &mut Vec<&'static str>,
    ) -> ConfigResult<Map<String, Value>> {
        let empty = Map::new();
        let section = match section {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::SchemaShape {
                    path: dotted_path(path.as_slice()),
                    found: kind_name(other),
                });
            }
        };

        let mut out = Map::new();
        for node in nodes {
            path.push(node.name);
            match node.field_type {
                FieldType::Section(children) => {
                    let nested = section.get(node.name).unwrap_or(&Value::Null);
                    let values = self.section(children, nested, path)?;
                    out.insert(node.name.to_string(), Value::Object(values));
                }
                leaf => {
                    let variable = override_var_name(path.as_slice());
                    if let Some(raw) = self.overrides.get(&variable) {
                        let value = coerce(&raw, leaf, &variable, &dotted_path(path.as_slice()))?;
                        debug!(variable = %variable, "applied environment override");
                        out.insert(node.name.to_string(), value);
                        self.overridden.push(variable);
                    } else if let Some(value) = section.get(node.name) {
                        out.insert(node.name.to_string(), value.clone());
                    } else if node.is_required() {
                        self.missing.insert(variable);
                    }
                }
            }
            path.pop();
        }

        Ok(out)
    }
}

/// Name of a document value's kind for shape errors.
fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    const LOGGING: &[SchemaNode] = &[
        SchemaNode::required("level", FieldType::String),
        SchemaNode::required("json_format", FieldType::Bool),
        SchemaNode::optional("sample_rate", FieldType::Float),
    ];
    const ROOT: &[SchemaNode] = &[
        SchemaNode::required("port", FieldType::Int),
        SchemaNode::section("logging", LOGGING),
    ];

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_document_values_pass_through() {
        let doc = json!({"port": 8000, "logging": {"level": "info", "json_format": false}});
        let outcome = walk(ROOT, &doc, &env(&[])).unwrap();
        assert!(outcome.missing.is_empty());
        assert!(outcome.overridden.is_empty());
        assert_eq!(
            outcome.values,
            json!({"port": 8000, "logging": {"level": "info", "json_format": false}})
        );
    }

    #[test]
    fn test_override_wins_over_document() {
        let doc = json!({"port": 8000, "logging": {"level": "info", "json_format": false}});
        let overrides = env(&[("LOGGING_LEVEL", "debug"), ("LOGGING_JSON_FORMAT", "yes"), ("PORT", "9000")]);
        let outcome = walk(ROOT, &doc, &overrides).unwrap();
        assert_eq!(
            outcome.values,
            json!({"port": 9000, "logging": {"level": "debug", "json_format": true}})
        );
        assert_eq!(outcome.overridden, vec!["PORT", "LOGGING_LEVEL", "LOGGING_JSON_FORMAT"]);
    }

    #[test]
    fn test_missing_fields_collected_sorted() {
        let outcome = walk(ROOT, &json!({}), &env(&[])).unwrap();
        assert_eq!(
            outcome.missing,
            vec!["LOGGING_JSON_FORMAT", "LOGGING_LEVEL", "PORT"]
        );
        match outcome.into_values() {
            Err(ConfigError::Missing { variables }) => assert_eq!(variables.len(), 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_optional_leaf_absent_is_not_missing() {
        let doc = json!({"port": 1, "logging": {"level": "info", "json_format": true}});
        let outcome = walk(ROOT, &doc, &env(&[])).unwrap();
        assert!(outcome.missing.is_empty());
        assert!(outcome.values["logging"].get("sample_rate").is_none());

        let outcome = walk(ROOT, &doc, &env(&[("LOGGING_SAMPLE_RATE", "0.5")])).unwrap();
        assert_eq!(outcome.values["logging"]["sample_rate"], json!(0.5));
    }

    #[test]
    fn test_absent_section_walks_as_empty() {
        let overrides = env(&[("LOGGING_LEVEL", "warn"), ("LOGGING_JSON_FORMAT", "0")]);
        let outcome = walk(ROOT, &json!({"port": 1, "logging": null}), &overrides).unwrap();
        assert!(outcome.missing.is_empty());
        assert_eq!(outcome.values["logging"]["json_format"], json!(false));
    }

    #[test]
    fn test_scalar_section_is_shape_error() {
        let err = walk(ROOT, &json!({"port": 1, "logging": "loud"}), &env(&[])).unwrap_err();
        match err {
            ConfigError::SchemaShape { path, found } => {
                assert_eq!(path, "logging");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_root_is_shape_error() {
        let err = walk(ROOT, &json!([1, 2]), &env(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SchemaShape { ref path, found: "list" } if path == "<root>"
        ));
    }

    #[test]
    fn test_coercion_failure_aborts() {
        let err = walk(ROOT, &json!({}), &env(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::TypeCoercion { ref variable, .. } if variable == "PORT"));
    }
}
