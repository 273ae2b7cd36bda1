//! Static schema descriptions walked by the resolver.
//!
//! A schema is a table of [`SchemaNode`]s declared with `const` constructors.
//! Leaves carry a primitive [`FieldType`]; sections point at another table.

use serde::Serialize;
use std::fmt;

/// Declared type of a schema node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    /// Nested section described by its own node table.
    Section(&'static [SchemaNode]),
}

impl FieldType {
    /// Name used in diagnostics and the `vars` listing.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Section(_) => "section",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a leaf must resolve to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Optionality {
    Required,
    Optional,
}

/// One configuration field or nested section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaNode {
    pub name: &'static str,
    pub field_type: FieldType,
    pub optionality: Optionality,
}

impl SchemaNode {
    /// A leaf that must be supplied by the environment or the document.
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            optionality: Optionality::Required,
        }
    }

    /// A leaf that resolves to `None` when nothing supplies it.
    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            optionality: Optionality::Optional,
        }
    }

    /// A nested section.
    pub const fn section(name: &'static str, children: &'static [SchemaNode]) -> Self {
        Self {
            name,
            field_type: FieldType::Section(children),
            optionality: Optionality::Required,
        }
    }

    pub fn is_required(&self) -> bool {
        self.optionality == Optionality::Required
    }
}

/// Types that can be resolved from a base document and overrides.
pub trait Schema {
    /// Root node table describing the type's fields.
    fn schema() -> &'static [SchemaNode];
}

/// Derive the override variable name for a field path.
///
/// Each segment is upper-cased and the segments are joined with `_`, so
/// `["logging", "level"]` becomes `LOGGING_LEVEL`.
pub fn override_var_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref().to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Dotted form of a path used in diagnostics. The empty path is `<root>`.
pub fn dotted_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    path.iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// A flattened leaf with its full path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub path: Vec<&'static str>,
    pub variable: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub optionality: Optionality,
}

impl FieldSpec {
    pub fn dotted(&self) -> String {
        dotted_path(self.path.as_slice())
    }
}

/// List every leaf of a schema depth-first, in declaration order.
pub fn flatten(nodes: &'static [SchemaNode]) -> Vec<FieldSpec> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    flatten_into(nodes, &mut path, &mut out);
    out
}

fn flatten_into(
    nodes: &'static [SchemaNode],
    path: &mut Vec<&'static str>,
    out: &mut Vec<FieldSpec>,
) {
    for node in nodes {
        path.push(node.name);
        match node.field_type {
            FieldType::Section(children) => flatten_into(children, path, out),
            leaf => out.push(FieldSpec {
                path: path.clone(),
                variable: override_var_name(path.as_slice()),
                field_type: leaf.as_str(),
                optionality: node.optionality,
            }),
        }
        path.pop();
    }
}
