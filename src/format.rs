//! Output formatting for the resolved configuration and variable listing.

use crate::config::{FieldSpec, Optionality, Settings};
use anyhow::Result;
use clap::ValueEnum;

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
    Markdown,
}

/// Render the resolved settings.
///
/// Markdown renders as YAML in a fenced block.
pub fn format_settings(settings: &Settings, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(settings)?,
        OutputFormat::Json => serde_json::to_string_pretty(settings)? + "\n",
        OutputFormat::Markdown => {
            format!("```yaml\n{}```\n", serde_yaml::to_string(settings)?)
        }
    })
}

/// Render the override variables of a schema.
pub fn format_variables(fields: &[FieldSpec], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(fields)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(fields)?,
        OutputFormat::Markdown => format_variables_markdown(fields),
    })
}

/// Format override variables as a markdown table.
pub fn format_variables_markdown(fields: &[FieldSpec]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Override variables ({})\n\n", fields.len()));
    md.push_str("| variable | type | required | path |\n");
    md.push_str("|---|---|---|---|\n");

    for field in fields {
        let required = match field.optionality {
            Optionality::Required => "yes",
            Optionality::Optional => "no",
        };
        md.push_str(&format!(
            "| `{}` | {} | {} | `{}` |\n",
            field.variable,
            field.field_type,
            required,
            field.dotted()
        ));
    }

    md
}
