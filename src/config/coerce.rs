//! Coercion of override text into typed document values.
//!
//! Only override values pass through here; document values are already typed
//! by YAML and are used as-is.

use super::schema::FieldType;
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Number, Value};

/// Text accepted as `true` for bool fields (compared after trim + lowercase).
pub const TRUTHY: &[&str] = &["true", "yes", "on", "1", "y"];

/// Permissive bool parse: anything outside [`TRUTHY`] is `false`.
pub fn parse_bool(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    TRUTHY.contains(&normalized.as_str())
}

/// Coerce raw override text to the declared leaf type.
///
/// `variable` and `path` only feed the error on failure.
pub fn coerce(
    raw: &str,
    field_type: FieldType,
    variable: &str,
    path: &str,
) -> ConfigResult<Value> {
    let fail = |expected: &'static str| ConfigError::TypeCoercion {
        variable: variable.to_string(),
        path: path.to_string(),
        raw: raw.to_string(),
        expected,
    };

    match field_type {
        FieldType::Bool => Ok(Value::Bool(parse_bool(raw))),
        FieldType::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| fail("int")),
        FieldType::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| fail("float")),
        FieldType::String => Ok(Value::String(raw.to_string())),
        // Sections are walked, never coerced.
        FieldType::Section(_) => Err(fail("section")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce_ok(raw: &str, ty: FieldType) -> Value {
        coerce(raw, ty, "TEST_VAR", "test.var").unwrap()
    }

    #[test]
    fn test_bool_truthy_set() {
        for raw in ["true", "TRUE", "Yes", "on", "1", "y", "Y", "  on  "] {
            assert_eq!(coerce_ok(raw, FieldType::Bool), json!(true), "{raw:?}");
        }
    }

    #[test]
    fn test_bool_unrecognized_is_false_without_error() {
        for raw in ["maybe", "false", "0", "", "no", "enabled"] {
            assert_eq!(coerce_ok(raw, FieldType::Bool), json!(false), "{raw:?}");
        }
    }

    #[test]
    fn test_int_parses_base_10() {
        assert_eq!(coerce_ok("8080", FieldType::Int), json!(8080));
        assert_eq!(coerce_ok(" -3 ", FieldType::Int), json!(-3));
    }

    #[test]
    fn test_int_rejects_text() {
        let err = coerce("abc", FieldType::Int, "APP_PORT", "app.port").unwrap_err();
        match err {
            ConfigError::TypeCoercion {
                variable,
                path,
                raw,
                expected,
            } => {
                assert_eq!(variable, "APP_PORT");
                assert_eq!(path, "app.port");
                assert_eq!(raw, "abc");
                assert_eq!(expected, "int");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(coerce("1.5", FieldType::Int, "X", "x").is_err());
        assert!(coerce("99999999999999999999", FieldType::Int, "X", "x").is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(coerce_ok("0.25", FieldType::Float), json!(0.25));
        assert_eq!(coerce_ok("3", FieldType::Float), json!(3.0));
        assert!(coerce("fast", FieldType::Float, "X", "x").is_err());
        assert!(coerce("NaN", FieldType::Float, "X", "x").is_err());
    }

    #[test]
    fn test_string_passes_through_untrimmed() {
        assert_eq!(coerce_ok(" debug ", FieldType::String), json!(" debug "));
        assert_eq!(coerce_ok("42", FieldType::String), json!("42"));
    }
}
