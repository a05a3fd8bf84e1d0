//! Registry validation against the wire query grammar.

use crate::config::{OverrideConfig, RegistryConfig};
use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

/// Operators understood by the remote query parser.
pub const WIRE_OPERATORS: &[&str] = &[
    "=", "!=", "<", ">", "<=", "=<", ">=", "=>", "=~", "!=~", "=~~", "!=~~", ":", "!:", ":~", "!:~",
];

fn field_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_.]+$").expect("static field pattern"))
}

fn sort_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[A-Za-z_.]+$").expect("static sort pattern"))
}

pub fn validate(config: &RegistryConfig) -> Result<(), ConfigError> {
    for (resource, entry) in &config.resources {
        validate_entry(resource, entry)?;
    }
    Ok(())
}

fn validate_entry(resource: &str, entry: &OverrideConfig) -> Result<(), ConfigError> {
    if let Some(path) = &entry.path {
        if path.is_empty() {
            return Err(ConfigError::invalid(resource, "path must not be empty"));
        }
        if path.starts_with('/') || path.ends_with('/') {
            return Err(ConfigError::invalid(
                resource,
                format!("path '{}' must not start or end with '/'", path),
            ));
        }
    }
    if let Some(id_field) = &entry.id_field {
        if id_field.is_empty() {
            return Err(ConfigError::invalid(resource, "idField must not be empty"));
        }
    }
    for (field, rule) in entry.search.iter().flatten() {
        check_field(resource, field)?;
        if let Some(wire) = &rule.field {
            check_field(resource, wire)?;
        }
        if let Some(op) = &rule.operator {
            if !WIRE_OPERATORS.contains(&op.as_str()) {
                return Err(ConfigError::invalid(
                    resource,
                    format!("unknown operator '{}' for search field '{}'", op, field),
                ));
            }
        }
    }
    for (field, target) in &entry.sort {
        check_field(resource, field)?;
        if !sort_pattern().is_match(target) {
            return Err(ConfigError::invalid(
                resource,
                format!("invalid sort target '{}' for field '{}'", target, field),
            ));
        }
    }
    Ok(())
}

fn check_field(resource: &str, field: &str) -> Result<(), ConfigError> {
    if field_pattern().is_match(field) {
        Ok(())
    } else {
        Err(ConfigError::invalid(resource, format!("invalid field name '{}'", field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(v: serde_json::Value) -> RegistryConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn accepts_known_operators_and_signed_sort() {
        let c = config(json!({
            "quotes": {
                "search": {"address": {"operator": "=~~"}, "list": {"field": "items.name", "operator": "!="}},
                "sort": {"createdAt.value": "-createdAt.value"}
            }
        }));
        assert!(validate(&c).is_ok());
    }

    #[test]
    fn rejects_unknown_operator() {
        let c = config(json!({"things": {"search": {"name": {"operator": "LIKE"}}}}));
        let err = validate(&c).unwrap_err();
        assert!(err.to_string().contains("unknown operator 'LIKE'"));
    }

    #[test]
    fn rejects_slashed_path() {
        let c = config(json!({"things": {"path": "/things"}}));
        assert!(matches!(validate(&c), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn rejects_bad_field_names() {
        let c = config(json!({"things": {"search": {"na me": {}}}}));
        assert!(validate(&c).is_err());
        let c = config(json!({"things": {"sort": {"name": "name&limit=1"}}}));
        assert!(validate(&c).is_err());
    }
}
