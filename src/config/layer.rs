//! A single configuration layer (defaults, user overrides, or run-computed values)

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{Result, config};

/// An ordered, string-keyed set of configuration values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    values: Mapping,
}

impl ConfigLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a layer from a YAML file containing a top-level mapping
    ///
    /// An empty file is an empty layer.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml_str(&content)
            .map_err(|reason| config::parse_failed(path.display().to_string(), reason))
    }

    /// Parse a layer from YAML text; the error is a human-readable reason
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, String> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(values) => Self::from_mapping(values),
            other => Err(format!(
                "expected a mapping of options, found {}",
                describe(&other)
            )),
        }
    }

    pub fn from_mapping(values: Mapping) -> std::result::Result<Self, String> {
        if let Some(key) = values.keys().find(|k| !k.is_string()) {
            return Err(format!(
                "option names must be strings, found {}",
                describe(key)
            ));
        }
        Ok(Self { values })
    }

    /// Set a value, replacing any previous one for the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values
            .insert(Value::String(key.into()), value.into());
        self
    }

    /// Parse and set a `key=value` pair; the value is read as a YAML scalar
    /// so `dry_run=true` becomes a bool and `salt_version=latest` a string.
    /// Decimals stay text: `salt_version=2019.20` keeps its trailing zero.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<&mut Self> {
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            config::invalid(format!("expected key=value, got '{assignment}'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(config::invalid(format!(
                "empty option name in '{assignment}'"
            )));
        }
        let value = match serde_yaml::from_str::<Value>(raw) {
            Ok(Value::Number(number)) if number.is_f64() => Value::String(raw.to_string()),
            Ok(value) => value,
            Err(_) => Value::String(raw.to_string()),
        };
        Ok(self.set(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().filter_map(Value::as_str)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of this layer (top-level keys only)
    pub fn overlay(&mut self, other: &ConfigLayer) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn into_mapping(self) -> Mapping {
        self.values
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml_str_mapping() {
        let layer = ConfigLayer::from_yaml_str("salt_install: pip\ndry_run: true\n").unwrap();
        assert_eq!(layer.get("salt_install"), Some(&Value::from("pip")));
        assert_eq!(layer.get("dry_run"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_from_yaml_str_empty_document() {
        let layer = ConfigLayer::from_yaml_str("").unwrap();
        assert!(layer.is_empty());
    }

    #[test]
    fn test_from_yaml_str_rejects_list() {
        let err = ConfigLayer::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(err.contains("a list"));
    }

    #[test]
    fn test_from_yaml_str_rejects_non_string_keys() {
        let err = ConfigLayer::from_yaml_str("1: one\n").unwrap_err();
        assert!(err.contains("must be strings"));
    }

    #[test]
    fn test_from_yaml_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yml");
        std::fs::write(&path, "salt_install: [unclosed").unwrap();

        let err = ConfigLayer::from_yaml_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.yml"));
    }

    #[test]
    fn test_set_assignment_parses_scalars() {
        let mut layer = ConfigLayer::new();
        layer.set_assignment("dry_run=true").unwrap();
        layer.set_assignment("salt_version=2017.7.0").unwrap();
        layer.set_assignment("log_level=debug").unwrap();

        assert_eq!(layer.get("dry_run"), Some(&Value::Bool(true)));
        assert_eq!(layer.get("salt_version"), Some(&Value::from("2017.7.0")));
        assert_eq!(layer.get("log_level"), Some(&Value::from("debug")));
    }

    #[test]
    fn test_set_assignment_keeps_decimal_text() {
        let mut layer = ConfigLayer::new();
        layer.set_assignment("salt_version=2019.20").unwrap();
        assert_eq!(layer.get("salt_version"), Some(&Value::from("2019.20")));
    }

    #[test]
    fn test_set_assignment_requires_equals() {
        let mut layer = ConfigLayer::new();
        assert!(layer.set_assignment("dry_run").is_err());
        assert!(layer.set_assignment("=true").is_err());
    }

    #[test]
    fn test_overlay_replaces_top_level_keys() {
        let mut base = ConfigLayer::from_yaml_str("a: 1\nb: {x: 1}\n").unwrap();
        let top = ConfigLayer::from_yaml_str("b: {y: 2}\nc: 3\n").unwrap();
        base.overlay(&top);

        let expected = ConfigLayer::from_yaml_str("a: 1\nb: {y: 2}\nc: 3\n").unwrap();
        assert_eq!(base, expected);
    }
}
