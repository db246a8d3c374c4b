//! Dotted-key configuration lookup.
//!
//! Keys look like `Order.email.column.length` or
//! `Order.lines.relationship.fetch`. Absence is never an error; a present
//! value of the wrong type is reported by the caller as a configuration
//! diagnostic and the next evidence source is used.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::{Diagnostic, DiagnosticCode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }

    fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(Self::Bool(*b)),
            toml::Value::Integer(i) => Some(Self::Integer(*i)),
            toml::Value::Float(f) => Some(Self::Float(*f)),
            toml::Value::String(s) => Some(Self::String(s.clone())),
            toml::Value::Array(items) => Some(Self::List(
                items.iter().filter_map(Self::from_toml).collect(),
            )),
            toml::Value::Datetime(dt) => Some(Self::String(dt.to_string())),
            toml::Value::Table(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A configuration value that is present but unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMismatch {
    pub key: String,
    pub expected: &'static str,
    pub found: ConfigValue,
}

impl ConfigMismatch {
    pub fn new(key: &str, expected: &'static str, found: &ConfigValue) -> Self {
        Self {
            key: key.to_string(),
            expected,
            found: found.clone(),
        }
    }

    /// Report as a configuration warning; the caller has already fallen back.
    pub fn to_diagnostic(&self, context: &str) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticCode::CONFIG_INVALID_VALUE,
            format!(
                "Ignoring configuration '{}': expected {}, found {} {}",
                self.key,
                self.expected,
                self.found.type_name(),
                self.found
            ),
        )
        .in_context(context)
    }
}

pub type Typed<T> = Result<Option<T>, ConfigMismatch>;

/// Read-only access to dotted configuration keys.
pub trait ConfigLookup: Send + Sync {
    fn get(&self, key: &str) -> Option<&ConfigValue>;

    fn get_u32(&self, key: &str) -> Typed<u32> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Integer(i)) => u32::try_from(*i)
                .map(Some)
                .map_err(|_| ConfigMismatch::new(key, "a non-negative integer", &ConfigValue::Integer(*i))),
            Some(other) => Err(ConfigMismatch::new(key, "a non-negative integer", other)),
        }
    }

    fn get_bool(&self, key: &str) -> Typed<bool> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Bool(b)) => Ok(Some(*b)),
            Some(ConfigValue::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(ConfigValue::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(ConfigMismatch::new(key, "a boolean", other)),
        }
    }

    fn get_str(&self, key: &str) -> Typed<&str> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ConfigMismatch::new(key, "a string", other)),
        }
    }

    /// A list of strings; a single string is accepted as a one-element list.
    fn get_str_list(&self, key: &str) -> Typed<Vec<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::String(s)) => Ok(Some(vec![s.as_str()])),
            Some(list @ ConfigValue::List(items)) => items
                .iter()
                .map(|item| match item {
                    ConfigValue::String(s) => Ok(s.as_str()),
                    _ => Err(ConfigMismatch::new(key, "a list of strings", list)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(ConfigMismatch::new(key, "a list of strings", other)),
        }
    }
}

/// Configuration with no keys at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyConfig;

impl ConfigLookup for EmptyConfig {
    fn get(&self, _key: &str) -> Option<&ConfigValue> {
        None
    }
}

/// Flat map of dotted keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapConfig {
    entries: BTreeMap<String, ConfigValue>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: ConfigValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: ConfigValue) {
        self.entries.insert(key.to_string(), value);
    }

    /// Flatten nested TOML tables into dotted keys.
    ///
    /// `[Order.email.column] length = 120` and `"Order.email.column.length" = 120`
    /// produce the same entry.
    pub fn from_toml_table(table: &toml::Table) -> Self {
        let mut config = Self::new();
        flatten_into(&mut config.entries, "", table);
        config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn flatten_into(entries: &mut BTreeMap<String, ConfigValue>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_into(entries, &full_key, nested),
            other => {
                if let Some(converted) = ConfigValue::from_toml(other) {
                    entries.insert(full_key, converted);
                }
            }
        }
    }
}

impl ConfigLookup for MapConfig {
    fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }
}

impl<'de> Deserialize<'de> for MapConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let table = toml::Table::deserialize(deserializer)?;
        Ok(Self::from_toml_table(&table))
    }
}

/// Key for a column attribute: `<Type>.<property>.column.<attribute>`.
pub fn column_key(type_name: &str, property: &str, attribute: &str) -> String {
    format!("{type_name}.{property}.column.{attribute}")
}

/// Key for a relationship attribute: `<Type>.<property>.relationship.<attribute>`.
pub fn relationship_key(type_name: &str, property: &str, attribute: &str) -> String {
    format!("{type_name}.{property}.relationship.{attribute}")
}

/// Key for an identifier generation attribute: `<Type>.id.generation.<attribute>`.
pub fn generation_key(type_name: &str, attribute: &str) -> String {
    format!("{type_name}.id.generation.{attribute}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_flatten_nested_and_quoted_keys() {
        let table: toml::Table = toml::from_str(indoc! {r#"
            "Order.email.column.length" = 120

            [Order.status.column]
            nullable = false

            [Order.lines.relationship]
            cascade = ["PERSIST", "MERGE"]
        "#})
        .unwrap();
        let config = MapConfig::from_toml_table(&table);

        assert_eq!(config.get_u32("Order.email.column.length"), Ok(Some(120)));
        assert_eq!(config.get_bool("Order.status.column.nullable"), Ok(Some(false)));
        assert_eq!(
            config.get_str_list("Order.lines.relationship.cascade"),
            Ok(Some(vec!["PERSIST", "MERGE"]))
        );
        assert_eq!(config.get_u32("Order.missing.column.length"), Ok(None));
    }

    #[test]
    fn test_wrong_type_is_a_mismatch() {
        let config = MapConfig::new()
            .with("Order.email.column.length", ConfigValue::String("long".into()))
            .with("Order.qty.column.length", ConfigValue::Integer(-1));

        let err = config.get_u32("Order.email.column.length").unwrap_err();
        assert_eq!(err.expected, "a non-negative integer");
        assert!(config.get_u32("Order.qty.column.length").is_err());

        let diagnostic = err.to_diagnostic("Order.email");
        assert_eq!(diagnostic.code, DiagnosticCode::CONFIG_INVALID_VALUE);
        assert!(diagnostic.message.contains("found string \"long\""));
    }

    #[test]
    fn test_bool_accepts_textual_booleans() {
        let config = MapConfig::new().with("A.b.column.unique", ConfigValue::String("TRUE".into()));
        assert_eq!(config.get_bool("A.b.column.unique"), Ok(Some(true)));
    }

    #[test]
    fn test_key_builders() {
        assert_eq!(column_key("Order", "email", "length"), "Order.email.column.length");
        assert_eq!(relationship_key("Order", "lines", "fetch"), "Order.lines.relationship.fetch");
        assert_eq!(generation_key("Order", "strategy"), "Order.id.generation.strategy");
    }
}
