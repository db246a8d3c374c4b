//! Name- and type-pattern based column defaults.
//!
//! The detector is a stateless strategy object. The planner only talks to
//! the [`HeuristicsDetector`] trait, so a persistence backend with different
//! naming or length conventions can substitute its own implementation.

use serde::{Deserialize, Serialize};

use crate::naming::words;
use crate::types;

/// Column category suggested by a property's name and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Standard,
    LargeObject,
    Temporal,
}

/// Pattern-based defaults for column metadata.
///
/// Each method returns `None` when the heuristic has no opinion, letting the
/// resolution chain fall through to hard-coded defaults.
pub trait HeuristicsDetector: Send + Sync {
    fn column_kind(&self, property: &str, type_name: &str) -> ColumnKind;

    fn max_length(&self, property: &str, type_name: &str) -> Option<u32>;

    fn nullable(&self, property: &str, type_name: &str) -> Option<bool>;

    fn unique(&self, property: &str, type_name: &str) -> Option<bool>;
}

/// Words that mark a text property as long-form content.
const LOB_WORDS: &[&str] = &[
    "description",
    "content",
    "body",
    "notes",
    "comment",
    "comments",
    "biography",
    "bio",
    "html",
    "markdown",
    "payload",
    "transcript",
];

/// Words that mark a property as a natural key.
const UNIQUE_WORDS: &[&str] = &["email", "username", "login", "slug", "sku", "isbn", "iban"];

/// Ordered (word, length) rules; the first match wins.
const LENGTH_RULES: &[(&str, u32)] = &[
    ("currency", 3),
    ("email", 320),
    ("phone", 32),
    ("telephone", 32),
    ("mobile", 32),
    ("zip", 16),
    ("postcode", 16),
    ("postal", 16),
    ("url", 2048),
    ("uri", 2048),
    ("website", 2048),
    ("slug", 128),
    ("username", 64),
    ("login", 64),
    ("code", 64),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeuristics;

impl DefaultHeuristics {
    pub fn new() -> Self {
        Self
    }

    fn contains_any(words: &[String], patterns: &[&str]) -> bool {
        words.iter().any(|w| patterns.contains(&w.as_str()))
    }
}

impl HeuristicsDetector for DefaultHeuristics {
    fn column_kind(&self, property: &str, type_name: &str) -> ColumnKind {
        if types::is_large_object(type_name)
            || (types::is_text(type_name) && Self::contains_any(&words(property), LOB_WORDS))
        {
            ColumnKind::LargeObject
        } else if types::is_temporal(type_name) {
            ColumnKind::Temporal
        } else {
            ColumnKind::Standard
        }
    }

    fn max_length(&self, property: &str, type_name: &str) -> Option<u32> {
        if !types::is_text(type_name) {
            return None;
        }
        let words = words(property);
        LENGTH_RULES
            .iter()
            .find(|(word, _)| words.iter().any(|w| w == word))
            .map(|&(_, length)| length)
    }

    fn nullable(&self, property: &str, type_name: &str) -> Option<bool> {
        if types::is_primitive(type_name) || property == "version" {
            Some(false)
        } else {
            None
        }
    }

    fn unique(&self, property: &str, _type_name: &str) -> Option<bool> {
        let words = words(property);
        // "emailVerified" is not a natural key, "email" and "customerEmail" are.
        words
            .last()
            .filter(|last| UNIQUE_WORDS.contains(&last.as_str()))
            .map(|_| true)
    }
}
