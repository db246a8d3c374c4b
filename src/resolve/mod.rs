//! Identifier and property resolution.
//!
//! Both resolvers share the value-object unwrapping rule in [`unwrap`] and
//! report problems through a [`DiagnosticSink`](crate::diagnostics::DiagnosticSink)
//! instead of failing.

pub mod chain;
mod identifier;
mod property;
pub mod unwrap;

pub use chain::{Evidence, ResolutionChain, Resolved};
pub use identifier::IdentifierResolver;
pub use property::{PropertyContext, PropertyResolver, DEFAULT_TEXT_LENGTH};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::TypeRef;

/// How identifier values are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStrategy {
    Identity,
    Sequence,
    Auto,
    Uuid,
    Assigned,
}

impl GenerationStrategy {
    /// Strategies where the database produces a numeric key.
    pub fn is_database_generated(self) -> bool {
        matches!(self, Self::Identity | Self::Sequence | Self::Auto)
    }
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "IDENTITY",
            Self::Sequence => "SEQUENCE",
            Self::Auto => "AUTO",
            Self::Uuid => "UUID",
            Self::Assigned => "ASSIGNED",
        };
        write!(f, "{name}")
    }
}

impl FromStr for GenerationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDENTITY" => Ok(Self::Identity),
            "SEQUENCE" => Ok(Self::Sequence),
            "AUTO" => Ok(Self::Auto),
            "UUID" => Ok(Self::Uuid),
            "ASSIGNED" => Ok(Self::Assigned),
            other => Err(format!("unknown generation strategy '{other}'")),
        }
    }
}

/// How the identifier type was found on the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum IdentifierSource {
    /// Single parameter of `findById`, `deleteById` or `existsById`.
    FinderMethod(String),
    /// A parameter literally named `id` on the named method.
    IdParameter(String),
    /// Nothing found; an untyped placeholder is used.
    Placeholder,
}

/// Resolved identifier of the managed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierModel {
    /// Type used for storage.
    pub unwrapped_type: TypeRef,
    /// Domain-facing type; equal to `unwrapped_type` unless a wrapper was removed.
    pub original_type: TypeRef,
    pub strategy: GenerationStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_name: Option<String>,
    /// More than one field; always paired with [`GenerationStrategy::Assigned`].
    pub is_composite: bool,
    pub source: IdentifierSource,
}

impl IdentifierModel {
    pub fn is_wrapped(&self) -> bool {
        self.unwrapped_type != self.original_type
    }
}

/// Which evidence produced each column attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyProvenance {
    pub column_name: Evidence,
    /// `None` when no source supplied a length.
    pub length: Option<Evidence>,
    pub nullable: Evidence,
    pub unique: Evidence,
}

/// Column mapping of one non-identifier property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyModel {
    pub name: String,
    /// Storage type, after unwrapping.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Declared domain type.
    pub original_type: TypeRef,
    pub column_name: String,
    pub length: Option<u32>,
    pub nullable: bool,
    pub unique: bool,
    pub lob: bool,
    pub enumerated: bool,
    pub temporal: bool,
    /// Multi-field value object stored inline.
    pub embedded: bool,
    /// Qualified name of the aggregate this identifier-valued column points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_target: Option<String>,
    pub provenance: PropertyProvenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing_is_case_insensitive() {
        assert_eq!("identity".parse(), Ok(GenerationStrategy::Identity));
        assert_eq!(" Sequence ".parse(), Ok(GenerationStrategy::Sequence));
        assert!("snowflake".parse::<GenerationStrategy>().is_err());
    }

    #[test]
    fn test_database_generated_strategies() {
        assert!(GenerationStrategy::Identity.is_database_generated());
        assert!(GenerationStrategy::Auto.is_database_generated());
        assert!(!GenerationStrategy::Uuid.is_database_generated());
        assert!(!GenerationStrategy::Assigned.is_database_generated());
    }
}
