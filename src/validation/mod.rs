//! Advisory checks over resolved identifiers, properties and relationships.
//!
//! Validators are pure: they return diagnostics and never change what they check.

mod identifier_strategy;
mod relationship;
mod type_compat;

pub use identifier_strategy::IdentifierStrategyValidator;
pub use relationship::RelationshipValidator;
pub use type_compat::TypeCompatibilityValidator;
