//! Value-object unwrapping.
//!
//! A single-field record or identifier is stored as its one field
//! (`OrderId(Long)` becomes `Long`). Multi-field records stay as they are and
//! are either composite identifiers or embedded values. The rule is applied
//! until a fixed point, so unwrapping an already unwrapped type is a no-op.

use std::collections::HashSet;

use crate::model::{DomainKind, DomainModelLookup, TypeRef};
use crate::types;

/// Conventional suffixes of identifier type names.
const IDENTIFIER_SUFFIXES: &[&str] = &["Id", "ID", "Identifier"];

/// Wrappers nested deeper than this are left as they are.
const MAX_UNWRAP_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwrapKind {
    /// Not a value object; returned unchanged.
    Unchanged,
    /// One or more single-field wrappers were peeled off.
    SingleField,
    /// Unknown to the model but named like an identifier; stored as text.
    HeuristicText,
    /// Multi-field value object; kept as is.
    MultiField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
    pub original: TypeRef,
    pub resolved: TypeRef,
    pub kind: UnwrapKind,
}

impl Unwrapped {
    pub fn is_multi_field(&self) -> bool {
        self.kind == UnwrapKind::MultiField
    }
}

/// Unwrap single-field value objects, following nested wrappers.
pub fn unwrap_value_object(type_ref: &TypeRef, model: &dyn DomainModelLookup) -> Unwrapped {
    let mut current = type_ref.clone();
    let mut kind = UnwrapKind::Unchanged;
    let mut visited = HashSet::new();

    for _ in 0..MAX_UNWRAP_DEPTH {
        if !visited.insert(current.name().to_string()) {
            break;
        }
        let Some(found) = model.find_ref(&current) else {
            if kind == UnwrapKind::Unchanged && looks_like_identifier(&current) {
                return Unwrapped {
                    original: type_ref.clone(),
                    resolved: TypeRef::named("String"),
                    kind: UnwrapKind::HeuristicText,
                };
            }
            break;
        };
        if !found.kind.is_value_like() {
            break;
        }
        match found.properties.as_slice() {
            [single] => {
                current = single.type_ref.clone();
                kind = UnwrapKind::SingleField;
            }
            [_, _, ..] => {
                kind = UnwrapKind::MultiField;
                break;
            }
            _ => break,
        }
    }

    Unwrapped {
        original: type_ref.clone(),
        resolved: current,
        kind,
    }
}

/// Kind of the type after unwrapping, if the model knows it.
pub fn kind_of(type_ref: &TypeRef, model: &dyn DomainModelLookup) -> Option<DomainKind> {
    model.find_ref(type_ref).map(|t| t.kind)
}

fn looks_like_identifier(type_ref: &TypeRef) -> bool {
    let simple = type_ref.simple_name();
    !types::is_well_known(simple)
        && type_ref.arguments().is_empty()
        && IDENTIFIER_SUFFIXES
            .iter()
            .any(|suffix| simple.len() > suffix.len() && simple.ends_with(suffix))
}
