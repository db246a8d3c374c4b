//! Structured type references.
//!
//! A [`TypeRef`] is a small tree (`Map<String, List<Money>>`) parsed once from
//! its rendered form. Classification code asks for its [`TypeShape`] instead of
//! matching on rendered strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::simple_name;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    name: String,
    arguments: Vec<TypeRef>,
}

/// Container kind of a collection-valued type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

/// What a type reference means structurally, independent of how it was spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape<'a> {
    /// Not a recognised container.
    Plain,
    /// `Optional<T>`.
    Optional(&'a TypeRef),
    /// `List<T>`, `Set<T>`, `Collection<T>`, `Map<K, V>` (element is `V`).
    Collection {
        kind: CollectionKind,
        element: &'a TypeRef,
    },
    /// A paginated result wrapper such as `Page<T>` or `Slice<T>`.
    Paged(&'a TypeRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type reference")]
    Empty,
    #[error("unbalanced '<' or '>' in type reference '{0}'")]
    Unbalanced(String),
    #[error("unexpected trailing input '{rest}' in type reference '{input}'")]
    Trailing { input: String, rest: String },
}

impl TypeRef {
    /// A non-generic type reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Placeholder used when a type could not be inferred.
    pub fn untyped() -> Self {
        Self::named("Object")
    }

    /// Parse generic syntax such as `Map<String, List<Money>>`.
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TypeParseError::Empty);
        }
        let (parsed, rest) = parse_ref(trimmed, input)?;
        if !rest.trim().is_empty() {
            return Err(TypeParseError::Trailing {
                input: input.to_string(),
                rest: rest.trim().to_string(),
            });
        }
        Ok(parsed)
    }

    /// The raw (possibly qualified) base name without arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn arguments(&self) -> &[TypeRef] {
        &self.arguments
    }

    pub fn shape(&self) -> TypeShape<'_> {
        let Some(last) = self.arguments.last() else {
            return TypeShape::Plain;
        };
        match self.simple_name() {
            "Optional" => TypeShape::Optional(last),
            "List" | "ArrayList" | "LinkedList" | "Collection" | "Iterable" => {
                TypeShape::Collection {
                    kind: CollectionKind::List,
                    element: last,
                }
            }
            "Set" | "HashSet" | "LinkedHashSet" | "SortedSet" | "TreeSet" => {
                TypeShape::Collection {
                    kind: CollectionKind::Set,
                    element: last,
                }
            }
            "Map" | "HashMap" | "LinkedHashMap" | "SortedMap" | "TreeMap" => {
                TypeShape::Collection {
                    kind: CollectionKind::Map,
                    element: last,
                }
            }
            "Page" | "Slice" => TypeShape::Paged(last),
            _ => TypeShape::Plain,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape(), TypeShape::Collection { .. })
    }
}

fn parse_ref<'s>(s: &'s str, input: &str) -> Result<(TypeRef, &'s str), TypeParseError> {
    let s = s.trim_start();
    let end = s
        .find(|c| c == '<' || c == '>' || c == ',')
        .unwrap_or(s.len());
    let name = s[..end].trim();
    if name.is_empty() {
        return Err(TypeParseError::Unbalanced(input.to_string()));
    }
    let mut rest = &s[end..];

    let mut arguments = Vec::new();
    if let Some(after_open) = rest.strip_prefix('<') {
        rest = after_open;
        loop {
            let (argument, after) = parse_ref(rest, input)?;
            arguments.push(argument);
            let after = after.trim_start();
            if let Some(next) = after.strip_prefix(',') {
                rest = next;
            } else if let Some(closed) = after.strip_prefix('>') {
                rest = closed;
                break;
            } else {
                return Err(TypeParseError::Unbalanced(input.to_string()));
            }
        }
    }

    Ok((TypeRef::generic(name, arguments), rest))
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{argument}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_generics() {
        let parsed = TypeRef::parse("Map<String, List<com.acme.Money>>").unwrap();
        assert_eq!(parsed.name(), "Map");
        assert_eq!(parsed.arguments().len(), 2);
        assert_eq!(parsed.to_string(), "Map<String, List<com.acme.Money>>");
        assert_eq!(parsed.arguments()[1].arguments()[0].simple_name(), "Money");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(TypeRef::parse("  "), Err(TypeParseError::Empty));
        assert!(matches!(
            TypeRef::parse("List<String"),
            Err(TypeParseError::Unbalanced(_))
        ));
        assert!(matches!(
            TypeRef::parse("List<String>>"),
            Err(TypeParseError::Trailing { .. })
        ));
    }

    #[test]
    fn test_shapes() {
        let list = TypeRef::parse("List<OrderLine>").unwrap();
        assert!(matches!(
            list.shape(),
            TypeShape::Collection { kind: CollectionKind::List, element } if element.name() == "OrderLine"
        ));

        let map = TypeRef::parse("java.util.Map<String, Money>").unwrap();
        assert!(matches!(
            map.shape(),
            TypeShape::Collection { kind: CollectionKind::Map, element } if element.name() == "Money"
        ));

        let optional = TypeRef::parse("Optional<Customer>").unwrap();
        assert!(matches!(optional.shape(), TypeShape::Optional(inner) if inner.name() == "Customer"));

        let page = TypeRef::parse("Page<Customer>").unwrap();
        assert!(matches!(page.shape(), TypeShape::Paged(_)));

        assert_eq!(TypeRef::named("List").shape(), TypeShape::Plain);
        assert_eq!(TypeRef::named("String").shape(), TypeShape::Plain);
    }

    #[test]
    fn test_serde_uses_rendered_form() {
        let parsed: TypeRef = serde_json::from_str("\"Set<Tag>\"").unwrap();
        assert_eq!(parsed, TypeRef::generic("Set", vec![TypeRef::named("Tag")]));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"Set<Tag>\"");
    }
}
