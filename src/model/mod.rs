//! Read-only view of the upstream domain and port model.
//!
//! The planner never mutates anything in here. Types are looked up through
//! [`DomainModelLookup`]; contracts are walked directly.

mod lookup;
pub mod type_ref;

pub use lookup::{DomainModelLookup, InMemoryDomainModel, ModelDocument};
pub use type_ref::{CollectionKind, TypeParseError, TypeRef, TypeShape};

use serde::{Deserialize, Serialize};

/// Kind of a domain type as classified by the upstream model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    AggregateRoot,
    Entity,
    #[serde(alias = "record")]
    ValueObject,
    Identifier,
    Enumeration,
    Other,
}

impl DomainKind {
    /// Records and identifiers: candidates for unwrapping or embedding.
    pub fn is_value_like(self) -> bool {
        matches!(self, Self::ValueObject | Self::Identifier)
    }

    /// Entities and aggregate roots: candidates for relationships.
    pub fn is_entity_like(self) -> bool {
        matches!(self, Self::AggregateRoot | Self::Entity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

impl DomainProperty {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainType {
    /// Fully qualified name, e.g. `com.acme.order.Order`.
    pub qualified_name: String,
    pub kind: DomainKind,
    #[serde(default)]
    pub properties: Vec<DomainProperty>,
    /// Qualified name of the aggregate root this type belongs to, when the
    /// upstream model knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<String>,
}

impl DomainType {
    pub fn new(qualified_name: impl Into<String>, kind: DomainKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            properties: Vec::new(),
            aggregate: None,
        }
    }

    pub fn with_property(mut self, name: &str, type_name: &str) -> Self {
        let type_ref = TypeRef::parse(type_name).unwrap_or_else(|_| TypeRef::named(type_name));
        self.properties.push(DomainProperty::new(name, type_ref));
        self
    }

    pub fn with_aggregate(mut self, aggregate: impl Into<String>) -> Self {
        self.aggregate = Some(aggregate.into());
        self
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Declaring namespace, `None` for types in the default namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.qualified_name
            .rsplit_once('.')
            .map(|(namespace, _)| namespace)
    }

    pub fn property(&self, name: &str) -> Option<&DomainProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The aggregate this type belongs to: itself for a root, otherwise the
    /// declared membership.
    pub fn aggregate_membership(&self) -> Option<&str> {
        match self.kind {
            DomainKind::AggregateRoot => Some(&self.qualified_name),
            _ => self.aggregate.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterView {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

impl ParameterView {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

fn void() -> TypeRef {
    TypeRef::named("void")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodView {
    pub name: String,
    #[serde(default = "void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterView>,
}

impl MethodView {
    pub fn new(name: impl Into<String>, return_type: &str) -> Self {
        Self {
            name: name.into(),
            return_type: TypeRef::parse(return_type).unwrap_or_else(|_| TypeRef::named(return_type)),
            parameters: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: &str, type_name: &str) -> Self {
        let type_ref = TypeRef::parse(type_name).unwrap_or_else(|_| TypeRef::named(type_name));
        self.parameters.push(ParameterView::new(name, type_ref));
        self
    }
}

/// A repository-like contract discovered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractView {
    /// Qualified contract name, e.g. `com.acme.order.OrderRepository`.
    pub name: String,
    /// Explicit managed domain type, when the host knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_type: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodView>,
}

impl ContractView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            managed_type: None,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodView) -> Self {
        self.methods.push(method);
        self
    }

    pub fn managing(mut self, managed_type: impl Into<String>) -> Self {
        self.managed_type = Some(managed_type.into());
        self
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}
