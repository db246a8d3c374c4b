//! Relationship detection and aggregate-boundary classification.
//!
//! Collections of entities become one-to-many compositions, multi-field value
//! objects are embedded, and references to other aggregates are left to the
//! property resolver as identifier-valued columns.

mod classifier;
mod scope;

pub use classifier::RelationshipClassifier;
pub use scope::{determine_scope, ScopeBasis};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::model::CollectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    OneToMany,
    ManyToOne,
    Embedded,
    ElementCollection,
    EmbeddedId,
}

impl RelationshipType {
    /// Mapped through a join table or foreign key instead of a column on the owner.
    pub fn replaces_column(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToOne | Self::ElementCollection)
    }

    pub fn is_embedding(self) -> bool {
        matches!(self, Self::Embedded | Self::EmbeddedId)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OneToMany => "ONE_TO_MANY",
            Self::ManyToOne => "MANY_TO_ONE",
            Self::Embedded => "EMBEDDED",
            Self::ElementCollection => "ELEMENT_COLLECTION",
            Self::EmbeddedId => "EMBEDDED_ID",
        };
        write!(f, "{name}")
    }
}

/// Persistence operations propagated to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeType {
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

impl CascadeType {
    /// Operations that delete the target along with the owner.
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::All | Self::Remove)
    }
}

impl fmt::Display for CascadeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "ALL",
            Self::Persist => "PERSIST",
            Self::Merge => "MERGE",
            Self::Remove => "REMOVE",
            Self::Refresh => "REFRESH",
            Self::Detach => "DETACH",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CascadeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "PERSIST" => Ok(Self::Persist),
            "MERGE" => Ok(Self::Merge),
            "REMOVE" => Ok(Self::Remove),
            "REFRESH" => Ok(Self::Refresh),
            "DETACH" => Ok(Self::Detach),
            other => Err(format!("unknown cascade type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchType {
    Lazy,
    Eager,
}

impl fmt::Display for FetchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lazy => write!(f, "LAZY"),
            Self::Eager => write!(f, "EAGER"),
        }
    }
}

impl FromStr for FetchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LAZY" => Ok(Self::Lazy),
            "EAGER" => Ok(Self::Eager),
            other => Err(format!("unknown fetch type '{other}'")),
        }
    }
}

/// Whether a relationship stays inside one aggregate's consistency boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateScope {
    IntraAggregate,
    InterAggregate,
}

impl fmt::Display for AggregateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntraAggregate => write!(f, "INTRA_AGGREGATE"),
            Self::InterAggregate => write!(f, "INTER_AGGREGATE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipModel {
    pub property_name: String,
    pub relationship_type: RelationshipType,
    /// Qualified name of the target type when the model knows it, else the declared name.
    pub target_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<CollectionKind>,
    pub cascade: BTreeSet<CascadeType>,
    pub fetch: FetchType,
    pub orphan_removal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_column_name: Option<String>,
    pub scope: AggregateScope,
}

impl RelationshipModel {
    /// A relationship with no cascade, lazy fetch and no orphan removal.
    pub fn new(
        property_name: impl Into<String>,
        relationship_type: RelationshipType,
        target_type: impl Into<String>,
        scope: AggregateScope,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            relationship_type,
            target_type: target_type.into(),
            collection_type: None,
            cascade: BTreeSet::new(),
            fetch: FetchType::Lazy,
            orphan_removal: false,
            mapped_by: None,
            join_column_name: None,
            scope,
        }
    }

    pub fn with_collection(mut self, kind: CollectionKind) -> Self {
        self.collection_type = Some(kind);
        self
    }

    pub fn with_cascade(mut self, cascade: impl IntoIterator<Item = CascadeType>) -> Self {
        self.cascade = cascade.into_iter().collect();
        self
    }

    pub fn with_fetch(mut self, fetch: FetchType) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_orphan_removal(mut self, orphan_removal: bool) -> Self {
        self.orphan_removal = orphan_removal;
        self
    }

    pub fn with_join_column(mut self, name: impl Into<String>) -> Self {
        self.join_column_name = Some(name.into());
        self
    }

    pub fn is_composition(&self) -> bool {
        self.scope == AggregateScope::IntraAggregate
    }

    pub fn has_destructive_cascade(&self) -> bool {
        self.cascade.iter().any(|c| c.is_destructive())
    }

    /// Simple name of the target, for table and class naming.
    pub fn target_simple_name(&self) -> &str {
        crate::types::simple_name(&self.target_type)
    }
}
