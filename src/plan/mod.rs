//! The mapping plan: everything downstream emitters need for one contract.

mod batch;
mod builder;

pub use batch::{plan_all, PlanReport};
pub use builder::MappingPlanBuilder;

use serde::Serialize;

use crate::query::QueryMethodModel;
use crate::relationship::RelationshipModel;
use crate::resolve::{IdentifierModel, PropertyModel};

/// The contract a plan was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRef {
    pub name: String,
    pub simple_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_type: Option<String>,
}

/// Names of the artifacts generated from a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactNames {
    pub entity_class: String,
    /// One class per embedded value-object type, in first-use order.
    pub embeddable_classes: Vec<String>,
    pub repository: String,
    pub adapter: String,
    pub mapper: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub auditing: bool,
    pub optimistic_locking: bool,
    pub has_embedded: bool,
    pub has_relationships: bool,
    pub has_enumerations: bool,
    pub has_temporal: bool,
}

/// The managed entity: identifier, columns and relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityModel {
    /// Simple name of the domain type.
    pub name: String,
    /// `None` when the domain type could not be found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    pub table_name: String,
    pub identifier: IdentifierModel,
    pub properties: Vec<PropertyModel>,
    pub relationships: Vec<RelationshipModel>,
    pub features: FeatureFlags,
}

impl EntityModel {
    pub fn property(&self, name: &str) -> Option<&PropertyModel> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn relationship(&self, property: &str) -> Option<&RelationshipModel> {
        self.relationships.iter().find(|r| r.property_name == property)
    }
}

/// Complete, immutable plan for one repository-style contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingPlan {
    contract: ContractRef,
    entity: EntityModel,
    artifacts: ArtifactNames,
    query_methods: Vec<QueryMethodModel>,
}

impl MappingPlan {
    pub(crate) fn new(
        contract: ContractRef,
        entity: EntityModel,
        artifacts: ArtifactNames,
        query_methods: Vec<QueryMethodModel>,
    ) -> Self {
        Self {
            contract,
            entity,
            artifacts,
            query_methods,
        }
    }

    pub fn contract(&self) -> &ContractRef {
        &self.contract
    }

    pub fn entity(&self) -> &EntityModel {
        &self.entity
    }

    pub fn identifier(&self) -> &IdentifierModel {
        &self.entity.identifier
    }

    pub fn properties(&self) -> &[PropertyModel] {
        &self.entity.properties
    }

    pub fn relationships(&self) -> &[RelationshipModel] {
        &self.entity.relationships
    }

    pub fn features(&self) -> FeatureFlags {
        self.entity.features
    }

    pub fn artifacts(&self) -> &ArtifactNames {
        &self.artifacts
    }

    pub fn query_methods(&self) -> &[QueryMethodModel] {
        &self.query_methods
    }

    pub fn table_name(&self) -> &str {
        &self.entity.table_name
    }
}
