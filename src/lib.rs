//! Persistence mapping planner.
//!
//! Reads a read-only view of domain types and repository-style contracts and
//! produces one immutable [`MappingPlan`] per contract: identifier handling,
//! column metadata, relationship classification and derived query methods.
//! Problems never abort planning; they are reported as [`Diagnostic`]s next
//! to a best-effort plan.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod heuristics;
pub mod model;
pub mod naming;
pub mod output;
pub mod plan;
pub mod query;
pub mod relationship;
pub mod resolve;
pub mod types;
pub mod validation;

pub use crate::config::{ConfigLookup, ConfigValue, EmptyConfig, MapConfig, PlannerConfig};

pub use crate::diagnostics::{
    CollectingSink, Diagnostic, DiagnosticCode, DiagnosticSink, Severity, TracingSink,
};

pub use crate::errors::PlannerError;

pub use crate::heuristics::{ColumnKind, DefaultHeuristics, HeuristicsDetector};

pub use crate::model::{
    CollectionKind, ContractView, DomainKind, DomainModelLookup, DomainProperty, DomainType,
    InMemoryDomainModel, MethodView, ModelDocument, ParameterView, TypeRef, TypeShape,
};

pub use crate::plan::{
    plan_all, ArtifactNames, ContractRef, EntityModel, FeatureFlags, MappingPlan,
    MappingPlanBuilder, PlanReport,
};

pub use crate::query::{
    LogicalOperator, ParameterBinding, QueryMethodAnalyzer, QueryMethodModel, QueryParameter,
    QueryType,
};

pub use crate::relationship::{
    AggregateScope, CascadeType, FetchType, RelationshipClassifier, RelationshipModel,
    RelationshipType,
};

pub use crate::resolve::{
    Evidence, GenerationStrategy, IdentifierModel, IdentifierResolver, PropertyModel,
    PropertyResolver,
};

pub use crate::validation::{
    IdentifierStrategyValidator, RelationshipValidator, TypeCompatibilityValidator,
};
