use tracing::{debug, info_span};

use super::{ArtifactNames, ContractRef, EntityModel, FeatureFlags, MappingPlan};
use crate::config::{ConfigLookup, PlannerConfig};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::heuristics::{DefaultHeuristics, HeuristicsDetector};
use crate::model::{ContractView, DomainModelLookup, DomainType};
use crate::naming::{infer_entity_name, to_table_name};
use crate::query::QueryMethodAnalyzer;
use crate::relationship::{AggregateScope, FetchType, RelationshipClassifier, RelationshipModel, RelationshipType};
use crate::resolve::{GenerationStrategy, IdentifierModel, IdentifierResolver, PropertyModel, PropertyResolver};
use crate::types;
use crate::validation::RelationshipValidator;

static DEFAULT_HEURISTICS: DefaultHeuristics = DefaultHeuristics;

/// Builds one [`MappingPlan`] per contract.
///
/// The builder holds only shared references, so one instance can plan many
/// contracts, from several threads if needed.
pub struct MappingPlanBuilder<'a> {
    model: &'a dyn DomainModelLookup,
    config: &'a PlannerConfig,
    heuristics: &'a dyn HeuristicsDetector,
}

impl<'a> MappingPlanBuilder<'a> {
    pub fn new(model: &'a dyn DomainModelLookup, config: &'a PlannerConfig) -> Self {
        Self {
            model,
            config,
            heuristics: &DEFAULT_HEURISTICS,
        }
    }

    #[must_use]
    pub fn with_heuristics(mut self, heuristics: &'a dyn HeuristicsDetector) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn build(&self, contract: &ContractView, sink: &mut dyn DiagnosticSink) -> MappingPlan {
        let span = info_span!("mapping_plan", contract = %contract.name);
        let _guard = span.enter();

        let (entity_name, entity_type) = self.resolve_entity(contract, sink);
        let table_name = self.table_name(&entity_name, sink);

        let identifier = IdentifierResolver::new(self.model, self.config)
            .with_default_strategy(self.default_strategy(&entity_name, sink))
            .resolve(contract, &entity_name, &table_name, sink);

        let mut relationships = Vec::new();
        if identifier.is_composite {
            relationships.push(self.embedded_id(&identifier));
        }
        let mut properties = Vec::new();
        if let Some(owner) = entity_type {
            relationships.extend(RelationshipClassifier::new(self.model, self.config).detect(owner, sink));
            properties = self.resolve_properties(owner, &relationships, sink);
        }

        for diagnostic in RelationshipValidator::validate_all(&relationships, &entity_name) {
            sink.report(diagnostic);
        }

        let analyzer = entity_type.map_or_else(QueryMethodAnalyzer::new, QueryMethodAnalyzer::for_entity);
        let query_methods = contract
            .methods
            .iter()
            .filter_map(|method| analyzer.analyze(method, sink))
            .collect();

        let features = self.features(&properties, &relationships);
        let artifacts = self.artifact_names(contract, &entity_name, &relationships);

        debug!(
            entity = %entity_name,
            table = %table_name,
            properties = properties.len(),
            relationships = relationships.len(),
            "mapping plan built"
        );

        MappingPlan::new(
            ContractRef {
                name: contract.name.clone(),
                simple_name: contract.simple_name().to_string(),
                managed_type: contract.managed_type.clone(),
            },
            EntityModel {
                name: entity_name,
                qualified_name: entity_type.map(|t| t.qualified_name.clone()),
                table_name,
                identifier,
                properties,
                relationships,
                features,
            },
            artifacts,
            query_methods,
        )
    }

    /// The managed type named by the contract, or inferred from its name.
    fn resolve_entity(&self, contract: &ContractView, sink: &mut dyn DiagnosticSink) -> (String, Option<&'a DomainType>) {
        let candidate = contract
            .managed_type
            .clone()
            .unwrap_or_else(|| infer_entity_name(contract.simple_name()));

        match self.model.find_type(&candidate) {
            Some(found) => (found.simple_name().to_string(), Some(found)),
            None => {
                sink.report(
                    Diagnostic::warning(
                        DiagnosticCode::ENTITY_INFERENCE_FAILED,
                        format!(
                            "Managed type '{candidate}' of {} is not in the domain model; planning without properties",
                            contract.simple_name()
                        ),
                    )
                    .in_context(contract.simple_name()),
                );
                (types::simple_name(&candidate).to_string(), None)
            }
        }
    }

    /// `[identifier].default_strategy`; an unknown name falls back to the type-based default.
    fn default_strategy(&self, entity_name: &str, sink: &mut dyn DiagnosticSink) -> Option<GenerationStrategy> {
        match self.config.identifier.parsed_default_strategy()? {
            Ok(strategy) => Some(strategy),
            Err(reason) => {
                sink.report(
                    Diagnostic::warning(
                        DiagnosticCode::CONFIG_INVALID_VALUE,
                        format!("Ignoring configuration 'identifier.default_strategy': {reason}"),
                    )
                    .in_context(entity_name),
                );
                None
            }
        }
    }

    fn table_name(&self, entity_name: &str, sink: &mut dyn DiagnosticSink) -> String {
        let key = format!("{entity_name}.table.name");
        let configured = self.config.get_str(&key).unwrap_or_else(|mismatch| {
            sink.report(mismatch.to_diagnostic(entity_name));
            None
        });
        match configured {
            Some(name) => name.to_string(),
            None => format!("{}{}", self.config.naming.table_prefix, to_table_name(entity_name)),
        }
    }

    /// Columns for every property not mapped as a relationship.
    fn resolve_properties(
        &self,
        owner: &DomainType,
        relationships: &[RelationshipModel],
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<PropertyModel> {
        let resolver = PropertyResolver::new(self.model, self.config, self.heuristics);
        owner
            .properties
            .iter()
            .filter(|property| property.name != "id")
            .filter(|property| {
                !relationships
                    .iter()
                    .any(|r| r.property_name == property.name && r.relationship_type.replaces_column())
            })
            .map(|property| resolver.resolve(owner, property, sink))
            .collect()
    }

    fn embedded_id(&self, identifier: &IdentifierModel) -> RelationshipModel {
        let target = self
            .model
            .find_ref(&identifier.unwrapped_type)
            .map_or_else(|| identifier.unwrapped_type.name().to_string(), |t| t.qualified_name.clone());
        RelationshipModel::new("id", RelationshipType::EmbeddedId, target, AggregateScope::IntraAggregate)
            .with_fetch(FetchType::Eager)
    }

    fn features(&self, properties: &[PropertyModel], relationships: &[RelationshipModel]) -> FeatureFlags {
        let versioned = properties
            .iter()
            .any(|p| p.name == "version" && types::is_integral(p.type_ref.simple_name()));
        FeatureFlags {
            auditing: self.config.features.auditing,
            optimistic_locking: self.config.features.optimistic_locking || versioned,
            has_embedded: relationships.iter().any(|r| r.relationship_type.is_embedding())
                || properties.iter().any(|p| p.embedded),
            has_relationships: relationships.iter().any(|r| r.relationship_type.replaces_column()),
            has_enumerations: properties.iter().any(|p| p.enumerated),
            has_temporal: properties.iter().any(|p| p.temporal),
        }
    }

    fn artifact_names(
        &self,
        contract: &ContractView,
        entity_name: &str,
        relationships: &[RelationshipModel],
    ) -> ArtifactNames {
        let naming = &self.config.naming;
        let mut embeddable_classes: Vec<String> = Vec::new();
        for relationship in relationships.iter().filter(|r| r.relationship_type.is_embedding()) {
            let class = format!("{}{}", relationship.target_simple_name(), naming.embeddable_suffix);
            if !embeddable_classes.contains(&class) {
                embeddable_classes.push(class);
            }
        }

        ArtifactNames {
            entity_class: format!("{entity_name}{}", naming.entity_suffix),
            embeddable_classes,
            repository: format!("{entity_name}{}", naming.repository_suffix),
            adapter: format!("{}{}", contract.simple_name(), naming.adapter_suffix),
            mapper: format!("{entity_name}{}", naming.mapper_suffix),
        }
    }
}
