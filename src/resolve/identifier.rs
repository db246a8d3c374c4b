use tracing::debug;

use super::unwrap::unwrap_value_object;
use super::{GenerationStrategy, IdentifierModel, IdentifierSource};
use crate::config::{generation_key, ConfigLookup};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::model::{ContractView, DomainModelLookup, TypeRef};
use crate::types;
use crate::validation::IdentifierStrategyValidator;

/// Finder-style methods whose single parameter is the identifier.
const ID_METHODS: &[&str] = &["findById", "deleteById", "existsById"];

/// Infers, unwraps and validates the identifier of a contract's entity.
pub struct IdentifierResolver<'a> {
    model: &'a dyn DomainModelLookup,
    config: &'a dyn ConfigLookup,
    default_strategy: Option<GenerationStrategy>,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(model: &'a dyn DomainModelLookup, config: &'a dyn ConfigLookup) -> Self {
        Self {
            model,
            config,
            default_strategy: None,
        }
    }

    /// Strategy used when no per-type strategy is configured.
    #[must_use]
    pub fn with_default_strategy(mut self, strategy: Option<GenerationStrategy>) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Resolve the identifier of `entity_name` as seen through `contract`.
    ///
    /// `table_name` seeds the default sequence name. Problems are reported to
    /// `sink` and never stop resolution.
    pub fn resolve(
        &self,
        contract: &ContractView,
        entity_name: &str,
        table_name: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> IdentifierModel {
        let (declared, source) = match Self::infer_identifier_type(contract) {
            Some(found) => found,
            None => {
                sink.report(
                    Diagnostic::warning(
                        DiagnosticCode::ID_INFERENCE_FAILED,
                        format!(
                            "Could not infer the identifier type of {entity_name}: no findById/deleteById/existsById method and no parameter named 'id'; using an untyped placeholder"
                        ),
                    )
                    .in_context(contract.simple_name()),
                );
                (TypeRef::untyped(), IdentifierSource::Placeholder)
            }
        };

        // A single-field wrapper around a multi-field key is still composite.
        let unwrapped = unwrap_value_object(&declared, self.model);
        if unwrapped.is_multi_field() {
            debug!(entity = entity_name, id_type = %unwrapped.resolved, original = %declared, "composite identifier");
            return IdentifierModel {
                unwrapped_type: unwrapped.resolved,
                original_type: declared,
                strategy: GenerationStrategy::Assigned,
                sequence_name: None,
                is_composite: true,
                source,
            };
        }

        let unwrapped = unwrapped.resolved;
        let strategy = self.select_strategy(entity_name, &unwrapped, sink);
        let sequence_name = match strategy {
            GenerationStrategy::Sequence => Some(self.sequence_name(entity_name, table_name, sink)),
            _ => None,
        };

        if let Some(diagnostic) =
            IdentifierStrategyValidator::validate(&unwrapped, strategy, entity_name)
        {
            sink.report(diagnostic);
        }

        debug!(
            entity = entity_name,
            id_type = %unwrapped,
            original = %declared,
            %strategy,
            "resolved identifier"
        );

        IdentifierModel {
            unwrapped_type: unwrapped,
            original_type: declared,
            strategy,
            sequence_name,
            is_composite: false,
            source,
        }
    }

    /// Identifier type as declared on the contract, before unwrapping.
    pub fn infer_identifier_type(contract: &ContractView) -> Option<(TypeRef, IdentifierSource)> {
        let from_finder = contract
            .methods
            .iter()
            .filter(|m| ID_METHODS.contains(&m.name.as_str()))
            .find_map(|m| match m.parameters.as_slice() {
                [single] => Some((
                    single.type_ref.clone(),
                    IdentifierSource::FinderMethod(m.name.clone()),
                )),
                _ => None,
            });

        from_finder.or_else(|| {
            contract.methods.iter().find_map(|m| {
                m.parameters
                    .iter()
                    .find(|p| p.name == "id")
                    .map(|p| (p.type_ref.clone(), IdentifierSource::IdParameter(m.name.clone())))
            })
        })
    }

    fn select_strategy(
        &self,
        entity_name: &str,
        id_type: &TypeRef,
        sink: &mut dyn DiagnosticSink,
    ) -> GenerationStrategy {
        let key = generation_key(entity_name, "strategy");
        let configured = match self.config.get_str(&key) {
            Ok(Some(raw)) => match raw.parse::<GenerationStrategy>() {
                Ok(strategy) => Some(strategy),
                Err(reason) => {
                    sink.report(
                        Diagnostic::warning(
                            DiagnosticCode::CONFIG_INVALID_VALUE,
                            format!("Ignoring configuration '{key}': {reason}"),
                        )
                        .in_context(entity_name),
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(mismatch) => {
                sink.report(mismatch.to_diagnostic(entity_name));
                None
            }
        };

        configured
            .or(self.default_strategy)
            .unwrap_or_else(|| Self::default_strategy_for(id_type))
    }

    /// Strategy implied by the identifier type alone.
    pub fn default_strategy_for(id_type: &TypeRef) -> GenerationStrategy {
        let type_name = id_type.simple_name();
        if types::is_uuid(type_name) {
            GenerationStrategy::Uuid
        } else if types::is_integral(type_name) {
            GenerationStrategy::Identity
        } else {
            GenerationStrategy::Assigned
        }
    }

    fn sequence_name(
        &self,
        entity_name: &str,
        table_name: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> String {
        let key = generation_key(entity_name, "sequenceName");
        match self.config.get_str(&key) {
            Ok(Some(name)) => name.to_string(),
            Ok(None) => format!("{table_name}_seq"),
            Err(mismatch) => {
                sink.report(mismatch.to_diagnostic(entity_name));
                format!("{table_name}_seq")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigValue, EmptyConfig, MapConfig};
    use crate::diagnostics::{CollectingSink, Severity};
    use crate::model::{DomainKind, DomainType, InMemoryDomainModel, MethodView};

    fn model() -> InMemoryDomainModel {
        InMemoryDomainModel::new([
            DomainType::new("com.acme.OrderId", DomainKind::Identifier).with_property("value", "Long"),
            DomainType::new("com.acme.LineKey", DomainKind::Identifier)
                .with_property("orderId", "Long")
                .with_property("lineNo", "int"),
            DomainType::new("com.acme.LineRef", DomainKind::Identifier).with_property("key", "LineKey"),
        ])
    }

    fn contract_with_finder(id_type: &str) -> ContractView {
        ContractView::new("com.acme.OrderRepository")
            .with_method(MethodView::new("findById", "Optional<Order>").with_param("id", id_type))
    }

    #[test]
    fn test_infers_from_finder_method() {
        let contract = ContractView::new("OrderRepository")
            .with_method(MethodView::new("save", "Order").with_param("order", "Order"))
            .with_method(MethodView::new("existsById", "boolean").with_param("key", "UUID"));

        let (id_type, source) = IdentifierResolver::infer_identifier_type(&contract).unwrap();
        assert_eq!(id_type, TypeRef::named("UUID"));
        assert_eq!(source, IdentifierSource::FinderMethod("existsById".into()));
    }

    #[test]
    fn test_falls_back_to_parameter_named_id() {
        let contract = ContractView::new("OrderRepository")
            .with_method(MethodView::new("findById", "Order").with_param("a", "Long").with_param("b", "Long"))
            .with_method(MethodView::new("archive", "void").with_param("id", "Integer"));

        let (id_type, source) = IdentifierResolver::infer_identifier_type(&contract).unwrap();
        assert_eq!(id_type, TypeRef::named("Integer"));
        assert_eq!(source, IdentifierSource::IdParameter("archive".into()));
    }

    #[test]
    fn test_missing_identifier_warns_and_uses_placeholder() {
        let model = model();
        let resolver = IdentifierResolver::new(&model, &EmptyConfig);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&ContractView::new("OrderRepository"), "Order", "orders", &mut sink);

        assert_eq!(id.unwrapped_type, TypeRef::untyped());
        assert_eq!(id.source, IdentifierSource::Placeholder);
        assert_eq!(id.strategy, GenerationStrategy::Assigned);
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::ID_INFERENCE_FAILED);
        assert_eq!(sink.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_single_field_identifier_is_unwrapped() {
        let model = model();
        let resolver = IdentifierResolver::new(&model, &EmptyConfig);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("OrderId"), "Order", "orders", &mut sink);

        assert_eq!(id.unwrapped_type, TypeRef::named("Long"));
        assert_eq!(id.original_type, TypeRef::named("OrderId"));
        assert!(id.is_wrapped());
        assert_eq!(id.strategy, GenerationStrategy::Identity);
        assert!(!id.is_composite);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_composite_identifier_forces_assigned() {
        let model = model();
        let config = MapConfig::new().with(
            "OrderLine.id.generation.strategy",
            ConfigValue::String("IDENTITY".into()),
        );
        let resolver = IdentifierResolver::new(&model, &config);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("LineKey"), "OrderLine", "order_lines", &mut sink);

        assert!(id.is_composite);
        assert_eq!(id.strategy, GenerationStrategy::Assigned);
        assert_eq!(id.unwrapped_type, TypeRef::named("LineKey"));
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_wrapper_around_composite_key_is_composite() {
        let model = model();
        let resolver = IdentifierResolver::new(&model, &EmptyConfig);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("LineRef"), "OrderLine", "order_lines", &mut sink);

        assert!(id.is_composite);
        assert_eq!(id.strategy, GenerationStrategy::Assigned);
        assert_eq!(id.unwrapped_type, TypeRef::named("LineKey"));
        assert_eq!(id.original_type, TypeRef::named("LineRef"));
    }

    #[test]
    fn test_unknown_identifier_type_falls_back_to_text() {
        let model = model();
        let resolver = IdentifierResolver::new(&model, &EmptyConfig);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("InvoiceId"), "Invoice", "invoices", &mut sink);

        assert_eq!(id.unwrapped_type, TypeRef::named("String"));
        assert_eq!(id.strategy, GenerationStrategy::Assigned);
    }

    #[test]
    fn test_configured_sequence_strategy() {
        let model = model();
        let config = MapConfig::new()
            .with("Order.id.generation.strategy", ConfigValue::String("sequence".into()));
        let resolver = IdentifierResolver::new(&model, &config);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("Long"), "Order", "orders", &mut sink);

        assert_eq!(id.strategy, GenerationStrategy::Sequence);
        assert_eq!(id.sequence_name.as_deref(), Some("orders_seq"));
    }

    #[test]
    fn test_incompatible_configured_strategy_is_reported_not_changed() {
        let model = model();
        let config = MapConfig::new()
            .with("Order.id.generation.strategy", ConfigValue::String("IDENTITY".into()));
        let resolver = IdentifierResolver::new(&model, &config);
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("String"), "Order", "orders", &mut sink);

        assert_eq!(id.strategy, GenerationStrategy::Identity);
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::ID_STRATEGY_INCOMPATIBLE);
    }

    #[test]
    fn test_unknown_strategy_name_falls_back_with_warning() {
        let model = model();
        let config = MapConfig::new()
            .with("Order.id.generation.strategy", ConfigValue::String("snowflake".into()));
        let resolver = IdentifierResolver::new(&model, &config)
            .with_default_strategy(Some(GenerationStrategy::Auto));
        let mut sink = CollectingSink::new();

        let id = resolver.resolve(&contract_with_finder("Long"), "Order", "orders", &mut sink);

        assert_eq!(id.strategy, GenerationStrategy::Auto);
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::CONFIG_INVALID_VALUE);
    }
}
