//! Identifier type inference, strategy selection and compatibility checks.

mod common;

use persistplan::resolve::unwrap::unwrap_value_object;
use persistplan::{
    ConfigValue, ContractView, DiagnosticCode, DomainKind, DomainType, GenerationStrategy,
    IdentifierResolver, InMemoryDomainModel, MapConfig, MethodView, PlannerConfig, RelationshipType,
    Severity, TypeRef,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn shipment_model(id_type: &str) -> InMemoryDomainModel {
    InMemoryDomainModel::new([
        DomainType::new("com.acme.shipping.Shipment", DomainKind::AggregateRoot).with_property("id", id_type),
    ])
}

fn shipment_repository(id_type: &str) -> ContractView {
    ContractView::new("com.acme.shipping.ShipmentRepository")
        .with_method(MethodView::new("findById", "Optional<Shipment>").with_param("id", id_type))
}

fn configured(strategy: &str) -> PlannerConfig {
    PlannerConfig::default().with_overrides(
        MapConfig::new().with("Shipment.id.generation.strategy", ConfigValue::String(strategy.into())),
    )
}

#[test]
fn test_default_strategy_matrix() {
    let cases = [
        ("Long", GenerationStrategy::Identity),
        ("int", GenerationStrategy::Identity),
        ("UUID", GenerationStrategy::Uuid),
        ("String", GenerationStrategy::Assigned),
    ];
    for (id_type, expected) in cases {
        let (plan, sink) = common::plan(
            &shipment_model(id_type),
            &PlannerConfig::default(),
            &shipment_repository(id_type),
        );
        assert_eq!(plan.identifier().strategy, expected, "{id_type}");
        assert!(!sink.has_errors(), "{id_type}: {:?}", sink.diagnostics());
    }
}

#[test]
fn test_configured_strategy_compatibility() {
    let cases = [
        ("Long", "SEQUENCE", None),
        ("String", "IDENTITY", Some((Severity::Error, DiagnosticCode::ID_STRATEGY_INCOMPATIBLE))),
        ("String", "AUTO", Some((Severity::Error, DiagnosticCode::ID_STRATEGY_INCOMPATIBLE))),
        ("Long", "UUID", Some((Severity::Warning, DiagnosticCode::ID_STRATEGY_MISMATCH))),
        ("String", "UUID", None),
        ("String", "ASSIGNED", None),
    ];
    for (id_type, strategy, expected) in cases {
        let (plan, sink) = common::plan(&shipment_model(id_type), &configured(strategy), &shipment_repository(id_type));
        assert_eq!(plan.identifier().strategy.to_string(), strategy);
        let found = sink.diagnostics().first().map(|d| (d.severity, d.code));
        assert_eq!(found, expected, "{id_type} with {strategy}");
    }
}

#[test]
fn test_sequence_name_defaults_to_table() {
    let (plan, _) = common::plan(&shipment_model("Long"), &configured("SEQUENCE"), &shipment_repository("Long"));
    assert_eq!(plan.identifier().sequence_name.as_deref(), Some("shipments_seq"));
}

#[test]
fn test_unknown_strategy_falls_back() {
    let (plan, sink) = common::plan(&shipment_model("Long"), &configured("SNOWFLAKE"), &shipment_repository("Long"));

    assert_eq!(plan.identifier().strategy, GenerationStrategy::Identity);
    assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::CONFIG_INVALID_VALUE);
}

#[test]
fn test_id_parameter_fallback() {
    let contract = ContractView::new("com.acme.shipping.ShipmentRepository")
        .with_method(MethodView::new("load", "Shipment").with_param("id", "UUID"));

    let (found, _) = IdentifierResolver::infer_identifier_type(&contract).unwrap();
    assert_eq!(found, TypeRef::named("UUID"));
}

#[test]
fn test_composite_identifier_is_embedded() {
    let model = InMemoryDomainModel::new([
        DomainType::new("com.acme.shipping.Shipment", DomainKind::AggregateRoot).with_property("id", "ShipmentKey"),
        DomainType::new("com.acme.shipping.ShipmentKey", DomainKind::ValueObject)
            .with_property("carrier", "String")
            .with_property("trackingNumber", "String"),
    ]);
    let (plan, sink) = common::plan(&model, &PlannerConfig::default(), &shipment_repository("ShipmentKey"));

    assert!(plan.identifier().is_composite);
    assert_eq!(plan.identifier().strategy, GenerationStrategy::Assigned);
    assert_eq!(plan.relationships()[0].relationship_type, RelationshipType::EmbeddedId);
    assert_eq!(plan.artifacts().embeddable_classes, vec!["ShipmentKeyEmbeddable"]);
    assert!(sink.diagnostics().is_empty());
}

fn key_type(arity: usize) -> DomainType {
    let mut key = DomainType::new("com.acme.shipping.ShipmentKey", DomainKind::Identifier);
    for field in 0..arity {
        key = key.with_property(&format!("part{field}"), "Long");
    }
    key
}

proptest! {
    #[test]
    fn prop_composite_iff_more_than_one_field(arity in 0usize..=3) {
        let model = InMemoryDomainModel::new([key_type(arity)]);
        let (plan, _) = common::plan(&model, &PlannerConfig::default(), &shipment_repository("ShipmentKey"));

        prop_assert_eq!(plan.identifier().is_composite, arity > 1);
        if arity > 1 {
            prop_assert_eq!(plan.identifier().strategy, GenerationStrategy::Assigned);
        }
        if arity == 1 {
            prop_assert_eq!(plan.identifier().unwrapped_type.name(), "Long");
        }
    }

    #[test]
    fn prop_unwrapping_is_idempotent(depth in 0usize..5, base in prop::sample::select(vec!["Long", "String", "UUID"])) {
        let mut types = Vec::new();
        let mut inner = base.to_string();
        for level in 0..depth {
            let name = format!("Wrapper{level}");
            types.push(DomainType::new(format!("com.acme.{name}"), DomainKind::ValueObject).with_property("value", &inner));
            inner = name;
        }
        let model = InMemoryDomainModel::new(types);

        let once = unwrap_value_object(&TypeRef::named(inner), &model);
        let twice = unwrap_value_object(&once.resolved, &model);
        prop_assert_eq!(once.resolved.name(), base);
        prop_assert_eq!(twice.resolved, once.resolved);
    }
}
