use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

use super::scope::determine_scope;
use super::{AggregateScope, CascadeType, FetchType, RelationshipModel, RelationshipType};
use crate::config::{relationship_key, ConfigLookup, ConfigMismatch, ConfigValue, Typed};
use crate::diagnostics::DiagnosticSink;
use crate::model::{CollectionKind, DomainKind, DomainModelLookup, DomainProperty, DomainType, TypeRef, TypeShape};
use crate::naming::to_snake_case;
use crate::types;

/// Detects the relationships declared by a domain type's properties.
pub struct RelationshipClassifier<'a> {
    model: &'a dyn DomainModelLookup,
    config: &'a dyn ConfigLookup,
}

impl<'a> RelationshipClassifier<'a> {
    pub fn new(model: &'a dyn DomainModelLookup, config: &'a dyn ConfigLookup) -> Self {
        Self { model, config }
    }

    /// Relationships of every non-identifier property of `owner`, in
    /// declaration order, with configured overrides applied.
    pub fn detect(&self, owner: &DomainType, sink: &mut dyn DiagnosticSink) -> Vec<RelationshipModel> {
        owner
            .properties
            .iter()
            .filter(|property| property.name != "id")
            .filter_map(|property| self.classify(owner, property))
            .map(|relationship| self.apply_overrides(owner, relationship, sink))
            .collect()
    }

    /// Default classification of one property, before overrides.
    pub fn classify(&self, owner: &DomainType, property: &DomainProperty) -> Option<RelationshipModel> {
        match property.type_ref.shape() {
            TypeShape::Collection { kind, element } => self.classify_collection(owner, property, kind, element),
            _ => self.classify_scalar(owner, property),
        }
    }

    fn classify_collection(
        &self,
        owner: &DomainType,
        property: &DomainProperty,
        kind: CollectionKind,
        element: &TypeRef,
    ) -> Option<RelationshipModel> {
        let element_collection = |target: &str| {
            RelationshipModel::new(
                &property.name,
                RelationshipType::ElementCollection,
                target,
                AggregateScope::IntraAggregate,
            )
            .with_collection(kind)
            .with_join_column(format!("{}_id", to_snake_case(owner.simple_name())))
        };

        let Some(target) = self.model.find_ref(element) else {
            let element_name = element.simple_name();
            if types::is_simple(element_name) || types::is_uuid(element_name) {
                return Some(element_collection(element.name()));
            }
            debug!(owner = owner.simple_name(), property = %property.name, element = %element, "unresolved collection element");
            return None;
        };

        match target.kind {
            domain_kind if domain_kind.is_value_like() || domain_kind == DomainKind::Enumeration => {
                Some(element_collection(&target.qualified_name))
            }
            domain_kind if domain_kind.is_entity_like() => {
                let (scope, basis) = determine_scope(owner, target);
                debug!(
                    owner = owner.simple_name(),
                    property = %property.name,
                    %scope,
                    ?basis,
                    "one-to-many"
                );
                let (cascade, orphan_removal) = match scope {
                    AggregateScope::IntraAggregate => (vec![CascadeType::All], true),
                    AggregateScope::InterAggregate => (vec![CascadeType::Persist, CascadeType::Merge], false),
                };
                Some(
                    RelationshipModel::new(&property.name, RelationshipType::OneToMany, &target.qualified_name, scope)
                        .with_collection(kind)
                        .with_cascade(cascade)
                        .with_orphan_removal(orphan_removal)
                        .with_join_column(format!("{}_id", to_snake_case(owner.simple_name()))),
                )
            }
            _ => None,
        }
    }

    fn classify_scalar(&self, owner: &DomainType, property: &DomainProperty) -> Option<RelationshipModel> {
        let target = self.model.find_ref(&property.type_ref)?;

        match target.kind {
            domain_kind if domain_kind.is_value_like() && target.properties.len() > 1 => Some(
                RelationshipModel::new(
                    &property.name,
                    RelationshipType::Embedded,
                    &target.qualified_name,
                    AggregateScope::IntraAggregate,
                )
                .with_fetch(FetchType::Eager),
            ),
            domain_kind if domain_kind.is_entity_like() => {
                let (scope, basis) = determine_scope(owner, target);
                match scope {
                    AggregateScope::IntraAggregate => Some(
                        RelationshipModel::new(&property.name, RelationshipType::ManyToOne, &target.qualified_name, scope)
                            .with_fetch(FetchType::Lazy)
                            .with_join_column(to_snake_case(&format!("{}_id", property.name))),
                    ),
                    AggregateScope::InterAggregate => {
                        debug!(
                            owner = owner.simple_name(),
                            property = %property.name,
                            ?basis,
                            "cross-aggregate reference left as identifier column"
                        );
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Apply `<Type>.<property>.relationship.*` keys on top of the defaults.
    fn apply_overrides(
        &self,
        owner: &DomainType,
        mut relationship: RelationshipModel,
        sink: &mut dyn DiagnosticSink,
    ) -> RelationshipModel {
        let owner_name = owner.simple_name();
        let property = relationship.property_name.clone();
        let key = |attribute: &str| relationship_key(owner_name, &property, attribute);
        let mut mismatches = Vec::new();

        if let Some(fetch) = accept(self.parsed::<FetchType>(&key("fetch"), "LAZY or EAGER"), &mut mismatches) {
            relationship.fetch = fetch;
        }
        if let Some(cascade) = accept(self.cascade(&key("cascade")), &mut mismatches) {
            relationship.cascade = cascade;
        }
        if let Some(orphan_removal) = accept(self.config.get_bool(&key("orphanRemoval")), &mut mismatches) {
            relationship.orphan_removal = orphan_removal;
        }
        if let Some(mapped_by) = accept(self.config.get_str(&key("mappedBy")), &mut mismatches) {
            relationship.mapped_by = Some(mapped_by.to_string());
        }
        if let Some(join_column) = accept(self.config.get_str(&key("joinColumn")), &mut mismatches) {
            relationship.join_column_name = Some(join_column.to_string());
        }

        let context = format!("{owner_name}.{property}");
        for mismatch in mismatches {
            sink.report(mismatch.to_diagnostic(&context));
        }
        relationship
    }

    /// A string value parsed into `T`; unparseable text is a mismatch.
    fn parsed<T: FromStr>(&self, key: &str, expected: &'static str) -> Typed<T> {
        match self.config.get_str(key)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| self.mismatch(key, expected)),
        }
    }

    fn cascade(&self, key: &str) -> Typed<BTreeSet<CascadeType>> {
        let Some(items) = self.config.get_str_list(key)? else {
            return Ok(None);
        };
        items
            .into_iter()
            .map(CascadeType::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some)
            .map_err(|_| self.mismatch(key, "a list of cascade types"))
    }

    fn mismatch(&self, key: &str, expected: &'static str) -> ConfigMismatch {
        let found = self.config.get(key).cloned().unwrap_or(ConfigValue::List(Vec::new()));
        ConfigMismatch::new(key, expected, &found)
    }
}

fn accept<T>(typed: Typed<T>, mismatches: &mut Vec<ConfigMismatch>) -> Option<T> {
    typed.unwrap_or_else(|mismatch| {
        mismatches.push(mismatch);
        None
    })
}
