use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::relationship::{AggregateScope, RelationshipModel, RelationshipType};
use crate::types;

/// Checks detected relationships against aggregate-boundary conventions.
///
/// Every finding is advisory; the relationships stay in the plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    pub fn validate_all(relationships: &[RelationshipModel], owner: &str) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = relationships
            .iter()
            .flat_map(|relationship| Self::validate(relationship, owner))
            .collect();
        diagnostics.extend(Self::shared_targets(relationships, owner));
        diagnostics
    }

    /// Policy checks for a single relationship.
    pub fn validate(relationship: &RelationshipModel, owner: &str) -> Vec<Diagnostic> {
        if relationship.scope != AggregateScope::InterAggregate {
            return Vec::new();
        }

        let context = format!("{owner}.{}", relationship.property_name);
        let target = relationship.target_simple_name();
        let mut diagnostics = Vec::new();

        if relationship.orphan_removal {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::REL_ORPHAN_REMOVAL_ACROSS_AGGREGATES,
                    format!(
                        "orphanRemoval on '{}' deletes {target} instances owned by another aggregate",
                        relationship.property_name
                    ),
                )
                .in_context(&context),
            );
        }

        if relationship.has_destructive_cascade() {
            let cascade = relationship
                .cascade
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::REL_DESTRUCTIVE_CASCADE,
                    format!(
                        "Cascade [{cascade}] on '{}' propagates deletes across the aggregate boundary to {target}",
                        relationship.property_name
                    ),
                )
                .in_context(&context),
            );
        }

        if relationship.relationship_type == RelationshipType::ManyToOne {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::REL_MANY_TO_ONE_ACROSS_AGGREGATES,
                    format!(
                        "'{}' references aggregate {target} as an object; reference it by identifier instead",
                        relationship.property_name
                    ),
                )
                .in_context(&context),
            );
        }

        diagnostics
    }

    fn shared_targets(relationships: &[RelationshipModel], owner: &str) -> Vec<Diagnostic> {
        let mut by_target: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        // Collections of plain values (`Set<String>`) carry no identity to cycle through.
        let domain_targets = relationships.iter().filter(|relationship| {
            let target = relationship.target_simple_name();
            !(types::is_simple(target) || types::is_uuid(target))
        });
        for relationship in domain_targets {
            by_target
                .entry(relationship.target_type.as_str())
                .or_default()
                .push(relationship.property_name.as_str());
        }

        by_target
            .into_iter()
            .filter(|(_, properties)| properties.len() > 1)
            .map(|(target, properties)| {
                Diagnostic::info(
                    DiagnosticCode::REL_SHARED_TARGET,
                    format!(
                        "{target} is referenced by {} relationships ({}); check for unintended cycles",
                        properties.len(),
                        properties.join(", ")
                    ),
                )
                .in_context(owner)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::relationship::CascadeType;

    fn inter(property: &str, kind: RelationshipType) -> RelationshipModel {
        RelationshipModel::new(property, kind, "com.acme.customer.Customer", AggregateScope::InterAggregate)
    }

    #[test]
    fn test_intra_aggregate_composition_is_clean() {
        let lines = RelationshipModel::new(
            "lines",
            RelationshipType::OneToMany,
            "com.acme.order.OrderLine",
            AggregateScope::IntraAggregate,
        )
        .with_cascade([CascadeType::All])
        .with_orphan_removal(true);

        assert!(RelationshipValidator::validate_all(&[lines], "Order").is_empty());
    }

    #[test]
    fn test_inter_aggregate_policy_violations() {
        let relationship = inter("customers", RelationshipType::OneToMany)
            .with_cascade([CascadeType::Remove])
            .with_orphan_removal(true);

        let codes: Vec<_> = RelationshipValidator::validate(&relationship, "Order")
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::REL_ORPHAN_REMOVAL_ACROSS_AGGREGATES,
                DiagnosticCode::REL_DESTRUCTIVE_CASCADE,
            ]
        );
    }

    #[test]
    fn test_safe_inter_aggregate_cascade() {
        let relationship =
            inter("customers", RelationshipType::OneToMany).with_cascade([CascadeType::Persist, CascadeType::Merge]);
        assert!(RelationshipValidator::validate(&relationship, "Order").is_empty());
    }

    #[test]
    fn test_many_to_one_across_aggregates() {
        let diagnostics = RelationshipValidator::validate(&inter("customer", RelationshipType::ManyToOne), "Order");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::REL_MANY_TO_ONE_ACROSS_AGGREGATES);
        assert_eq!(diagnostics[0].plugin_context, "Order.customer");
    }

    #[test]
    fn test_shared_target_is_informational() {
        let billing = RelationshipModel::new(
            "billingAddress",
            RelationshipType::Embedded,
            "com.acme.shared.Address",
            AggregateScope::IntraAggregate,
        );
        let shipping = RelationshipModel {
            property_name: "shippingAddress".into(),
            ..billing.clone()
        };

        let diagnostics = RelationshipValidator::validate_all(&[billing, shipping], "Order");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Info);
        assert_eq!(diagnostics[0].code, DiagnosticCode::REL_SHARED_TARGET);
        assert!(diagnostics[0].message.contains("billingAddress, shippingAddress"));
    }

    #[test]
    fn test_shared_plain_value_collections_are_not_reported() {
        let tags = RelationshipModel::new("tags", RelationshipType::ElementCollection, "String", AggregateScope::IntraAggregate);
        let labels = RelationshipModel {
            property_name: "labels".into(),
            ..tags.clone()
        };
        let ids = RelationshipModel::new("legacyIds", RelationshipType::ElementCollection, "UUID", AggregateScope::IntraAggregate);
        let aliases = RelationshipModel {
            property_name: "aliases".into(),
            ..ids.clone()
        };

        assert!(RelationshipValidator::validate_all(&[tags, labels, ids, aliases], "Order").is_empty());
    }
}
