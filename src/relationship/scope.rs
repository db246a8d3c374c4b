use serde::Serialize;

use super::AggregateScope;
use crate::model::{DomainKind, DomainType};
use crate::types::simple_name;

/// Which fact decided a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeBasis {
    /// The target is itself an aggregate root.
    TargetIsRoot,
    /// Both types declare their aggregate.
    Membership,
    /// Declaring namespaces were compared; unqualified types share the default one.
    Namespace,
}

/// Decide whether a reference from `owner` to `target` stays inside one aggregate.
///
/// Declared membership takes precedence over namespaces. Both types must be
/// resolved; an unresolved target never reaches this point.
pub fn determine_scope(owner: &DomainType, target: &DomainType) -> (AggregateScope, ScopeBasis) {
    if target.kind == DomainKind::AggregateRoot {
        return (AggregateScope::InterAggregate, ScopeBasis::TargetIsRoot);
    }

    if let (Some(ours), Some(theirs)) = (owner.aggregate_membership(), target.aggregate_membership()) {
        let scope = if same_aggregate(ours, theirs) {
            AggregateScope::IntraAggregate
        } else {
            AggregateScope::InterAggregate
        };
        return (scope, ScopeBasis::Membership);
    }

    let scope = if owner.namespace().unwrap_or("") == target.namespace().unwrap_or("") {
        AggregateScope::IntraAggregate
    } else {
        AggregateScope::InterAggregate
    };
    (scope, ScopeBasis::Namespace)
}

/// Membership may be written qualified or as the root's simple name.
fn same_aggregate(a: &str, b: &str) -> bool {
    let either_simple = !a.contains('.') || !b.contains('.');
    a == b || (either_simple && simple_name(a) == simple_name(b))
}
