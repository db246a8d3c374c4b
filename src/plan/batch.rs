use rayon::prelude::*;
use serde::Serialize;

use super::{MappingPlan, MappingPlanBuilder};
use crate::diagnostics::{count_by_severity, Diagnostic, SeverityCounts, TracingSink};
use crate::model::ContractView;

/// A plan together with the diagnostics raised while building it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub plan: MappingPlan,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlanReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn counts(&self) -> SeverityCounts {
        count_by_severity(&self.diagnostics)
    }
}

/// Plan every contract, in input order.
///
/// Contracts share no mutable state, so with `parallel` set and more than one
/// contract the work is spread over the rayon thread pool.
pub fn plan_all(builder: &MappingPlanBuilder<'_>, contracts: &[ContractView], parallel: bool) -> Vec<PlanReport> {
    let plan_one = |contract: &ContractView| {
        let mut sink = TracingSink::new();
        let plan = builder.build(contract, &mut sink);
        PlanReport {
            plan,
            diagnostics: sink.into_diagnostics(),
        }
    };

    if parallel && contracts.len() > 1 {
        contracts.par_iter().map(plan_one).collect()
    } else {
        contracts.iter().map(plan_one).collect()
    }
}
