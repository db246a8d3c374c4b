//! Evidence-based resolution.
//!
//! An attribute is resolved by trying an ordered list of sources and taking
//! the first one that has a value. The order is data, not control flow, so it
//! can be inspected with [`ResolutionChain::evidence_order`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// Explicit configuration key
    Configuration,
    /// Name/type pattern from the heuristics detector
    Heuristic,
    /// Hard-coded default
    Default,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Heuristic => write!(f, "heuristic"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub evidence: Evidence,
}

type Source<'a, C, T> = Box<dyn Fn(&C) -> Option<T> + 'a>;

/// Ordered sources for one attribute over a context `C`.
pub struct ResolutionChain<'a, C, T> {
    attribute: &'static str,
    steps: Vec<(Evidence, Source<'a, C, T>)>,
}

impl<'a, C, T> ResolutionChain<'a, C, T> {
    pub fn new(attribute: &'static str) -> Self {
        Self {
            attribute,
            steps: Vec::new(),
        }
    }

    /// Append a source; sources are tried in the order they were added.
    #[must_use]
    pub fn then(mut self, evidence: Evidence, source: impl Fn(&C) -> Option<T> + 'a) -> Self {
        self.steps.push((evidence, Box::new(source)));
        self
    }

    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    pub fn evidence_order(&self) -> Vec<Evidence> {
        self.steps.iter().map(|(evidence, _)| *evidence).collect()
    }

    /// First present value, with the evidence that produced it.
    pub fn resolve(&self, context: &C) -> Option<Resolved<T>> {
        self.steps.iter().find_map(|(evidence, source)| {
            source(context).map(|value| Resolved {
                value,
                evidence: *evidence,
            })
        })
    }
}

impl<C, T> fmt::Debug for ResolutionChain<'_, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionChain")
            .field("attribute", &self.attribute)
            .field("order", &self.evidence_order())
            .finish()
    }
}
