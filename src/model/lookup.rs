use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{ContractView, DomainType, TypeRef};
use crate::errors::PlannerError;

/// Read access to the upstream domain model.
///
/// Implementations must be side-effect free; the planner calls `find_type`
/// freely and from several threads when contracts are planned in parallel.
pub trait DomainModelLookup: Send + Sync {
    /// Find a type by qualified or (unambiguous) simple name.
    fn find_type(&self, name: &str) -> Option<&DomainType>;

    /// Convenience lookup for a type reference, ignoring its arguments.
    fn find_ref(&self, type_ref: &TypeRef) -> Option<&DomainType> {
        self.find_type(type_ref.name())
    }
}

/// A domain model held in memory, indexed by qualified and simple name.
///
/// Simple names that are declared in more than one namespace are not
/// indexed; those types can only be found by qualified name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDomainModel {
    types: Vec<DomainType>,
    by_qualified: HashMap<String, usize>,
    by_simple: HashMap<String, Option<usize>>,
}

impl InMemoryDomainModel {
    pub fn new(types: impl IntoIterator<Item = DomainType>) -> Self {
        let mut model = Self::default();
        for ty in types {
            model.insert(ty);
        }
        model
    }

    pub fn insert(&mut self, ty: DomainType) {
        let index = self.types.len();
        self.by_qualified.insert(ty.qualified_name.clone(), index);
        self.by_simple
            .entry(ty.simple_name().to_string())
            .and_modify(|slot| *slot = None)
            .or_insert(Some(index));
        self.types.push(ty);
    }

    pub fn types(&self) -> &[DomainType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DomainModelLookup for InMemoryDomainModel {
    fn find_type(&self, name: &str) -> Option<&DomainType> {
        let index = self
            .by_qualified
            .get(name)
            .copied()
            .or_else(|| self.by_simple.get(name).copied().flatten())?;
        self.types.get(index)
    }
}

/// On-disk form of a model: the domain types plus the contracts to plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub types: Vec<DomainType>,
    #[serde(default)]
    pub contracts: Vec<ContractView>,
}

impl ModelDocument {
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Read a JSON model document from disk.
    pub fn load(path: &Path) -> Result<Self, PlannerError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PlannerError::file_system("Failed to read model document", path, e))?;
        let document = Self::from_json(&contents).map_err(|source| PlannerError::Model {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            types = document.types.len(),
            contracts = document.contracts.len(),
            "loaded model document"
        );
        Ok(document)
    }

    pub fn into_parts(self) -> (InMemoryDomainModel, Vec<ContractView>) {
        (InMemoryDomainModel::new(self.types), self.contracts)
    }
}
