use serde::Deserialize;

use super::lookup::{ConfigLookup, ConfigValue, MapConfig};
use crate::resolve::GenerationStrategy;

/// Root configuration structure for persistplan (`.persistplan.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Naming of generated artifacts and tables
    pub naming: NamingConfig,

    /// Identifier defaults
    pub identifier: IdentifierConfig,

    /// Opt-in plan features
    pub features: FeatureConfig,

    /// Per-type, per-property overrides keyed by dotted paths
    pub overrides: MapConfig,
}

impl PlannerConfig {
    #[must_use]
    pub fn with_overrides(mut self, overrides: MapConfig) -> Self {
        self.overrides = overrides;
        self
    }
}

impl ConfigLookup for PlannerConfig {
    fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.overrides.get(key)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    pub table_prefix: String,
    pub entity_suffix: String,
    pub embeddable_suffix: String,
    pub repository_suffix: String,
    pub adapter_suffix: String,
    pub mapper_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            entity_suffix: "Entity".to_string(),
            embeddable_suffix: "Embeddable".to_string(),
            repository_suffix: "JpaRepository".to_string(),
            adapter_suffix: "Adapter".to_string(),
            mapper_suffix: "Mapper".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentifierConfig {
    /// Strategy used when a type has no explicit `id.generation.strategy`.
    /// Kept as written; an unknown name is reported when planning, not when loading.
    pub default_strategy: Option<String>,
}

impl IdentifierConfig {
    /// The configured default strategy, parsed case-insensitively.
    pub fn parsed_default_strategy(&self) -> Option<Result<GenerationStrategy, String>> {
        self.default_strategy.as_deref().map(str::parse)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureConfig {
    pub auditing: bool,
    pub optimistic_locking: bool,
}
