//! Planner configuration.
//!
//! Two layers live here: the dotted-key [`ConfigLookup`] the resolvers
//! consult for per-property evidence, and the [`PlannerConfig`] file that
//! carries naming, identifier and feature settings plus those overrides.

mod core;
mod loader;
mod lookup;

pub use self::core::{FeatureConfig, IdentifierConfig, NamingConfig, PlannerConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};
pub use lookup::{
    column_key, generation_key, relationship_key, ConfigLookup, ConfigMismatch, ConfigValue,
    EmptyConfig, MapConfig, Typed,
};
