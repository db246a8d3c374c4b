use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

const DEFAULT_CONFIG: &str = r#"# persistplan configuration

[naming]
table_prefix = ""
entity_suffix = "Entity"
embeddable_suffix = "Embeddable"
repository_suffix = "JpaRepository"
adapter_suffix = "Adapter"
mapper_suffix = "Mapper"

[identifier]
# IDENTITY, SEQUENCE, AUTO, UUID or ASSIGNED; chosen from the id type when unset
# default_strategy = "IDENTITY"

[features]
auditing = false
optimistic_locking = false

[overrides]
# "Order.email.column.length" = 320
# "Order.orderLines.relationship.fetch" = "EAGER"
# "Order.id.generation.strategy" = "SEQUENCE"
# "Order.table.name" = "purchase_orders"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
