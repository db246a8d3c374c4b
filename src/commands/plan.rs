use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::config::{load_config, load_config_from_path, PlannerConfig};
use crate::model::{ContractView, ModelDocument};
use crate::output::create_writer;
use crate::plan::{plan_all, MappingPlanBuilder, PlanReport};

pub struct PlanConfig {
    pub model: PathBuf,
    pub config: Option<PathBuf>,
    pub contracts: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub parallel: bool,
}

/// Plan the selected contracts and write the reports.
///
/// Returns whether any ERROR diagnostic was raised.
pub fn plan_contracts(config: PlanConfig) -> Result<bool> {
    let document = ModelDocument::load(&config.model)?;
    let planner_config = load_planner_config(config.config.as_ref())?;

    let (model, contracts) = document.into_parts();
    let selected = select_contracts(contracts, &config.contracts)?;
    log::info!(
        "Planning {} contract(s) against {} domain type(s)",
        selected.len(),
        model.len()
    );

    let builder = MappingPlanBuilder::new(&model, &planner_config);
    let reports = plan_all(&builder, &selected, config.parallel);

    write_reports(&reports, config.format, config.output.as_ref())?;
    Ok(reports.iter().any(PlanReport::has_errors))
}

fn load_planner_config(path: Option<&PathBuf>) -> Result<PlannerConfig> {
    match path {
        Some(path) => Ok(load_config_from_path(path)?),
        None => Ok(load_config()),
    }
}

/// Keep contracts named by simple or qualified name, in document order.
/// An empty filter keeps everything; a name that matches nothing is an error.
pub fn select_contracts(contracts: Vec<ContractView>, names: &[String]) -> Result<Vec<ContractView>> {
    if names.is_empty() {
        return Ok(contracts);
    }

    let matches = |contract: &ContractView, name: &str| contract.name == name || contract.simple_name() == name;
    if let Some(missing) = names.iter().find(|name| !contracts.iter().any(|c| matches(c, name))) {
        anyhow::bail!("Contract '{missing}' is not in the model document");
    }

    Ok(contracts
        .into_iter()
        .filter(|contract| names.iter().any(|name| matches(contract, name)))
        .collect())
}

fn write_reports(reports: &[PlanReport], format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    create_writer(format, writer).write_reports(reports)
}
