use anyhow::Result;
use persistplan::cli::{parse_args, Commands};
use persistplan::commands::plan::{plan_contracts, PlanConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status when any contract produced an ERROR diagnostic.
const EXIT_PLAN_ERRORS: u8 = 2;

fn main() -> Result<ExitCode> {
    let cli = parse_args();
    init_logging(cli.command.verbosity());

    match cli.command {
        Commands::Plan {
            model,
            config,
            contracts,
            format,
            output,
            no_parallel,
            verbosity: _,
        } => {
            let has_errors = plan_contracts(PlanConfig {
                model,
                config,
                contracts,
                format,
                output,
                parallel: !no_parallel,
            })?;
            Ok(if has_errors {
                ExitCode::from(EXIT_PLAN_ERRORS)
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Init { force } => {
            persistplan::commands::init::init_config(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` wins over `-v`; diagnostics are logged at WARN and above by default.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
