use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "persistplan")]
#[command(about = "Persistence mapping planner for domain models and repository contracts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a mapping plan for every repository contract in a model document
    Plan {
        /// JSON model document with `types` and `contracts`
        #[arg(short, long)]
        model: PathBuf,

        /// Configuration file (defaults to the nearest .persistplan.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only plan these contracts (simple or qualified name); may be repeated
        #[arg(long = "contract")]
        contracts: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Plan contracts one at a time
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

impl Commands {
    /// Verbosity requested on the command line; zero for commands without `-v`.
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Plan { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_arguments() {
        let cli = Cli::try_parse_from([
            "persistplan",
            "plan",
            "--model",
            "model.json",
            "--contract",
            "OrderRepository",
            "--contract",
            "CustomerRepository",
            "--format",
            "yaml",
            "-vv",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan {
                model,
                contracts,
                format,
                verbosity,
                no_parallel,
                ..
            } => {
                assert_eq!(model, PathBuf::from("model.json"));
                assert_eq!(contracts, vec!["OrderRepository", "CustomerRepository"]);
                assert_eq!(format, OutputFormat::Yaml);
                assert_eq!(verbosity, 2);
                assert!(!no_parallel);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_model_is_required() {
        assert!(Cli::try_parse_from(["persistplan", "plan"]).is_err());
    }
}
