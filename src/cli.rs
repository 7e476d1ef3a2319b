use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "survey-stats")]
#[command(about = "Statistics pipeline for grouped survey responses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute statistics for one question's grouped results
    Compute {
        /// Request document (JSON) with raw results and respondent counts
        #[arg(short, long)]
        input: PathBuf,

        /// Entity metadata (JSON array) used to enrich bucket and facet ids
        #[arg(short, long)]
        entities: Option<PathBuf>,

        /// Configuration file (defaults to discovering .survey-stats.toml)
        #[arg(short, long, env = "SURVEY_STATS_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Compute weighted means regardless of configuration
        #[arg(long)]
        means: bool,

        /// Disable parallel processing across years
        #[arg(long = "no-parallel")]
        no_parallel: bool,
    },

    /// Initialize a configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
