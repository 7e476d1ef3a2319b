use anyhow::Result;
use clap::Parser;
use survey_stats::cli::{Cli, Commands};
use survey_stats::commands::{compute, init};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Compute {
            input,
            entities,
            config,
            output,
            pretty,
            means,
            no_parallel,
        } => compute::handle_compute(compute::ComputeConfig {
            input,
            entities,
            config,
            output,
            pretty,
            means,
            no_parallel,
        }),
        Commands::Init { force } => init::init_config(force),
    }
}

// RUST_LOG wins over -v so individual targets can still be tuned.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("survey_stats={}", default_level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}
