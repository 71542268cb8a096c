use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use annoseq_cli::commands::{check, normalize, segments};
use annoseq_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Check(args)) => {
            let summary = check::run(&mut out, args, &config)?;
            out.flush()?;
            if summary.invalid > 0 {
                bail!("{} invalid sequence(s)", summary.invalid);
            }
        }
        Some(Commands::Normalize(args)) => {
            normalize::run(&mut out, args, &config)?;
        }
        Some(Commands::Segments(args)) => {
            let written = segments::run(&mut out, args)?;
            tracing::debug!(written, "segments written");
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(out)?;
        }
    }

    Ok(())
}
