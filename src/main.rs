use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fork_sync::cli::Cli;
use fork_sync::dry_run::{print_dry_run, PLACEHOLDER_UPSTREAM_URL};
use fork_sync::{Config, ForkSync, GitClient, GitHubClient};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(cli.verbose, &config.logging.level)?;
    info!("Starting fork-sync v{}", env!("CARGO_PKG_VERSION"));

    let sync_config = cli.sync_config(&config.defaults);
    let mut stdout = io::stdout();

    // Nothing below may run in dry-run mode: no token lookup, no git, no API.
    if sync_config.dry_run {
        print_dry_run(&sync_config, PLACEHOLDER_UPSTREAM_URL, &mut stdout)?;
        return Ok(());
    }

    let github = match GitHubClient::new(&config.github) {
        Ok(client) => client,
        Err(e) => {
            println!("✗ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let git = match GitClient::locate(&config.git).await {
        Ok(client) => client,
        Err(e) => {
            println!("✗ Error while {}", e);
            std::process::exit(1);
        }
    };

    let result = ForkSync::new(&sync_config, &git, &github)
        .with_host_name(config.github.host.as_str())
        .run(&mut stdout)
        .await;

    if let Err(e) = result {
        info!("Sync stopped: {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Initialize logging on stderr; stdout is reserved for user feedback
fn init_logging(verbose: bool, level: &str) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(level)
                .with_context(|| format!("Invalid logging.level: {}", level))?,
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from the specified path or the default location
fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}
