mod cli;
mod commands;
mod observability;
mod output;
mod state_file;

use std::sync::Arc;

use anyhow::Result;
use brooklyn_core::{BrooklynClient, ProviderConfig, load_config};
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Apply(args) => {
            let client = make_client(&cli)?;
            commands::application::apply(client, &args.file, &args.state.state).await?;
        }
        Commands::Destroy(args) => {
            let client = make_client(&cli)?;
            commands::application::destroy(client, &args.state).await?;
        }
        Commands::Status(args) => {
            let client = make_client(&cli)?;
            commands::application::status(client, &args.state, format).await?;
        }
        Commands::Render(args) => {
            commands::application::render(&args.file)?;
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ProviderConfig> {
    let mut cfg = load_config(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        cfg.endpoint_url = endpoint.clone();
    }
    if let Some(access_key) = &cli.access_key {
        cfg.access_key = access_key.clone();
    }
    if let Some(secret_key) = &cli.secret_key {
        cfg.secret_key = secret_key.clone();
    }
    if cli.skip_ssl_checks {
        cfg.skip_ssl_checks = true;
    }
    cfg.validate()?;
    tracing::debug!(
        endpoint = %cfg.endpoint_url,
        skip_ssl_checks = cfg.skip_ssl_checks,
        "Resolved provider configuration"
    );
    Ok(cfg)
}

fn make_client(cli: &Cli) -> Result<Arc<BrooklynClient>> {
    let cfg = resolve_config(cli)?;
    Ok(Arc::new(cfg.client()?))
}
