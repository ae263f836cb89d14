use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "brooklyn")]
#[command(about = "Brooklyn CLI: deploy and manage Apache Brooklyn applications")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Provider config file (defaults to ./brooklyn.toml when present)
    #[arg(short, long, global = true, env = "BROOKLYN_CONFIG")]
    pub config: Option<String>,

    /// Server endpoint URL (overrides config file and BROOKLYN__ENDPOINT_URL)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Access key used as the basic auth user
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// Secret key used as the basic auth password
    #[arg(long, global = true)]
    pub secret_key: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub skip_ssl_checks: bool,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or update the declared application
    Apply(ApplyArgs),
    /// Expunge the application recorded in the state file
    Destroy(StateArgs),
    /// Show the remote state of the recorded application
    Status(StateArgs),
    /// Print the blueprint for a declared application without deploying it
    Render(RenderArgs),
}

#[derive(clap::Args)]
pub struct StateArgs {
    /// Path to the state file holding the application id
    #[arg(long, default_value = "brooklyn.state.json")]
    pub state: String,
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Path to the TOML application declaration
    #[arg(long)]
    pub file: String,
    #[command(flatten)]
    pub state: StateArgs,
}

#[derive(clap::Args)]
pub struct RenderArgs {
    /// Path to the TOML application declaration
    #[arg(long)]
    pub file: String,
}
