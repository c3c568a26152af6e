pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod identity;
pub mod models;
pub mod services;

pub use config::Config;
pub use db::CommandGateway;
pub use identity::AccountStore;
pub use models::{Account, Claim};
pub use services::{IdentityService, SeaOrmIdentityService};

use anyhow::Context;
use cli::{Cli, Commands};
use config::{GeneralConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber described by `general`.
pub fn init_tracing(general: &GeneralConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match general.log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to install tracing subscriber")?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("Failed to install tracing subscriber")?,
    }

    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config.general)?;

    if !matches!(cli.command, Commands::Init { .. }) {
        config.validate()?;
    }

    match cli.command {
        Commands::Init { path } => cli::cmd_init(path.as_deref()),
        Commands::Schema { print } => cli::cmd_schema(&config, print).await,
        Commands::Find { id, name } => {
            cli::cmd_find(&config, id.as_deref(), name.as_deref()).await
        }
        Commands::Archive { id } => cli::cmd_archive(&config, &id).await,
        Commands::Check => cli::cmd_check(&config).await,
    }
}
