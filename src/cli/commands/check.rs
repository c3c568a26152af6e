use anyhow::Context;

use crate::config::Config;
use crate::db::CommandGateway;

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let gateway = CommandGateway::connect(&config.database)
        .await
        .context("Failed to open database")?;
    gateway.ping().await.context("Database did not answer")?;
    gateway.close().await?;

    println!("✓ Database reachable");
    Ok(())
}
