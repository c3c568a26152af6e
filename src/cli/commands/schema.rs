use anyhow::Context;

use crate::config::Config;
use crate::db::{CommandGateway, schema};

pub async fn cmd_schema(config: &Config, print: bool) -> anyhow::Result<()> {
    if print {
        print!("{}", schema::script());
        return Ok(());
    }

    let gateway = CommandGateway::connect(&config.database)
        .await
        .context("Failed to open database")?;
    schema::install(&gateway).await?;
    gateway.close().await?;

    println!("✓ Schema installed");
    Ok(())
}
