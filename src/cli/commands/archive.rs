use crate::config::Config;
use crate::domain::AccountId;
use crate::services::IdentityService;

use super::open_service;

pub async fn cmd_archive(config: &Config, id: &str) -> anyhow::Result<()> {
    let service = open_service(config).await?;

    if service.archive(&AccountId::from(id)).await {
        println!("✓ Archived account {id}");
    } else {
        println!("Account {id} was not archived (unknown id or already archived).");
    }

    Ok(())
}
