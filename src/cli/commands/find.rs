use crate::config::Config;
use crate::domain::AccountId;
use crate::services::IdentityService;

use super::open_service;

pub async fn cmd_find(
    config: &Config,
    id: Option<&str>,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let service = open_service(config).await?;

    let account = match (id, name) {
        (Some(id), _) => service.find_by_id(&AccountId::from(id)).await,
        (None, Some(name)) => {
            service
                .find_active_by_normalized_name(&crate::models::normalize_user_name(name))
                .await
        }
        (None, None) => anyhow::bail!("Either --id or --name is required"),
    };

    let Some(account) = account else {
        println!("No matching account.");
        return Ok(());
    };

    let view = serde_json::json!({
        "account": account,
        "has_password": account.has_password(),
    });
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
