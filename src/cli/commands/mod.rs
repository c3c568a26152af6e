mod archive;
mod check;
mod find;
mod init;
mod schema;

pub use archive::cmd_archive;
pub use check::cmd_check;
pub use find::cmd_find;
pub use init::cmd_init;
pub use schema::cmd_schema;

use anyhow::Context;

use crate::config::Config;
use crate::db::{CommandGateway, schema as ddl};
use crate::services::SeaOrmIdentityService;

async fn open_service(config: &Config) -> anyhow::Result<SeaOrmIdentityService> {
    let gateway = CommandGateway::connect(&config.database)
        .await
        .context("Failed to open database")?;

    if config.database.install_schema {
        ddl::install(&gateway)
            .await
            .context("Failed to install account schema")?;
    }

    Ok(SeaOrmIdentityService::new(gateway))
}
