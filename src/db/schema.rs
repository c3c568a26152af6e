//! Table layout for accounts and their credentials.
//!
//! Every statement is idempotent so [`install`] can run on each start.

use tracing::info;

use super::{CommandGateway, GatewayError, Params};

pub const CREATE_ACCOUNT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS account (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name             TEXT    NOT NULL,
    normalized_user_name  TEXT    NOT NULL,
    security_stamp        TEXT    NOT NULL DEFAULT '',
    is_archived           INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT,
    updated_at            TEXT
)";

pub const CREATE_CREDENTIAL_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS credential (
    user_id     INTEGER NOT NULL REFERENCES account (id),
    type_id     INTEGER NOT NULL,
    hash        TEXT    NOT NULL,
    updated_at  TEXT,
    PRIMARY KEY (user_id, type_id)
)";

/// Active user names are unique by their folded form; archived rows are exempt
/// so a name can be registered again after its holder was archived.
///
/// The folded form is written by the service, not computed with SQL `UPPER`,
/// which only folds ASCII.
pub const CREATE_ACTIVE_USER_NAME_INDEX: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS ux_account_active_user_name
    ON account (normalized_user_name)
    WHERE is_archived = 0";

pub const STATEMENTS: [&str; 3] = [
    CREATE_ACCOUNT_TABLE,
    CREATE_CREDENTIAL_TABLE,
    CREATE_ACTIVE_USER_NAME_INDEX,
];

/// Creates the account and credential tables if they are missing.
pub async fn install(gateway: &CommandGateway) -> Result<(), GatewayError> {
    let params = Params::new();
    for statement in STATEMENTS {
        gateway.execute(statement, &params).await?;
    }
    info!("Account schema installed");
    Ok(())
}

/// DDL as one script, for operators who apply it by hand.
#[must_use]
pub fn script() -> String {
    STATEMENTS
        .iter()
        .map(|s| format!("{};\n", s.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_terminates_every_statement() {
        let script = script();
        assert_eq!(script.matches(";\n").count(), STATEMENTS.len());
        assert!(script.contains("ux_account_active_user_name"));
        assert!(!script.contains("UPPER("));
    }
}
