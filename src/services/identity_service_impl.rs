//! Command-gateway implementation of the `IdentityService` trait.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::db::{CommandGateway, GatewayTransaction, Params, Row};
use crate::domain::{AccountId, CredentialType};
use crate::models::{Account, normalize_user_name};
use crate::services::identity_service::{IdentityError, IdentityService};

const FIND_BY_ID: &str = r"
SELECT
    a.id AS id,
    a.user_name AS user_name,
    a.normalized_user_name AS normalized_user_name,
    a.security_stamp AS security_stamp,
    a.is_archived AS is_archived,
    c.hash AS password_hash
FROM account a
    LEFT OUTER JOIN credential c
        ON c.user_id = a.id AND c.type_id = $typeId
WHERE a.id = $userId";

const FIND_ACTIVE_BY_NAME: &str = r"
SELECT
    a.id AS id,
    a.user_name AS user_name,
    a.normalized_user_name AS normalized_user_name,
    a.security_stamp AS security_stamp,
    a.is_archived AS is_archived,
    c.hash AS password_hash
FROM account a
    LEFT OUTER JOIN credential c
        ON c.user_id = a.id AND c.type_id = $typeId
WHERE a.normalized_user_name = $normalizedUserName
    AND a.is_archived = 0";

// Matching only live rows makes a repeated archive affect nothing.
const ARCHIVE: &str = r"
UPDATE account
SET is_archived = 1,
    updated_at = $now
WHERE id = $userId
    AND is_archived = 0";

const INSERT_ACCOUNT: &str = r"
INSERT INTO account (
    user_name, normalized_user_name, security_stamp, is_archived, created_at, updated_at
)
VALUES ($userName, $normalizedUserName, $securityStamp, 0, $now, $now)
RETURNING id";

const UPDATE_ACCOUNT: &str = r"
UPDATE account
SET user_name = $userName,
    normalized_user_name = $normalizedUserName,
    security_stamp = $securityStamp,
    updated_at = $now
WHERE id = $userId";

const INSERT_CREDENTIAL: &str = r"
INSERT INTO credential (user_id, type_id, hash, updated_at)
VALUES ($userId, $typeId, $hash, $now)";

const UPDATE_CREDENTIAL: &str = r"
UPDATE credential
SET hash = $hash,
    updated_at = $now
WHERE user_id = $userId
    AND type_id = $typeId";

const DELETE_CREDENTIAL: &str = r"
DELETE FROM credential
WHERE user_id = $userId
    AND type_id = $typeId";

pub struct SeaOrmIdentityService {
    gateway: CommandGateway,
}

impl SeaOrmIdentityService {
    #[must_use]
    pub const fn new(gateway: CommandGateway) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub const fn gateway(&self) -> &CommandGateway {
        &self.gateway
    }

    #[must_use]
    pub fn into_gateway(self) -> CommandGateway {
        self.gateway
    }

    pub async fn try_find_by_id(&self, id: &AccountId) -> Result<Option<Account>, IdentityError> {
        if id.is_empty() {
            return Err(IdentityError::Validation("account id is required"));
        }
        let Some(key) = id.store_key() else {
            return Ok(None);
        };

        let params = Params::new()
            .bind("userId", key)
            .bind("typeId", CredentialType::Password.id());
        let rows = self.gateway.query(FIND_BY_ID, &params).await?;

        Ok(rows.first().map(account_from_row))
    }

    pub async fn try_find_active_by_normalized_name(
        &self,
        normalized_user_name: &str,
    ) -> Result<Option<Account>, IdentityError> {
        if normalized_user_name.is_empty() {
            return Err(IdentityError::Validation("normalized user name is required"));
        }

        let params = Params::new()
            .bind("normalizedUserName", normalize_user_name(normalized_user_name))
            .bind("typeId", CredentialType::Password.id());
        let rows = self.gateway.query(FIND_ACTIVE_BY_NAME, &params).await?;

        Ok(rows.first().map(account_from_row))
    }

    pub async fn try_archive(&self, id: &AccountId) -> Result<(), IdentityError> {
        if id.is_empty() {
            return Err(IdentityError::Validation("account id is required"));
        }
        let key = id
            .store_key()
            .ok_or_else(|| IdentityError::NotFound(id.clone()))?;

        let params = Params::new().bind("userId", key).bind("now", now());

        let txn = self.gateway.begin().await?;
        let result = match txn.execute(ARCHIVE, &params).await {
            Ok(1) => Ok(()),
            Ok(0) => Err(IdentityError::NotFound(id.clone())),
            Ok(n) => Err(IdentityError::Conflict(format!(
                "archive of {id} matched {n} rows"
            ))),
            Err(err) => Err(err.into()),
        };
        finish(txn, result).await
    }

    /// Persists a new account and returns the id the store assigned.
    pub async fn try_create(&self, account: &mut Account) -> Result<AccountId, IdentityError> {
        let user_name = account
            .user_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(IdentityError::Validation("user name is required"))?;
        let password_hash = account
            .password_hash
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(IdentityError::Validation("password hash is required"))?;
        let security_stamp = account.security_stamp.as_deref().unwrap_or_default();
        let normalized = normalize_user_name(user_name);

        let txn = self.gateway.begin().await?;
        let result = insert_account_with_password(
            &txn,
            user_name,
            &normalized,
            security_stamp,
            password_hash,
        )
        .await;
        let id = finish(txn, result).await?;

        account.id = Some(id.clone());
        account.normalized_user_name = Some(normalized);
        Ok(id)
    }

    pub async fn try_update(&self, account: &Account) -> Result<(), IdentityError> {
        let id = account
            .id
            .as_ref()
            .filter(|id| !id.is_empty())
            .ok_or(IdentityError::Validation("account id is required"))?;
        let user_name = account
            .user_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(IdentityError::Validation("user name is required"))?;
        let key = id
            .store_key()
            .ok_or_else(|| IdentityError::NotFound(id.clone()))?;

        let txn = self.gateway.begin().await?;
        let result = update_account_with_password(&txn, key, user_name, account).await;
        finish(txn, result).await
    }
}

#[async_trait]
impl IdentityService for SeaOrmIdentityService {
    async fn find_by_id(&self, id: &AccountId) -> Option<Account> {
        self.try_find_by_id(id).await.unwrap_or_else(|err| {
            err.log("find_by_id");
            None
        })
    }

    async fn find_active_by_normalized_name(
        &self,
        normalized_user_name: &str,
    ) -> Option<Account> {
        self.try_find_active_by_normalized_name(normalized_user_name)
            .await
            .unwrap_or_else(|err| {
                err.log("find_active_by_normalized_name");
                None
            })
    }

    async fn archive(&self, id: &AccountId) -> bool {
        match self.try_archive(id).await {
            Ok(()) => {
                info!(account_id = %id, "Account archived");
                true
            }
            Err(err) => {
                err.log("archive");
                false
            }
        }
    }

    async fn create(&self, account: &mut Account) -> bool {
        match self.try_create(account).await {
            Ok(id) => {
                info!(account_id = %id, "Account created");
                true
            }
            Err(err) => {
                err.log("create");
                false
            }
        }
    }

    async fn update(&self, account: &Account) -> bool {
        match self.try_update(account).await {
            Ok(()) => {
                debug!(account_id = ?account.id, "Account updated");
                true
            }
            Err(err) => {
                err.log("update");
                false
            }
        }
    }
}

async fn insert_account_with_password(
    txn: &GatewayTransaction,
    user_name: &str,
    normalized_user_name: &str,
    security_stamp: &str,
    password_hash: &str,
) -> Result<AccountId, IdentityError> {
    let now = now();
    let params = Params::new()
        .bind("userName", user_name)
        .bind("normalizedUserName", normalized_user_name)
        .bind("securityStamp", security_stamp)
        .bind("now", now.as_str());

    let rows = txn.query(INSERT_ACCOUNT, &params).await?;
    let key = rows
        .first()
        .and_then(|row| row.non_empty("id"))
        .and_then(|id| id.parse::<i64>().ok())
        .ok_or_else(|| IdentityError::Unavailable("insert returned no account id".to_string()))?;

    let params = Params::new()
        .bind("userId", key)
        .bind("typeId", CredentialType::Password.id())
        .bind("hash", password_hash)
        .bind("now", now.as_str());
    txn.execute(INSERT_CREDENTIAL, &params).await?;

    Ok(AccountId::from(key))
}

async fn update_account_with_password(
    txn: &GatewayTransaction,
    key: i64,
    user_name: &str,
    account: &Account,
) -> Result<(), IdentityError> {
    let now = now();
    let params = Params::new()
        .bind("userId", key)
        .bind("userName", user_name)
        .bind("normalizedUserName", normalize_user_name(user_name))
        .bind(
            "securityStamp",
            account.security_stamp.as_deref().unwrap_or_default(),
        )
        .bind("now", now.as_str());

    if txn.execute(UPDATE_ACCOUNT, &params).await? != 1 {
        return Err(IdentityError::NotFound(AccountId::from(key)));
    }

    let params = Params::new()
        .bind("userId", key)
        .bind("typeId", CredentialType::Password.id());

    match account.password_hash.as_deref().filter(|h| !h.is_empty()) {
        Some(hash) => {
            let params = params.bind("hash", hash).bind("now", now.as_str());
            if txn.execute(UPDATE_CREDENTIAL, &params).await? == 0 {
                txn.execute(INSERT_CREDENTIAL, &params).await?;
            }
        }
        None => {
            txn.execute(DELETE_CREDENTIAL, &params).await?;
        }
    }

    Ok(())
}

/// Commits on success, rolls back otherwise.
async fn finish<T>(
    txn: GatewayTransaction,
    result: Result<T, IdentityError>,
) -> Result<T, IdentityError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("Rollback failed: {rollback_err}");
            }
            Err(err)
        }
    }
}

fn account_from_row(row: &Row) -> Account {
    Account {
        id: row.non_empty("id").map(AccountId::from),
        user_name: row.non_empty("user_name").map(str::to_string),
        normalized_user_name: row.non_empty("normalized_user_name").map(str::to_string),
        password_hash: row.non_empty("password_hash").map(str::to_string),
        security_stamp: row.non_empty("security_stamp").map(str::to_string),
        claims: Vec::new(),
        is_archived: row.text("is_archived") == "1",
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
