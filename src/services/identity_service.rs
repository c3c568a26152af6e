//! Domain service for account persistence.
//!
//! Resolves accounts by id or normalized name, archives them, and creates or
//! updates an account together with its password credential in one
//! transaction. Implementations never surface store errors: they log the cause
//! and answer with `false` or `None`.

use thiserror::Error;
use tracing::{error, warn};

use crate::db::GatewayError;
use crate::domain::AccountId;
use crate::models::Account;

/// Why an identity operation failed, before it is reduced to a boolean.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Validation failed: {0}")]
    Validation(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<GatewayError> for IdentityError {
    fn from(err: GatewayError) -> Self {
        if err.is_unique_violation() {
            Self::Conflict(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

impl From<sea_orm::DbErr> for IdentityError {
    fn from(err: sea_orm::DbErr) -> Self {
        GatewayError::from(err).into()
    }
}

impl IdentityError {
    /// Writes one log line for the failure. Validation failures stay silent.
    pub fn log(&self, operation: &'static str) {
        match self {
            Self::Validation(_) => {}
            Self::Conflict(_) | Self::NotFound(_) => warn!(operation, "{self}"),
            Self::Unavailable(_) => error!(operation, "{self}"),
        }
    }
}

/// Domain service trait for account persistence.
#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Looks an account up by primary key, archived or not.
    async fn find_by_id(&self, id: &AccountId) -> Option<Account>;

    /// Looks up the non-archived account whose folded user name matches.
    ///
    /// The argument is folded again with `normalize_user_name`, so any casing works.
    async fn find_active_by_normalized_name(&self, normalized_user_name: &str)
    -> Option<Account>;

    /// Marks the account archived. True only if exactly one row changed, so a
    /// second call on the same id answers `false`.
    async fn archive(&self, id: &AccountId) -> bool;

    /// Inserts the account and its password credential atomically and assigns
    /// `account.id` on success. Requires a user name and a password hash.
    async fn create(&self, account: &mut Account) -> bool;

    /// Rewrites the account row and its password credential atomically.
    /// Requires an id and a user name.
    async fn update(&self, account: &Account) -> bool;
}
