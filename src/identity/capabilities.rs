//! Capability sets a host framework may ask an account store for.
//!
//! Getters and setters only touch the in-memory [`Account`]; nothing is
//! written until `create_account` or `update_account` runs.

use async_trait::async_trait;

use crate::identity::{IdentityResult, StoreError};
use crate::models::{Account, Claim};

/// Identifier and name access plus lookups.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_id(&self, account: &Account) -> Option<String>;

    /// Assigns an id to an account that has none. An assigned id never changes.
    async fn set_user_id(&self, account: &mut Account, user_id: String);

    async fn user_name(&self, account: &Account) -> Option<String>;

    async fn set_user_name(&self, account: &mut Account, user_name: Option<String>);

    async fn normalized_user_name(&self, account: &Account) -> Option<String>;

    async fn set_normalized_user_name(&self, account: &mut Account, normalized: Option<String>);

    /// Resolves an account by id, including archived ones.
    async fn find_by_id(&self, user_id: &str) -> Option<Account>;

    /// Resolves a non-archived account by normalized user name.
    async fn find_by_name(&self, normalized_user_name: &str) -> Option<Account>;
}

/// Password hash access and the persistence triggers.
#[async_trait]
pub trait UserPasswordStore: UserStore {
    async fn password_hash(&self, account: &Account) -> Option<String>;

    async fn set_password_hash(&self, account: &mut Account, password_hash: Option<String>);

    async fn has_password(&self, account: &Account) -> bool;

    /// Persists a new account. Expects an unassigned id.
    async fn create_account(&self, account: &mut Account) -> IdentityResult;

    /// Persists changes to an existing account. Expects an assigned id.
    async fn update_account(&self, account: &Account) -> IdentityResult;

    /// Soft-deletes the account.
    async fn archive_account(&self, account: &Account) -> IdentityResult;
}

/// Security stamp access. The stamp is persisted by create and update.
#[async_trait]
pub trait UserSecurityStampStore: UserStore {
    async fn security_stamp(&self, account: &Account) -> Option<String>;

    async fn set_security_stamp(&self, account: &mut Account, stamp: String);
}

#[async_trait]
pub trait UserClaimStore: UserStore {
    async fn claims(&self, account: &Account) -> Vec<Claim>;

    async fn add_claims(&self, account: &mut Account, claims: Vec<Claim>);

    /// Replaces the first claim equal to `claim`; does nothing if none is.
    async fn replace_claim(&self, account: &mut Account, claim: &Claim, new_claim: Claim);

    async fn remove_claims(&self, account: &mut Account, claims: &[Claim]);

    /// Reverse lookup of accounts holding `claim`.
    ///
    /// Stores that cannot answer return [`StoreError::Unsupported`] so that
    /// callers can tell it apart from an empty match.
    async fn users_for_claim(&self, claim: &Claim) -> Result<Vec<Account>, StoreError>;
}
