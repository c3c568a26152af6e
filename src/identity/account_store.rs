use async_trait::async_trait;
use tracing::warn;

use crate::domain::AccountId;
use crate::identity::capabilities::{
    UserClaimStore, UserPasswordStore, UserSecurityStampStore, UserStore,
};
use crate::identity::{IdentityResult, StoreError};
use crate::models::{Account, Claim};
use crate::services::IdentityService;

/// Account store backed by an [`IdentityService`].
pub struct AccountStore<S> {
    service: S,
}

impl<S> AccountStore<S> {
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    pub fn into_inner(self) -> S {
        self.service
    }
}

#[async_trait]
impl<S: IdentityService> UserStore for AccountStore<S> {
    async fn user_id(&self, account: &Account) -> Option<String> {
        account.id.as_ref().map(ToString::to_string)
    }

    async fn set_user_id(&self, account: &mut Account, user_id: String) {
        if let Some(existing) = &account.id {
            if existing.as_str() != user_id {
                warn!(account_id = %existing, rejected = %user_id, "Ignoring attempt to reassign account id");
            }
            return;
        }
        account.id = Some(AccountId::from(user_id));
    }

    async fn user_name(&self, account: &Account) -> Option<String> {
        account.user_name.clone()
    }

    async fn set_user_name(&self, account: &mut Account, user_name: Option<String>) {
        account.user_name = user_name;
    }

    async fn normalized_user_name(&self, account: &Account) -> Option<String> {
        account.normalized_user_name.clone()
    }

    async fn set_normalized_user_name(&self, account: &mut Account, normalized: Option<String>) {
        account.normalized_user_name = normalized;
    }

    async fn find_by_id(&self, user_id: &str) -> Option<Account> {
        self.service.find_by_id(&AccountId::from(user_id)).await
    }

    async fn find_by_name(&self, normalized_user_name: &str) -> Option<Account> {
        self.service
            .find_active_by_normalized_name(normalized_user_name)
            .await
    }
}

#[async_trait]
impl<S: IdentityService> UserPasswordStore for AccountStore<S> {
    async fn password_hash(&self, account: &Account) -> Option<String> {
        account.password_hash.clone()
    }

    async fn set_password_hash(&self, account: &mut Account, password_hash: Option<String>) {
        account.password_hash = password_hash;
    }

    async fn has_password(&self, account: &Account) -> bool {
        account.has_password()
    }

    async fn create_account(&self, account: &mut Account) -> IdentityResult {
        debug_assert!(account.id.is_none(), "create_account expects an unassigned id");
        self.service.create(account).await.into()
    }

    async fn update_account(&self, account: &Account) -> IdentityResult {
        debug_assert!(account.id.is_some(), "update_account expects an assigned id");
        self.service.update(account).await.into()
    }

    async fn archive_account(&self, account: &Account) -> IdentityResult {
        let Some(id) = &account.id else {
            return IdentityResult::Failed;
        };
        self.service.archive(id).await.into()
    }
}

#[async_trait]
impl<S: IdentityService> UserSecurityStampStore for AccountStore<S> {
    async fn security_stamp(&self, account: &Account) -> Option<String> {
        account.security_stamp.clone()
    }

    async fn set_security_stamp(&self, account: &mut Account, stamp: String) {
        account.security_stamp = Some(stamp);
    }
}

#[async_trait]
impl<S: IdentityService> UserClaimStore for AccountStore<S> {
    async fn claims(&self, account: &Account) -> Vec<Claim> {
        account.claims.clone()
    }

    async fn add_claims(&self, account: &mut Account, claims: Vec<Claim>) {
        account.add_claims(claims);
    }

    async fn replace_claim(&self, account: &mut Account, claim: &Claim, new_claim: Claim) {
        account.replace_claim(claim, new_claim);
    }

    async fn remove_claims(&self, account: &mut Account, claims: &[Claim]) {
        account.remove_claims(claims);
    }

    async fn users_for_claim(&self, _claim: &Claim) -> Result<Vec<Account>, StoreError> {
        Err(StoreError::Unsupported("users_for_claim"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records calls and answers with fixed values.
    #[derive(Default)]
    struct FakeService {
        answer: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeService {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IdentityService for FakeService {
        async fn find_by_id(&self, _id: &AccountId) -> Option<Account> {
            self.calls.lock().unwrap().push("find_by_id");
            None
        }

        async fn find_active_by_normalized_name(&self, _name: &str) -> Option<Account> {
            self.calls.lock().unwrap().push("find_active_by_normalized_name");
            None
        }

        async fn archive(&self, _id: &AccountId) -> bool {
            self.calls.lock().unwrap().push("archive");
            self.answer
        }

        async fn create(&self, account: &mut Account) -> bool {
            self.calls.lock().unwrap().push("create");
            if self.answer {
                account.id = Some(AccountId::new("1"));
            }
            self.answer
        }

        async fn update(&self, _account: &Account) -> bool {
            self.calls.lock().unwrap().push("update");
            self.answer
        }
    }

    #[tokio::test]
    async fn setters_never_reach_the_service() {
        let store = AccountStore::new(FakeService::answering(true));
        let mut account = Account::new("alice");

        store.set_user_name(&mut account, Some("bob".to_string())).await;
        store
            .set_normalized_user_name(&mut account, Some("BOB".to_string()))
            .await;
        store
            .set_password_hash(&mut account, Some("h1".to_string()))
            .await;
        store.set_security_stamp(&mut account, "s1".to_string()).await;

        assert_eq!(store.user_name(&account).await.as_deref(), Some("bob"));
        assert_eq!(store.normalized_user_name(&account).await.as_deref(), Some("BOB"));
        assert_eq!(store.password_hash(&account).await.as_deref(), Some("h1"));
        assert_eq!(store.security_stamp(&account).await.as_deref(), Some("s1"));
        assert!(store.has_password(&account).await);
        assert!(store.service().calls().is_empty());
    }

    #[tokio::test]
    async fn service_answers_map_to_outcomes() {
        let ok = AccountStore::new(FakeService::answering(true));
        let mut account = Account::new("alice");
        assert_eq!(ok.create_account(&mut account).await, IdentityResult::Succeeded);
        assert_eq!(ok.update_account(&account).await, IdentityResult::Succeeded);
        assert_eq!(ok.archive_account(&account).await, IdentityResult::Succeeded);
        assert_eq!(ok.service().calls(), vec!["create", "update", "archive"]);

        let failing = AccountStore::new(FakeService::answering(false));
        let mut account = Account::new("alice");
        assert_eq!(failing.create_account(&mut account).await, IdentityResult::Failed);
    }

    #[tokio::test]
    async fn archive_without_id_fails_without_store_access() {
        let store = AccountStore::new(FakeService::answering(true));
        let account = Account::new("alice");

        assert_eq!(store.archive_account(&account).await, IdentityResult::Failed);
        assert!(store.service().calls().is_empty());
    }

    #[tokio::test]
    async fn assigned_id_is_not_reassigned() {
        let store = AccountStore::new(FakeService::default());
        let mut account = Account::new("alice");

        store.set_user_id(&mut account, "5".to_string()).await;
        store.set_user_id(&mut account, "6".to_string()).await;
        assert_eq!(store.user_id(&account).await.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn lookups_delegate_to_service() {
        let store = AccountStore::new(FakeService::default());

        assert!(store.find_by_id("1").await.is_none());
        assert!(store.find_by_name("ALICE").await.is_none());
        assert_eq!(
            store.service().calls(),
            vec!["find_by_id", "find_active_by_normalized_name"]
        );
    }

    #[tokio::test]
    async fn claims_replace_first_element() {
        let store = AccountStore::new(FakeService::default());
        let mut account = Account::new("alice");
        let user = Claim::new("role", "user");
        let admin = Claim::new("role", "admin");

        store.add_claims(&mut account, vec![user.clone()]).await;
        store.replace_claim(&mut account, &user, admin.clone()).await;
        assert_eq!(store.claims(&account).await, vec![admin.clone()]);

        store.remove_claims(&mut account, &[admin]).await;
        assert!(store.claims(&account).await.is_empty());
    }

    #[tokio::test]
    async fn reverse_claim_lookup_is_unsupported() {
        let store = AccountStore::new(FakeService::default());
        let result = store.users_for_claim(&Claim::new("role", "admin")).await;

        assert_eq!(result, Err(StoreError::Unsupported("users_for_claim")));
    }
}
