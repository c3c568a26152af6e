//! Store adapter flows the host framework drives, end to end over SQLite.

use credgate::db::{CommandGateway, schema};
use credgate::identity::{
    AccountStore, IdentityResult, StoreError, UserClaimStore, UserPasswordStore,
    UserSecurityStampStore, UserStore,
};
use credgate::models::{Account, Claim};
use credgate::services::SeaOrmIdentityService;

async fn store() -> AccountStore<SeaOrmIdentityService> {
    let gateway = CommandGateway::open("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    schema::install(&gateway)
        .await
        .expect("failed to install schema");
    AccountStore::new(SeaOrmIdentityService::new(gateway))
}

/// What a framework does on registration: build, normalize, hash, stamp, create.
async fn register(
    store: &AccountStore<SeaOrmIdentityService>,
    user_name: &str,
    hash: &str,
) -> Account {
    let mut account = Account::default();
    store
        .set_user_name(&mut account, Some(user_name.to_string()))
        .await;
    store
        .set_normalized_user_name(&mut account, Some(user_name.to_uppercase()))
        .await;
    store
        .set_password_hash(&mut account, Some(hash.to_string()))
        .await;
    store
        .set_security_stamp(&mut account, "stamp-1".to_string())
        .await;

    assert_eq!(
        store.create_account(&mut account).await,
        IdentityResult::Succeeded
    );
    account
}

#[tokio::test]
async fn registration_then_sign_in_lookup() {
    let store = store().await;
    let account = register(&store, "alice", "h1").await;

    let user_id = store.user_id(&account).await.expect("id assigned");
    let by_name = store.find_by_name("ALICE").await.expect("found by name");
    assert_eq!(store.user_id(&by_name).await.as_deref(), Some(user_id.as_str()));
    assert_eq!(store.password_hash(&by_name).await.as_deref(), Some("h1"));
    assert_eq!(store.security_stamp(&by_name).await.as_deref(), Some("stamp-1"));
    assert!(store.has_password(&by_name).await);

    let by_id = store.find_by_id(&user_id).await.expect("found by id");
    assert_eq!(by_id.user_name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn setters_only_persist_on_update() {
    let store = store().await;
    let mut account = register(&store, "alice", "h1").await;
    let user_id = store.user_id(&account).await.expect("id assigned");

    store
        .set_password_hash(&mut account, Some("h2".to_string()))
        .await;
    store
        .set_security_stamp(&mut account, "stamp-2".to_string())
        .await;

    let stale = store.find_by_id(&user_id).await.expect("found");
    assert_eq!(stale.password_hash.as_deref(), Some("h1"));

    assert_eq!(
        store.update_account(&account).await,
        IdentityResult::Succeeded
    );
    let fresh = store.find_by_id(&user_id).await.expect("found");
    assert_eq!(fresh.password_hash.as_deref(), Some("h2"));
    assert_eq!(fresh.security_stamp.as_deref(), Some("stamp-2"));
}

#[tokio::test]
async fn archive_hides_account_from_sign_in() {
    let store = store().await;
    let account = register(&store, "alice", "h1").await;

    assert_eq!(
        store.archive_account(&account).await,
        IdentityResult::Succeeded
    );
    assert!(store.find_by_name("ALICE").await.is_none());
    assert_eq!(
        store.archive_account(&account).await,
        IdentityResult::Failed
    );

    let user_id = store.user_id(&account).await.expect("id assigned");
    assert!(store.find_by_id(&user_id).await.expect("still there").is_archived);
}

#[tokio::test]
async fn create_without_hash_fails() {
    let store = store().await;
    let mut account = Account::new("alice");

    assert!(!store.has_password(&account).await);
    assert_eq!(
        store.create_account(&mut account).await,
        IdentityResult::Failed
    );
    assert!(store.find_by_name("ALICE").await.is_none());
}

#[tokio::test]
async fn duplicate_registration_fails() {
    let store = store().await;
    register(&store, "alice", "h1").await;

    let mut again = Account::new("Alice");
    store
        .set_password_hash(&mut again, Some("h2".to_string()))
        .await;
    assert_eq!(
        store.create_account(&mut again).await,
        IdentityResult::Failed
    );
}

#[tokio::test]
async fn replace_claim_at_first_position() {
    let store = store().await;
    let mut account = register(&store, "alice", "h1").await;
    let user = Claim::new("role", "user");
    let admin = Claim::new("role", "admin");

    store.add_claims(&mut account, vec![user.clone()]).await;
    store.replace_claim(&mut account, &user, admin.clone()).await;

    assert_eq!(store.claims(&account).await, vec![admin]);
}

#[tokio::test]
async fn claim_batch_add_and_remove() {
    let store = store().await;
    let mut account = register(&store, "alice", "h1").await;
    let claims = vec![
        Claim::new("role", "user"),
        Claim::new("team", "red"),
        Claim::new("role", "user"),
    ];

    store.add_claims(&mut account, claims).await;
    store
        .replace_claim(&mut account, &Claim::new("role", "guest"), Claim::new("role", "admin"))
        .await;
    assert_eq!(store.claims(&account).await.len(), 3);

    store
        .remove_claims(&mut account, &[Claim::new("role", "user")])
        .await;
    assert_eq!(store.claims(&account).await, vec![Claim::new("team", "red")]);
}

#[tokio::test]
async fn users_for_claim_is_not_an_empty_answer() {
    let store = store().await;
    register(&store, "alice", "h1").await;

    let result = store.users_for_claim(&Claim::new("role", "user")).await;
    assert!(matches!(result, Err(StoreError::Unsupported(_))));
}

#[tokio::test]
async fn sign_in_lookup_with_non_ascii_name() {
    let store = store().await;
    let account = register(&store, "Ørjan", "h1").await;

    let found = store.find_by_name("ØRJAN").await.expect("found by name");
    assert_eq!(store.user_id(&found).await, store.user_id(&account).await);
    assert_eq!(store.user_name(&found).await.as_deref(), Some("Ørjan"));
}
