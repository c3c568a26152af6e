use serde::{Deserialize, Serialize};

use crate::domain::AccountId;

/// A `(type, value)` pair attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// In-memory account record handed back and forth with the host framework.
///
/// Owned by a single request. The framework mutates it through the store
/// capabilities and persistence only happens on an explicit create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// `None` until the store assigns one on create.
    pub id: Option<AccountId>,

    pub user_name: Option<String>,

    /// Upper-cased lookup key.
    pub normalized_user_name: Option<String>,

    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    #[serde(skip_serializing)]
    pub security_stamp: Option<String>,

    #[serde(default)]
    pub claims: Vec<Claim>,

    #[serde(default)]
    pub is_archived: bool,
}

impl Account {
    /// A fresh, unpersisted account carrying only its user name.
    #[must_use]
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn add_claims<I>(&mut self, claims: I)
    where
        I: IntoIterator<Item = Claim>,
    {
        self.claims.extend(claims);
    }

    /// Replaces the first claim equal to `claim` with `new_claim`.
    ///
    /// Returns `false` and leaves the list untouched when nothing matches.
    pub fn replace_claim(&mut self, claim: &Claim, new_claim: Claim) -> bool {
        match self.claims.iter().position(|c| c == claim) {
            Some(index) => {
                self.claims[index] = new_claim;
                true
            }
            None => false,
        }
    }

    /// Removes every occurrence of each given claim. Returns how many were dropped.
    pub fn remove_claims(&mut self, claims: &[Claim]) -> usize {
        let before = self.claims.len();
        self.claims.retain(|c| !claims.contains(c));
        before - self.claims.len()
    }
}

/// Case-folds a user name into its lookup key.
#[must_use]
pub fn normalize_user_name(user_name: &str) -> String {
    user_name.to_uppercase()
}
