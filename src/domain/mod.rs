//! Domain primitives for accounts and credentials.
//!
//! Newtypes keep store keys and discriminators from being mixed up with
//! arbitrary strings and integers as they move between the layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned account identifier.
///
/// The store key is surfaced as an opaque string. Callers never build one
/// for a new account: `create` assigns it after the insert commits.
///
/// # Examples
///
/// ```rust
/// use credgate::domain::AccountId;
///
/// let id = AccountId::from(42_i64);
/// assert_eq!(id.as_str(), "42");
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Integer store key, if this id is exactly one the store could have
    /// handed out. `"01"` or `"1.0"` name no account.
    #[must_use]
    pub fn store_key(&self) -> Option<i64> {
        self.0
            .parse::<i64>()
            .ok()
            .filter(|key| key.to_string() == self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// Discriminator stored in `credential.type_id`.
///
/// Only passwords exist today; the column leaves room for other kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum CredentialType {
    Password = 1,
}

impl CredentialType {
    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for CredentialType {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Password),
            other => Err(other),
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password => f.write_str("password"),
        }
    }
}
