//! Store adapter consumed by the host authentication framework.
//!
//! The framework talks to an account store through independent capability
//! sets (identity and name, password, security stamp, claims). [`AccountStore`]
//! implements all of them on top of an [`IdentityService`](crate::services::IdentityService).

pub mod account_store;
pub mod capabilities;

pub use account_store::AccountStore;
pub use capabilities::{UserClaimStore, UserPasswordStore, UserSecurityStampStore, UserStore};

use thiserror::Error;

/// Two-valued outcome the framework understands for persistence calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityResult {
    Succeeded,
    Failed,
}

impl IdentityResult {
    #[must_use]
    pub const fn succeeded(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl From<bool> for IdentityResult {
    fn from(ok: bool) -> Self {
        if ok { Self::Succeeded } else { Self::Failed }
    }
}

/// Errors the adapter reports instead of an answer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The capability exists in the contract but this store does not provide it.
    #[error("Not implemented: {0}")]
    Unsupported(&'static str),
}
