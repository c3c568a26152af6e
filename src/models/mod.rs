pub mod account;

pub use account::{Account, Claim, normalize_user_name};
