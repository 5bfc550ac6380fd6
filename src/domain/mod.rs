//! Domain types for MySQL account reconciliation.
//!
//! Everything here is pure: no I/O, no logging. The lifecycle service combines
//! these pieces with a live connection.

pub mod identity;
pub mod state;
pub mod user;
pub mod version;

pub use identity::EntityIdentifier;
pub use state::{ChangeSet, PersistedUser, UserResource, hash_sum};
pub use user::{AuthPlugin, Credential, UserSpec};
pub use version::{
    ALTER_USER_MIN_VERSION, ParseVersionError, PasswordDialect, ServerVersion,
    select_password_dialect,
};
