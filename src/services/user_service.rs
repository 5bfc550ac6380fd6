//! Domain service for the MySQL account lifecycle.
//!
//! Each call handles one resource and issues at most one statement. Retries,
//! ordering and connection management belong to the caller.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::db::Provider;
use crate::domain::{EntityIdentifier, UserResource};

/// Errors specific to account lifecycle operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Rejected before any statement was issued.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Format(String),

    /// The server rejected or failed to run a statement.
    #[error(transparent)]
    Execution(#[from] sea_orm::DbErr),
}

/// Create / Read / Update / Delete / Import for a single account.
///
/// A failed call never changes the resource identifier.
#[async_trait]
pub trait UserLifecycle: Send + Sync {
    /// Creates the account and records its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] without touching the server when the
    /// spec is invalid, or [`UserError::Execution`] if `CREATE USER` fails.
    async fn create(
        &self,
        resource: &mut UserResource,
        db: &DatabaseConnection,
    ) -> Result<EntityIdentifier, UserError>;

    /// Clears the identifier when no catalog row exists for the user name.
    async fn read(
        &self,
        resource: &mut UserResource,
        db: &DatabaseConnection,
    ) -> Result<(), UserError>;

    /// Rotates the password if a password attribute changed.
    ///
    /// Plugin-managed accounts and unchanged resources are left alone.
    async fn update(&self, resource: &UserResource, provider: &Provider)
    -> Result<(), UserError>;

    /// Drops the account; the identifier is cleared only on success.
    async fn delete(
        &self,
        resource: &mut UserResource,
        db: &DatabaseConnection,
    ) -> Result<(), UserError>;

    /// Adopts an existing account named by a `USER@HOST` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Format`] when `external_id` has no `@`.
    fn import(
        &self,
        external_id: &str,
        resource: UserResource,
    ) -> Result<UserResource, UserError>;
}
