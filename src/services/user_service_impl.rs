//! `SeaORM` implementation of the `UserLifecycle` trait.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{info, warn};

use crate::constants::metrics::STATEMENTS_TOTAL;
use crate::db::Provider;
use crate::db::statements::{
    StatementTemplate, build_create, build_drop, build_password_change, build_read,
};
use crate::domain::{Credential, EntityIdentifier, UserResource, select_password_dialect};
use crate::services::user_service::{UserError, UserLifecycle};

#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmUserService;

impl SeaOrmUserService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// New password selected from change flags: plaintext wins over legacy.
fn changed_credential(resource: &UserResource) -> Credential {
    let spec = &resource.spec;
    if resource.changes.plaintext_password {
        Credential::Plaintext(spec.plaintext_password.clone().unwrap_or_default())
    } else if resource.changes.legacy_password {
        Credential::Legacy(spec.legacy_password.clone().unwrap_or_default())
    } else {
        Credential::None
    }
}

fn record_statement(operation: &'static str, stmt: &StatementTemplate) {
    info!(operation, statement = %stmt.redacted(), "Executing statement");
    metrics::counter!(STATEMENTS_TOTAL, "operation" => operation).increment(1);
}

async fn execute(
    db: &DatabaseConnection,
    operation: &'static str,
    stmt: StatementTemplate,
) -> Result<u64, UserError> {
    record_statement(operation, &stmt);
    let result = db.execute(stmt.into_statement()).await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl UserLifecycle for SeaOrmUserService {
    async fn create(
        &self,
        resource: &mut UserResource,
        db: &DatabaseConnection,
    ) -> Result<EntityIdentifier, UserError> {
        let stmt = build_create(&resource.spec).inspect_err(|e| {
            warn!(user = %resource.spec.name, host = %resource.spec.host, "Rejected create: {e}");
        })?;

        execute(db, "create", stmt).await?;

        let id = resource.spec.identifier();
        resource.set_id(id.clone());
        info!(id = %id, "Created user");
        Ok(id)
    }

    async fn read(
        &self,
        resource: &mut UserResource,
        db: &DatabaseConnection,
    ) -> Result<(), UserError> {
        let stmt = build_read(&resource.spec.name);
        record_statement("read", &stmt);

        let rows = db.query_all(stmt.into_statement()).await?;
        if rows.is_empty() {
            info!(user = %resource.spec.name, "User not found, clearing identifier");
            resource.clear_id();
        }

        Ok(())
    }

    async fn update(
        &self,
        resource: &UserResource,
        provider: &Provider,
    ) -> Result<(), UserError> {
        if resource.spec.auth_plugin.is_some() {
            return Ok(());
        }

        let credential = changed_credential(resource);
        if credential.is_none() {
            return Ok(());
        }

        let dialect = select_password_dialect(&provider.server_version);
        let stmt = build_password_change(&resource.spec, credential.secret(), dialect);
        execute(&provider.conn, "update", stmt).await?;

        info!(user = %resource.spec.name, host = %resource.spec.host, ?dialect, "Password rotated");
        Ok(())
    }

    async fn delete(
        &self,
        resource: &mut UserResource,
        db: &DatabaseConnection,
    ) -> Result<(), UserError> {
        execute(db, "delete", build_drop(&resource.spec)).await?;
        resource.clear_id();
        Ok(())
    }

    fn import(
        &self,
        external_id: &str,
        mut resource: UserResource,
    ) -> Result<UserResource, UserError> {
        let id: EntityIdentifier = external_id.parse()?;

        resource.spec.name = id.name().to_string();
        resource.spec.host = id.host().to_string();
        resource.set_id(id);

        Ok(resource)
    }
}
