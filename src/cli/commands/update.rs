use anyhow::Result;

use crate::cli::CredentialArgs;
use crate::config::Config;
use crate::db::Provider;
use crate::domain::{ChangeSet, EntityIdentifier, PersistedUser, UserResource, UserSpec};
use crate::services::{SeaOrmUserService, UserLifecycle};

pub async fn cmd_update(
    config: &Config,
    id_str: &str,
    credential: CredentialArgs,
) -> anyhow::Result<()> {
    let id: EntityIdentifier = id_str.parse()?;
    let store = super::state_store(config);

    let Some(prior) = store.load(&id)? else {
        anyhow::bail!("{id} is not managed; import it first");
    };

    let Some(resource) = plan_update(&id, &prior, credential)? else {
        println!("{id} is up to date.");
        return Ok(());
    };

    let provider = Provider::connect(&config.mysql).await?;
    SeaOrmUserService::new().update(&resource, &provider).await?;

    store.save(&resource.persisted())?;
    println!("✓ Updated {id}");
    Ok(())
}

/// Resource to hand to the update operation, or `None` when the supplied
/// password matches the stored digest.
///
/// Only the supplied credential is compared; an omitted flag never clears a
/// password.
fn plan_update(
    id: &EntityIdentifier,
    prior: &PersistedUser,
    credential: CredentialArgs,
) -> Result<Option<UserResource>> {
    if credential.plaintext_password.is_none() && credential.password.is_none() {
        anyhow::bail!("Nothing to update; pass --plaintext-password or --password");
    }

    if let Some(plugin) = prior.auth_plugin {
        anyhow::bail!("{id} authenticates with {plugin}; it cannot have a password");
    }

    let mut desired = UserSpec::from(prior);
    desired.plaintext_password = credential.plaintext_password;
    desired.legacy_password = credential.password;

    let mut changes = ChangeSet::between(prior, &desired);
    changes.plaintext_password &= desired.plaintext_password.is_some();
    changes.legacy_password &= desired.legacy_password.is_some();

    if changes.is_empty() {
        return Ok(None);
    }

    Ok(Some(UserResource::existing(desired, id.clone()).with_changes(changes)))
}
