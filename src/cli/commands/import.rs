use anyhow::Result;

use crate::config::Config;
use crate::db::Provider;
use crate::domain::{EntityIdentifier, UserResource, UserSpec};
use crate::services::{SeaOrmUserService, UserLifecycle};
use crate::state::StateStore;

pub async fn cmd_import(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let store = super::state_store(config);
    let service = SeaOrmUserService::new();

    let mut resource = service.import(id_str, UserResource::new(UserSpec::new("")))?;

    let provider = Provider::connect(&config.mysql).await?;
    service.read(&mut resource, &provider.conn).await?;

    let id = record_import(&store, id_str, &resource)?;
    println!("✓ Imported {id}");
    println!("Set a password with 'update {id} --plaintext-password ...' to manage it.");
    Ok(())
}

/// Saves an imported resource once the read confirmed it exists.
fn record_import(
    store: &StateStore,
    id_str: &str,
    resource: &UserResource,
) -> Result<EntityIdentifier> {
    let Some(id) = resource.id().cloned() else {
        anyhow::bail!("Cannot import {id_str}: no such user on the server");
    };

    store.save(&resource.persisted())?;
    Ok(id)
}
