use anyhow::Result;

use crate::config::Config;
use crate::db::Provider;
use crate::domain::{EntityIdentifier, UserResource};
use crate::services::{SeaOrmUserService, UserLifecycle};
use crate::state::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadOutcome {
    Exists,
    /// Gone from the server; its state file was removed.
    Removed,
    Absent,
}

pub async fn cmd_read(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let id: EntityIdentifier = id_str.parse()?;
    let store = super::state_store(config);
    let (spec, prior) = super::known_spec(&store, &id)?;

    let provider = Provider::connect(&config.mysql).await?;
    let mut resource = UserResource::existing(spec, id.clone());
    SeaOrmUserService::new()
        .read(&mut resource, &provider.conn)
        .await?;

    match record_read(&store, &id, &resource, prior.is_some())? {
        ReadOutcome::Exists => println!("✓ {id} exists"),
        ReadOutcome::Removed => println!("{id} no longer exists; removed from state."),
        ReadOutcome::Absent => println!("{id} does not exist."),
    }

    Ok(())
}

/// Drops the state file of an account the read found missing.
fn record_read(
    store: &StateStore,
    id: &EntityIdentifier,
    resource: &UserResource,
    was_managed: bool,
) -> Result<ReadOutcome> {
    if resource.id().is_some() {
        Ok(ReadOutcome::Exists)
    } else if was_managed {
        store.remove(id)?;
        Ok(ReadOutcome::Removed)
    } else {
        Ok(ReadOutcome::Absent)
    }
}
