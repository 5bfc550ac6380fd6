use crate::config::Config;
use crate::db::Provider;
use crate::domain::{EntityIdentifier, UserResource};
use crate::services::{SeaOrmUserService, UserLifecycle};

pub async fn cmd_delete(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let id: EntityIdentifier = id_str.parse()?;
    let store = super::state_store(config);
    let (spec, _) = super::known_spec(&store, &id)?;

    let provider = Provider::connect(&config.mysql).await?;
    let mut resource = UserResource::existing(spec, id.clone());
    SeaOrmUserService::new()
        .delete(&mut resource, &provider.conn)
        .await?;

    store.remove(&id)?;
    println!("✓ Dropped {id}");
    Ok(())
}
