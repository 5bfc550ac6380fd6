mod config;
mod create;
mod delete;
mod import;
mod read;
mod update;

pub use config::cmd_show_config;
pub use create::cmd_create;
pub use delete::cmd_delete;
pub use import::cmd_import;
pub use read::cmd_read;
pub use update::cmd_update;

use anyhow::Result;

use crate::config::Config;
use crate::domain::{EntityIdentifier, PersistedUser, UserSpec};
use crate::state::StateStore;

fn state_store(config: &Config) -> StateStore {
    StateStore::new(&config.general.state_dir)
}

/// Spec from stored state, or from the identifier alone when nothing is stored.
fn known_spec(
    store: &StateStore,
    id: &EntityIdentifier,
) -> Result<(UserSpec, Option<PersistedUser>)> {
    let prior = store.load(id)?;
    let spec = prior.as_ref().map_or_else(
        || UserSpec::new(id.name()).with_host(id.host()),
        UserSpec::from,
    );
    Ok((spec, prior))
}
