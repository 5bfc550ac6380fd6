use crate::cli::CredentialArgs;
use crate::config::Config;
use crate::db::Provider;
use crate::domain::{AuthPlugin, UserResource, UserSpec};
use crate::services::{SeaOrmUserService, UserLifecycle};

pub async fn cmd_create(
    config: &Config,
    user: &str,
    host: &str,
    credential: CredentialArgs,
    auth_plugin: Option<&str>,
) -> anyhow::Result<()> {
    let store = super::state_store(config);

    let mut spec = UserSpec::new(user).with_host(host);
    spec.plaintext_password = credential.plaintext_password;
    spec.legacy_password = credential.password;
    if let Some(plugin) = auth_plugin {
        spec = spec.with_auth_plugin(plugin.parse::<AuthPlugin>()?);
    }

    if store.load(&spec.identifier())?.is_some() {
        anyhow::bail!("{} is already managed; delete it first", spec.identifier());
    }

    let provider = Provider::connect(&config.mysql).await?;
    let mut resource = UserResource::new(spec);
    let id = SeaOrmUserService::new()
        .create(&mut resource, &provider.conn)
        .await?;

    store.save(&resource.persisted())?;
    println!("✓ Created {id}");
    Ok(())
}
