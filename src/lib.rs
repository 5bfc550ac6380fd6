pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod services;
pub mod state;

use cli::{Cli, Commands};
use anyhow::Context;
pub use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Loads configuration, honouring an explicit `--config` path.
pub fn load_config(args: &Cli) -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let config = Config::load(args.config.as_deref())?;
    config.validate()?;
    Ok(config)
}

pub async fn run(args: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let result = match args.command {
        Commands::Create {
            user,
            host,
            credential,
            auth_plugin,
        } => cli::cmd_create(&config, &user, &host, credential, auth_plugin.as_deref()).await,

        Commands::Read { id } => cli::cmd_read(&config, &id).await,

        Commands::Update { id, credential } => cli::cmd_update(&config, &id, credential).await,

        Commands::Delete { id } => cli::cmd_delete(&config, &id).await,

        Commands::Import { id } => cli::cmd_import(&config, &id).await,

        Commands::ShowConfig => cli::cmd_show_config(&config),
    };

    if let Some(handle) = prometheus_handle {
        eprint!("{}", handle.render());
    }

    result
}
