use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use platey_bot::{
    DispatchSettings, Dispatcher, MenuSurface, NoopDelivery, NoopUpdateTransport, Outbox,
    PollRunner, ReconnectPolicy,
};
use platey_core::config::{AppConfig, ConfigError, LoadOptions};
use platey_core::SessionStore;
use platey_source::SourceRegistry;

pub struct Application {
    pub config: AppConfig,
    pub runner: PollRunner<SourceRegistry, NoopDelivery>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!("starting application bootstrap");
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config))
}

/// Wires registry → dispatcher → runner from an already-validated
/// config. The transport and delivery are noop stand-ins until a
/// concrete chat transport is plugged into the capability seams.
pub fn bootstrap_with_config(config: AppConfig) -> Application {
    let registry = SourceRegistry::from_bindings(&config.catalogs);
    info!(catalogs = registry.len(), "catalog sources registered");

    let dispatcher = Dispatcher::new(
        DispatchSettings::from_config(&config),
        MenuSurface::from_bindings(&config.catalogs),
        SessionStore::new(config.search.page_size_default),
        registry,
        Outbox::new(NoopDelivery, config.search.message_limit_chars),
    );

    let runner =
        PollRunner::new(Arc::new(NoopUpdateTransport), dispatcher, ReconnectPolicy::default());

    Application { config, runner }
}
