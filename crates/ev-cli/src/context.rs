use std::path::Path;

use ev_config::EvConfig;
use ev_db::service::EvService;

/// Loaded configuration plus the service every handler talks to.
pub struct AppContext {
    pub config: EvConfig,
    pub service: EvService,
}

impl AppContext {
    pub async fn init(config: EvConfig) -> anyhow::Result<Self> {
        let service = EvService::open(&config).await?;
        if service.identity().is_none() {
            tracing::debug!("no identity configured; mutations will be rejected");
        }
        Ok(Self { config, service })
    }
}

/// Refuse to implicitly create a store outside `ev init`.
pub fn require_store(config: &EvConfig) -> anyhow::Result<()> {
    if config.database.is_in_memory() || Path::new(&config.database.path).exists() {
        return Ok(());
    }
    anyhow::bail!(
        "no evidence store at '{}'. Run 'ev init' first.",
        config.database.path
    )
}
