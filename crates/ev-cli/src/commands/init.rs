use serde_json::json;

use ev_config::EvConfig;
use ev_db::service::EvService;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `ev init`: create the database (and its directory) and apply migrations.
pub async fn handle(config: &EvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = EvService::open(config).await?;
    tracing::info!(path = %config.database.path, "evidence store ready");

    output(
        &json!({
            "database": config.database.path,
            "user": service.identity().map(|identity| identity.user_id.as_str()),
        }),
        flags.format,
    )
}
