use ev_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_code;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ev audit`. Entries come back newest first.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = build_filter(args)?;
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}

fn build_filter(args: &AuditArgs) -> anyhow::Result<AuditFilter> {
    Ok(AuditFilter {
        entity_kind: args
            .kind
            .as_deref()
            .map(|raw| parse_code(raw, "entity kind"))
            .transpose()?,
        entity_id: args.id,
        transaction_kind: args
            .transaction
            .as_deref()
            .map(|raw| parse_code(raw, "transaction"))
            .transpose()?,
        user: args.user.clone(),
        limit: args.limit,
    })
}
