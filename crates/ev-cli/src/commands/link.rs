use anyhow::{Context, bail};

use ev_core::entities::NewLink;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{LinkArgs, UnlinkArgs};
use crate::commands::shared::parse::parse_code;
use crate::commands::shared::payload::read_json;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ev link`, either one link from positionals or an all-or-nothing batch.
pub async fn handle_link(args: &LinkArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(batch) = &args.batch {
        let links: Vec<NewLink> = serde_json::from_value(read_json(batch)?)
            .context("batch must be a JSON array of links")?;
        let created = ctx.service.create_links(links).await?;
        return output(&created, flags.format);
    }

    let link = new_link(args)?;
    output(&ctx.service.create_link(link).await?, flags.format)
}

/// Handle `ev unlink`.
pub async fn handle_unlink(args: &UnlinkArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.delete_link(args.id).await?, flags.format)
}

fn new_link(args: &LinkArgs) -> anyhow::Result<NewLink> {
    let (Some(from_kind), Some(from_id), Some(to_kind), Some(to_id)) = (
        args.from_kind.as_deref(),
        args.from_id,
        args.to_kind.as_deref(),
        args.to_id,
    ) else {
        bail!("link needs FROM_KIND FROM_ID TO_KIND TO_ID, or --batch");
    };

    Ok(NewLink {
        from_entity_locations: args.from_locations.clone(),
        to_entity_locations: args.to_locations.clone(),
        ..NewLink::new(
            parse_code(from_kind, "from kind")?,
            from_id,
            parse_code(to_kind, "to kind")?,
            to_id,
        )
    })
}
