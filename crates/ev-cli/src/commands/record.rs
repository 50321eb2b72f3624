//! Single-entity commands: create, get, update, status, delete, related.
//!
//! `LNK` and `TRF` targets are routed to the link and topic-reference
//! operations so one command covers every tracked kind.

use anyhow::{Context, bail};

use ev_core::enums::{EntityKind, StatusKind};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{CreateArgs, StatusArgs, TargetArgs, UpdateArgs};
use crate::commands::shared::parse::parse_code;
use crate::commands::shared::payload::{
    LinkLocations, TopicRefLocations, read_json, record_payload,
};
use crate::context::AppContext;
use crate::output::output;

fn kind_of(raw: &str) -> anyhow::Result<EntityKind> {
    parse_code(raw, "entity kind")
}

/// Handle `ev create`.
pub async fn create(args: &CreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = kind_of(&args.kind)?;
    if !kind.is_record() {
        bail!("use 'ev link' or 'ev topic-ref' to create a {}", kind.label());
    }
    let data = record_payload(kind, read_json(&args.payload)?)?;
    let entity = ctx.service.create_entity(data).await?;
    output(&entity, flags.format)
}

/// Handle `ev get`.
pub async fn get(args: &TargetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match kind_of(&args.kind)? {
        EntityKind::EntityLink => output(&ctx.service.get_link(args.id).await?, flags.format),
        kind => output(&ctx.service.get_entity(kind, args.id).await?, flags.format),
    }
}

/// Handle `ev update`.
pub async fn update(args: &UpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = kind_of(&args.kind)?;
    let value = read_json(&args.payload)?;
    match kind {
        EntityKind::EntityLink => {
            let locations: LinkLocations =
                serde_json::from_value(value).context("invalid link locations")?;
            let link = ctx
                .service
                .update_link(
                    args.id,
                    locations.from_entity_locations,
                    locations.to_entity_locations,
                )
                .await?;
            output(&link, flags.format)
        }
        EntityKind::TopicRef => {
            let locations: TopicRefLocations =
                serde_json::from_value(value).context("invalid topic reference locations")?;
            let topic_ref = ctx
                .service
                .update_topic_ref(args.id, locations.locations)
                .await?;
            output(&topic_ref, flags.format)
        }
        kind => {
            let data = record_payload(kind, value)?;
            output(&ctx.service.update_entity(args.id, data).await?, flags.format)
        }
    }
}

/// Handle `ev status`.
pub async fn status(args: &StatusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status: StatusKind = parse_code(&args.status, "status")?;
    match kind_of(&args.kind)? {
        EntityKind::EntityLink => {
            output(&ctx.service.set_link_status(args.id, status).await?, flags.format)
        }
        EntityKind::TopicRef => bail!("topic references carry no status; use 'ev delete TRF'"),
        kind => output(&ctx.service.set_status(kind, args.id, status).await?, flags.format),
    }
}

/// Handle `ev delete`.
pub async fn delete(args: &TargetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match kind_of(&args.kind)? {
        EntityKind::EntityLink => output(&ctx.service.delete_link(args.id).await?, flags.format),
        EntityKind::TopicRef => {
            output(&ctx.service.delete_topic_ref(args.id).await?, flags.format)
        }
        kind => output(&ctx.service.delete_entity(kind, args.id).await?, flags.format),
    }
}

/// Handle `ev related`.
pub async fn related(args: &TargetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = kind_of(&args.kind)?;
    let refs = ctx.service.entities_linked_to_master(kind, args.id).await?;
    output(&refs, flags.format)
}
