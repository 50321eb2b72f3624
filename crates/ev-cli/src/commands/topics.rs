use ev_core::entities::NewTopicRef;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{TopicCommands, TopicRefArgs};
use crate::commands::shared::parse::parse_code;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ev topics`.
pub async fn handle(action: &TopicCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TopicCommands::Children { id } => {
            output(&ctx.service.topic_children(*id).await?, flags.format)
        }
        TopicCommands::Descendants { id } => {
            output(&ctx.service.descendants_of(*id).await?, flags.format)
        }
        TopicCommands::Linked { id, recursive } => output(
            &ctx.service.entities_linked_to_topic(*id, *recursive).await?,
            flags.format,
        ),
    }
}

/// Handle `ev topic-ref`.
pub async fn handle_topic_ref(
    args: &TopicRefArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let topic_ref = ctx
        .service
        .create_topic_ref(NewTopicRef {
            topic_id: args.topic_id,
            entity_kind: parse_code(&args.kind, "entity kind")?,
            entity_id: args.id,
            locations: args.locations.clone(),
        })
        .await?;
    output(&topic_ref, flags.format)
}
