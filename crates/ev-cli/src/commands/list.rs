use ev_core::enums::{EntityKind, StatusKind};
use ev_core::query::{FilterSpec, SortSpec};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::page::page_spec;
use crate::commands::shared::parse::{parse_code, parse_order};
use crate::context::AppContext;
use crate::output::output;

/// Handle `ev list`.
///
/// Filter combinations are passed through as given; the service rejects
/// dimensions that do not apply to the listed kind.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind: EntityKind = parse_code(&args.kind, "entity kind")?;
    let filter = build_filter(args)?;
    let sort = build_sort(&args.sort)?;
    let page = page_spec(args.page, args.size, ctx.config.query.default_page_size)?;

    match kind {
        EntityKind::EntityLink => {
            output(&ctx.service.list_links(&filter, &sort, page).await?, flags.format)
        }
        EntityKind::TopicRef => {
            output(&ctx.service.list_topic_refs(&filter, &sort, page).await?, flags.format)
        }
        kind => output(&ctx.service.query(kind, &filter, &sort, page).await?, flags.format),
    }
}

fn build_filter(args: &ListArgs) -> anyhow::Result<FilterSpec> {
    let mut filter = FilterSpec::default();
    if !args.status.is_empty() {
        let statuses = args
            .status
            .iter()
            .map(|raw| parse_code::<StatusKind>(raw, "status"))
            .collect::<anyhow::Result<Vec<_>>>()?;
        filter = filter.with_status(statuses);
    }
    if let Some(text) = &args.text {
        filter = filter.with_text(text.clone());
    }
    filter.topic_id = args.topic;
    if args.recursive {
        filter.recursive = Some(true);
    }
    filter.master_entity_kind = optional_kind(args.master_kind.as_deref(), "master kind")?;
    filter.master_entity_id = args.master_id;
    filter.from_entity_kind = optional_kind(args.from_kind.as_deref(), "from kind")?;
    filter.from_entity_id = args.from_id;
    filter.to_entity_kind = optional_kind(args.to_kind.as_deref(), "to kind")?;
    filter.to_entity_id = args.to_id;
    Ok(filter)
}

fn optional_kind(raw: Option<&str>, field: &str) -> anyhow::Result<Option<EntityKind>> {
    raw.map(|raw| parse_code(raw, field)).transpose()
}

fn build_sort(raw: &[String]) -> anyhow::Result<SortSpec> {
    let orders = raw
        .iter()
        .map(|order| parse_order(order))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(SortSpec::by(orders))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ev_core::enums::{Direction, EntityKind, StatusKind};
    use pretty_assertions::assert_eq;

    use super::{build_filter, build_sort};
    use crate::cli::root_commands::ListArgs;
    use crate::cli::{Cli, Commands};

    fn list_args(argv: &[&str]) -> ListArgs {
        let cli = Cli::try_parse_from(argv).expect("cli should parse");
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        args
    }

    #[test]
    fn maps_every_flag_onto_the_filter() {
        let args = list_args(&[
            "ev", "list", "CLA", "--status", "dra,sus", "--text", "ice", "--topic", "4",
            "--recursive", "--master-kind", "pub", "--master-id", "9",
        ]);
        let filter = build_filter(&args).expect("filter should build");

        assert_eq!(
            filter.status,
            Some(vec![StatusKind::Draft, StatusKind::Suspended])
        );
        assert_eq!(filter.text.as_deref(), Some("ice"));
        assert_eq!(filter.topic_id, Some(4));
        assert!(filter.is_recursive());
        assert_eq!(filter.master(), Some((EntityKind::Publication, 9)));
        assert_eq!(filter.from_entity_kind, None);
    }

    #[test]
    fn omitted_flags_leave_the_default_filter() {
        let args = list_args(&["ev", "list", "LNK"]);
        let filter = build_filter(&args).expect("filter should build");
        assert_eq!(filter.status, None);
        assert_eq!(filter.recursive, None);
        assert!(build_sort(&args.sort).expect("sort").orders.is_empty());
    }

    #[test]
    fn unknown_status_code_is_reported() {
        let args = list_args(&["ev", "list", "CLA", "--status", "DRA,ARCHIVED"]);
        let err = build_filter(&args).expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'ARCHIVED'"));
    }

    #[test]
    fn sort_keys_keep_their_order() {
        let sort = build_sort(&["last_name:ci".to_string(), "id:desc".to_string()])
            .expect("sort should build");
        assert_eq!(sort.orders.len(), 2);
        assert_eq!(sort.orders[0].property, "last_name");
        assert_eq!(sort.orders[1].direction, Some(Direction::Desc));
    }
}
