use clap::{Args, Subcommand};

/// Top-level command tree.
///
/// Kinds and statuses are given by wire code (`CLA`, `LNK`, `PUB`, ...),
/// case-insensitively.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the store and apply migrations.
    Init,
    /// Create a record from a JSON payload.
    Create(CreateArgs),
    /// Read a record or link with its audit log.
    Get(TargetArgs),
    /// Replace a record payload, or the locations of a link or topic reference.
    Update(UpdateArgs),
    /// Move a record or link to another status.
    Status(StatusArgs),
    /// Delete a record, link or topic reference.
    Delete(TargetArgs),
    /// Filter, sort and page records, links or topic references.
    List(ListArgs),
    /// Link two entities.
    Link(LinkArgs),
    /// Delete a link.
    Unlink(UnlinkArgs),
    /// Attach an entity to a topic.
    TopicRef(TopicRefArgs),
    /// Topic hierarchy lookups.
    Topics {
        #[command(subcommand)]
        action: TopicCommands,
    },
    /// Entities one active link away from a record.
    Related(TargetArgs),
    /// Search the audit log.
    Audit(AuditArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CreateArgs {
    /// Record kind code.
    pub kind: String,
    /// JSON object with the record fields, or `-` to read stdin.
    pub payload: String,
}

#[derive(Clone, Debug, Args)]
pub struct TargetArgs {
    /// Entity kind code.
    pub kind: String,
    pub id: i64,
}

#[derive(Clone, Debug, Args)]
pub struct UpdateArgs {
    /// Entity kind code.
    pub kind: String,
    pub id: i64,
    /// JSON object, or `-` to read stdin.
    pub payload: String,
}

#[derive(Clone, Debug, Args)]
pub struct StatusArgs {
    /// Entity kind code.
    pub kind: String,
    pub id: i64,
    /// Target status code.
    pub status: String,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Entity kind code; `LNK` lists links and `TRF` topic references.
    pub kind: String,
    /// Status codes to include (default: every status except DEL).
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<String>,
    /// Substring matched against the record's text fields.
    #[arg(long)]
    pub text: Option<String>,
    #[arg(long)]
    pub topic: Option<i64>,
    /// Include entities attached to descendant topics.
    #[arg(long)]
    pub recursive: bool,
    #[arg(long)]
    pub master_kind: Option<String>,
    #[arg(long)]
    pub master_id: Option<i64>,
    #[arg(long)]
    pub from_kind: Option<String>,
    #[arg(long)]
    pub from_id: Option<i64>,
    #[arg(long)]
    pub to_kind: Option<String>,
    #[arg(long)]
    pub to_id: Option<i64>,
    /// Order key `property[:desc][:ci][:nulls-first|:nulls-last]`; repeatable.
    #[arg(long)]
    pub sort: Vec<String>,
    #[arg(long)]
    pub page: Option<i64>,
    /// Page size; 0 returns everything. Defaults to `query.default_page_size`.
    #[arg(long)]
    pub size: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct LinkArgs {
    pub from_kind: Option<String>,
    pub from_id: Option<i64>,
    pub to_kind: Option<String>,
    pub to_id: Option<i64>,
    #[arg(long)]
    pub from_locations: Option<String>,
    #[arg(long)]
    pub to_locations: Option<String>,
    /// JSON array of links created together, or `-` to read stdin.
    #[arg(long, conflicts_with_all = ["from_kind", "from_locations", "to_locations"])]
    pub batch: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct UnlinkArgs {
    /// Link id.
    pub id: i64,
}

#[derive(Clone, Debug, Args)]
pub struct TopicRefArgs {
    pub topic_id: i64,
    /// Entity kind code.
    pub kind: String,
    pub id: i64,
    #[arg(long)]
    pub locations: Option<String>,
}

/// Topic hierarchy commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TopicCommands {
    /// Direct children of a topic.
    Children { id: i64 },
    /// Every topic below a topic.
    Descendants { id: i64 },
    /// Entities attached to a topic by reference or link.
    Linked {
        id: i64,
        #[arg(long)]
        recursive: bool,
    },
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long)]
    pub id: Option<i64>,
    /// Transaction code: CRE, UPD or DEL.
    #[arg(long)]
    pub transaction: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(short, long)]
    pub limit: Option<u32>,
}
