use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Create(args) => commands::record::create(&args, ctx, flags).await,
        Commands::Get(args) => commands::record::get(&args, ctx, flags).await,
        Commands::Update(args) => commands::record::update(&args, ctx, flags).await,
        Commands::Status(args) => commands::record::status(&args, ctx, flags).await,
        Commands::Delete(args) => commands::record::delete(&args, ctx, flags).await,
        Commands::Related(args) => commands::record::related(&args, ctx, flags).await,
        Commands::List(args) => commands::list::handle(&args, ctx, flags).await,
        Commands::Link(args) => commands::link::handle_link(&args, ctx, flags).await,
        Commands::Unlink(args) => commands::link::handle_unlink(&args, ctx, flags).await,
        Commands::TopicRef(args) => commands::topics::handle_topic_ref(&args, ctx, flags).await,
        Commands::Topics { action } => commands::topics::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Init => unreachable!("init is pre-dispatched in main"),
    }
}
