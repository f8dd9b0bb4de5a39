pub mod migrate;
pub mod serve;

use crate::args::CommonArgs;
use crate::command::migrate::MigrateArgs;
use crate::command::serve::ServeArgs;
use clap::Subcommand;
use tracing::instrument;

#[derive(Subcommand)]
pub enum Command {
    /// Connects to Discord and serves commands
    #[command(name = "serve")]
    Serve(ServeArgs),
    /// Applies the database migrations
    #[command(name = "migrate")]
    Migrate(MigrateArgs),
}

impl Command {
    #[instrument(level = "trace", skip(self, common_args))]
    pub async fn run(self, common_args: CommonArgs) -> anyhow::Result<()> {
        match self {
            Command::Serve(args) => serve::run(common_args, args).await,
            Command::Migrate(args) => migrate::run(common_args, args).await,
        }
    }
}
