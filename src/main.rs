use bball_manager::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Seed => cli::seed::run().await,
        Command::Token(args) => cli::token::run(args).await,
    }
}
