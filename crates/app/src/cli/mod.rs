//! Command line interface.

mod config;
mod edit;
mod import;
mod send;

use std::path::PathBuf;

use clap::ArgAction;
use wirepad_infrastructure::{SettingsRepository, TokioFileSystem, WrpProjectStore};

pub use config::Config;
pub use edit::{AddRequest, AddSection, Duplicate, New, Remove, Tree};
pub use import::{Export, Import};
pub use send::SendRequest;

type Store = WrpProjectStore<TokioFileSystem>;

fn store() -> Store {
    WrpProjectStore::new(TokioFileSystem::new())
}

/// Compose, organise and send HTTP requests stored in `.wrp` projects
#[derive(Debug, clap::Parser)]
#[command(name = "wirepad", version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the captured log events after the command finishes
    #[arg(long, global = true)]
    pub inspect: bool,

    /// Settings file to use instead of the per-user one
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error when the subcommand fails; `send` also fails when the
    /// request does not complete.
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = self
            .settings
            .map_or_else(SettingsRepository::new, SettingsRepository::at);
        self.command.run(&settings).await
    }
}

/// Top-level subcommands
#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Create an empty project file
    New(New),

    /// Show the sections and requests of a project
    Tree(Tree),

    /// Import a Postman collection or environment
    Import(Import),

    /// Export a project as a Postman v2.1 collection
    Export(Export),

    /// Send one request from a project
    Send(SendRequest),

    /// Show or change HTTP client settings
    #[command(subcommand)]
    Config(Config),

    /// Add a section to a project
    AddSection(AddSection),

    /// Add a request to a section
    AddRequest(AddRequest),

    /// Duplicate a section or request next to the original
    Duplicate(Duplicate),

    /// Remove a section or request
    Remove(Remove),
}

impl Command {
    async fn run(self, settings: &SettingsRepository) -> anyhow::Result<()> {
        match self {
            Self::New(command) => command.run().await,
            Self::Tree(command) => command.run().await,
            Self::Import(command) => command.run().await,
            Self::Export(command) => command.run().await,
            Self::Send(command) => command.run(settings).await,
            Self::Config(command) => command.run(settings).await,
            Self::AddSection(command) => command.run().await,
            Self::AddRequest(command) => command.run().await,
            Self::Duplicate(command) => command.run().await,
            Self::Remove(command) => command.run().await,
        }
    }
}
