//! Wirepad - Main Entry Point

use clap::Parser;
use wirepad::Cli;
use wirepad_infrastructure::{InspectorLayer, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let inspector = cli.inspect.then(InspectorLayer::default);
    init_logging(cli.verbose, inspector.clone())?;

    let result = cli.run().await;

    if let Some(inspector) = inspector {
        eprintln!("--- log inspector ---");
        for entry in inspector.snapshot() {
            eprintln!("{entry}");
        }
    }

    result
}
