use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use tapready::application::engine::ReadinessEngine;
use tapready::domain::ports::{SettingsStore, StoreGateway};
use tapready::interfaces::json::site_fixture::SiteFixture;

/// Resolves the in-person payments readiness of a site described by a JSON
/// fixture and prints the resulting state.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Site fixture JSON file
    input: PathBuf,

    /// Pretty-print the resulting state
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file = File::open(cli.input).into_diagnostic()?;
    let fixture = SiteFixture::from_reader(file).into_diagnostic()?;
    let site_id = fixture.site_id;
    let (gateway, settings) = fixture.into_collaborators().await;

    let gateway: Arc<dyn StoreGateway> = Arc::new(gateway);
    let settings: Arc<dyn SettingsStore> = Arc::new(settings);
    let engine = ReadinessEngine::new(site_id, gateway, settings);

    engine.refresh().await;

    let state = engine.current();
    let output = if cli.pretty {
        serde_json::to_string_pretty(&state).into_diagnostic()?
    } else {
        serde_json::to_string(&state).into_diagnostic()?
    };
    println!("{output}");

    Ok(())
}
