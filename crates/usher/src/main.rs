use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use usher::cli::commands;
use usher::config::UsherConfig;

#[derive(Parser)]
#[command(name = "usher")]
#[command(
  about = "Usher - Event Recommendation Engine\nVector-similarity event matching with language-model phrasing"
)]
#[command(version)]
struct Cli {
  /// Path to a configuration file (defaults to .usher.json / usher.json)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Recommend events matching a free-text description of interests
  Recommend {
    /// Interest description (joined with spaces)
    #[arg(required = true)]
    preferences: Vec<String>,
    /// Number of recommendations to return
    #[arg(short, long)]
    count: Option<usize>,
  },
  /// Show the expanded query for an interest description
  Expand {
    /// Interest description (joined with spaces)
    #[arg(required = true)]
    input: Vec<String>,
  },
  /// Start the REST server
  Serve {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
  },
}

async fn handle(config: &UsherConfig, command: Command) -> Result<()> {
  match command {
    Command::Recommend { preferences, count } => {
      commands::recommend(config, &preferences.join(" "), count).await
    }
    Command::Expand { input } => commands::expand(config, &input.join(" ")).await,
    Command::Serve { port } => commands::serve(config, port).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let config = match &cli.config {
    Some(path) => UsherConfig::load_from_file(path)?,
    None => UsherConfig::load()?,
  };

  handle(&config, cli.command).await?;
  Ok(())
}
