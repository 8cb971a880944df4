mod api;
mod app;
mod config;
mod event;
mod filter;
mod logging;
mod store;
mod sync;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cultivos")]
#[command(about = "Terminal UI for managing garden crops through the cultivos REST API")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./cultivos.yaml or $XDG_CONFIG_HOME/cultivos/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Crop collection URL, e.g. http://127.0.0.1:5000/api/v1/cultivos
  #[arg(short, long)]
  url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration, command line wins over file and environment
  let config = config::Config::load(args.config.as_deref())?.with_api_url(args.url);

  let _log_guard = logging::init(&config.log)?;
  tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting cultivos");

  // Initialize and run the app
  let mut app = app::App::new(&config)?;
  app.run().await?;

  Ok(())
}
