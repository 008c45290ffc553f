//! Mock backend daemon.
//!
//! Serves the dashboard contract (plot, light-curve, predict) against
//! synthetic data so the UI can be developed without the real
//! model-serving service.

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "exo-mockd")]
#[command(about = "Mock exoplanet backend serving synthetic light curves")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, env = "EXO_MOCKD_BIND", default_value = "127.0.0.1:8000")]
  bind: SocketAddr,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("debug,hyper=info")
  } else {
    EnvFilter::new("exo_api=info,tower_http=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("starting exo-mockd v{}", env!("CARGO_PKG_VERSION"));
  exo_api::server::run(args.bind).await?;

  Ok(())
}
