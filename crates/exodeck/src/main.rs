use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use exo_api::query::parse_window_length;
use exo_api::{Mission, Query};
use exodeck::config::BackendOptions;
use exodeck::{commands, tui};

#[derive(Parser)]
#[command(name = "exodeck")]
#[command(
  about = "Exodeck - exoplanet transit dashboard\nLight curves and vetting scores from a model-serving backend"
)]
#[command(version)]
struct Cli {
  #[command(flatten)]
  backend: BackendOptions,

  #[command(subcommand)]
  command: Commands,
}

/// Common target/query arguments
#[derive(Args)]
struct QueryArgs {
  /// Target identifier, e.g. "Kepler-10"
  target: String,
  /// Mission: Kepler, K2 or TESS
  #[arg(short, long, default_value = "Kepler")]
  mission: String,
  /// Pipeline author (TESS only by convention, e.g. SPOC or QLP)
  #[arg(short, long)]
  author: Option<String>,
  /// Detrending window length; clamped to [51, 5001], malformed input
  /// falls back to 401
  #[arg(short, long, default_value = "401")]
  window_length: String,
}

impl QueryArgs {
  fn to_query(&self) -> Result<Query> {
    if self.target.trim().is_empty() {
      bail!("target must not be empty");
    }
    let mission: Mission = match self.mission.parse() {
      Ok(mission) => mission,
      Err(message) => bail!("{message}"),
    };

    let mut query = Query::new(self.target.trim(), mission);
    query.window_length = parse_window_length(&self.window_length);
    if let Some(author) = &self.author {
      query.set_author(author);
    }
    Ok(query)
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Print the backend plot URL for a query (no request issued)
  PlotUrl {
    #[command(flatten)]
    query: QueryArgs,
  },
  /// Download the backend-rendered plot image
  Plot {
    #[command(flatten)]
    query: QueryArgs,
    /// Where to write the image bytes
    #[arg(short, long, default_value = "plot.svg")]
    output: PathBuf,
  },
  /// Fetch the light curve arrays and print a summary
  Lc {
    #[command(flatten)]
    query: QueryArgs,
  },
  /// Score a target against the classifier
  Predict {
    #[command(flatten)]
    query: QueryArgs,
    /// Decision threshold on prob_planet
    #[arg(short, long, default_value_t = 0.5)]
    threshold: f64,
    /// Use the built-in deterministic fixture instead of the backend
    #[arg(long)]
    mock: bool,
  },
  /// Open the interactive dashboard
  Dash {
    #[command(flatten)]
    query: QueryArgs,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // The dashboard owns the terminal; only the plain subcommands log.
  if !matches!(cli.command, Commands::Dash { .. }) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
  }

  match cli.command {
    Commands::PlotUrl { query } => {
      commands::plot_url(&cli.backend, &query.to_query()?)?;
    }
    Commands::Plot { query, output } => {
      commands::fetch_plot(&cli.backend, &query.to_query()?, &output).await?;
    }
    Commands::Lc { query } => {
      commands::light_curve(&cli.backend, &query.to_query()?).await?;
    }
    Commands::Predict { query, threshold, mock } => {
      commands::predict(&cli.backend, &query.to_query()?, threshold, mock).await?;
    }
    Commands::Dash { query } => {
      tui::run(&cli.backend, query.to_query()?).await?;
    }
  }

  Ok(())
}
