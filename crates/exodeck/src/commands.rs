//! One entry point per CLI subcommand. Thin: build the request, call the
//! client, hand the result to the display layer.

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use exo_api::mock::mock_prediction;
use exo_api::{PredictRequest, Query};

use crate::config::BackendOptions;
use crate::display;

/// Print the derived plot URL. Pure: no request is issued; the consumer of
/// the URL (an image element, `plot --output`) performs the retrieval.
pub fn plot_url(backend: &BackendOptions, query: &Query) -> Result<()> {
  let client = backend.client()?;
  println!("{}", client.plot_url(query));
  Ok(())
}

/// Download the rendered plot image to a file.
pub async fn fetch_plot(backend: &BackendOptions, query: &Query, output: &Path) -> Result<()> {
  let client = backend.client()?;
  let bytes = client.fetch_plot(query).await?;
  std::fs::write(output, &bytes)
    .with_context(|| format!("failed to write {}", output.display()))?;

  println!(
    "{} Saved plot for {} to {} ({} bytes)",
    "✓".green(),
    query.target.yellow(),
    output.display(),
    bytes.len()
  );
  Ok(())
}

/// Fetch the light curve and print a summary.
pub async fn light_curve(backend: &BackendOptions, query: &Query) -> Result<()> {
  let client = backend.client()?;
  match client.fetch_light_curve(query).await {
    Ok(curve) => {
      display::print_light_curve(&query.target, &curve);
      Ok(())
    }
    Err(e) => {
      display::print_error(&e.to_string());
      Err(e.into())
    }
  }
}

/// Score a target, either against the backend or the built-in fixture.
pub async fn predict(
  backend: &BackendOptions,
  query: &Query,
  threshold: f64,
  mock: bool,
) -> Result<()> {
  let result = if mock {
    mock_prediction(&query.target, query.mission)
  } else {
    let client = backend.client()?;
    let request = PredictRequest::from_query(query, Some(threshold));
    match client.predict(&request).await {
      Ok(result) => result,
      Err(e) => {
        display::print_error(&e.to_string());
        return Err(e.into());
      }
    }
  };

  display::print_prediction(&result, threshold);
  Ok(())
}
