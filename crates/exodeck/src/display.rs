//! Colored terminal rendering of light curves and predictions.

use colored::*;
use exo_api::{Decision, LightCurve, PredictionResult};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Width available for text output, defaulting to 80 off a terminal.
fn terminal_width() -> usize {
  let (_, cols) = console::Term::stdout().size();
  if cols == 0 {
    80
  } else {
    cols as usize
  }
}

/// Downsample a series into a block-character sparkline.
pub fn sparkline(values: &[f64], width: usize) -> String {
  if values.is_empty() || width == 0 {
    return String::new();
  }

  let min = values.iter().cloned().fold(f64::MAX, f64::min);
  let max = values.iter().cloned().fold(f64::MIN, f64::max);
  let span = (max - min).max(f64::EPSILON);

  let bucket = (values.len() as f64 / width as f64).max(1.0);
  (0..width.min(values.len()))
    .map(|i| {
      let start = (i as f64 * bucket) as usize;
      let end = (((i + 1) as f64 * bucket) as usize).min(values.len()).max(start + 1);
      let mean = values[start..end].iter().sum::<f64>() / (end - start) as f64;
      let level = ((mean - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
      SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
    })
    .collect()
}

/// Print a summary of a fetched light curve with raw/flat sparklines.
pub fn print_light_curve(target: &str, curve: &LightCurve) {
  let width = terminal_width().clamp(20, 100);

  println!("{} {}", "=== Light curve ===".blue().bold(), target.yellow().bold());
  println!("  points: {}", curve.len());

  if let (Some(first), Some(last)) = (curve.time.first(), curve.time.last()) {
    println!("  span:   {:.2} days", last - first);
  }

  if !curve.flux.is_empty() {
    let (min, max) = min_max(&curve.flux);
    println!("  raw flux  [{min:.5}, {max:.5}]");
    println!("  {}", sparkline(&curve.flux, width - 2).cyan());
  }
  if !curve.flat_flux.is_empty() {
    let (min, max) = min_max(&curve.flat_flux);
    println!("  flat flux [{min:.5}, {max:.5}]");
    println!("  {}", sparkline(&curve.flat_flux, width - 2).green());
  }
}

fn min_max(values: &[f64]) -> (f64, f64) {
  let min = values.iter().cloned().fold(f64::MAX, f64::min);
  let max = values.iter().cloned().fold(f64::MIN, f64::max);
  (min, max)
}

/// Print a prediction panel. The decision label is recomputed from the
/// given threshold; any decision the backend sent along is ignored.
pub fn print_prediction(result: &PredictionResult, threshold: f64) {
  let decision = Decision::from_probability(result.prob_planet, threshold);

  println!(
    "{} {} ({})",
    "=== Prediction ===".blue().bold(),
    result.target.yellow().bold(),
    result.mission
  );

  let bar_width = 30;
  let filled = (result.prob_planet * bar_width as f64).round() as usize;
  let bar: String = "█".repeat(filled.min(bar_width)) + &"░".repeat(bar_width - filled.min(bar_width));
  println!("  prob_planet: {:.3}  {}", result.prob_planet, bar.cyan());

  let label = match decision {
    Decision::PlanetLike => "planet_like".green().bold(),
    Decision::NotPlanetLike => "not_planet_like".red().bold(),
  };
  println!("  decision:    {label}  (threshold {threshold:.2})");

  if !result.top_features.is_empty() {
    println!("  {}", "top features".bold());
    for feature in &result.top_features {
      let impact = if feature.impact >= 0.0 {
        format!("+{:.2}", feature.impact).green()
      } else {
        format!("{:.2}", feature.impact).red()
      };
      match feature.value {
        Some(value) => println!("    {:<16} {:>10.2}  {impact}", feature.name, value),
        None => println!("    {:<16} {:>10}  {impact}", feature.name, "-"),
      }
    }
  }

  if !result.diagnostics.is_empty() {
    println!("  {}", "diagnostics".bold());
    for (name, value) in &result.diagnostics {
      println!("    {name:<16} {value}");
    }
  }

  for note in &result.notes {
    println!("  {}", note.dimmed());
  }
}

/// Print a failure the way the dashboard's error banner would show it:
/// backend text verbatim, nothing structured.
pub fn print_error(message: &str) {
  eprintln!("{} {message}", "✗".red());
}
