//! Synthetic light curves for the mock backend.
//!
//! A toy stand-in for the real pipeline: baseline flux with a slow
//! sinusoidal trend and Gaussian jitter, plus Gaussian-kernel transit dips
//! injected at a fixed period. Seeded, so every request for the same
//! parameters serves identical data.

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Knobs of the synthetic transit generator.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitParams {
  /// Orbital period in days.
  pub period: f64,
  /// Transit depth as a flux fraction (1500 ppm = 0.0015).
  pub depth: f64,
  /// Transit duration in days.
  pub duration: f64,
  /// Total time span in days.
  pub tspan: f64,
  /// Sampling cadence in days (~30 min).
  pub cadence: f64,
  /// White-noise amplitude.
  pub jitter: f64,
  /// Amplitude of the slow sinusoidal trend.
  pub trend_amp: f64,
  pub seed: u64,
}

impl Default for TransitParams {
  fn default() -> Self {
    Self {
      period: 3.0,
      depth: 0.0015,
      duration: 0.15,
      tspan: 27.0,
      cadence: 0.02,
      jitter: 0.0008,
      trend_amp: 0.0015,
      seed: 42,
    }
  }
}

/// Generate (time, flux) with periodic transits, noise and a slow trend.
pub fn synthetic_transit(params: &TransitParams) -> (Vec<f64>, Vec<f64>) {
  let n = (params.tspan / params.cadence) as usize;
  let mut rng = StdRng::seed_from_u64(params.seed);

  let time: Vec<f64> = (0..n).map(|i| i as f64 * params.cadence).collect();
  let mut flux: Vec<f64> = time
    .iter()
    .map(|&t| {
      let trend = params.trend_amp * (TAU * t / (params.tspan / 2.0)).sin();
      1.0 + trend + params.jitter * gaussian(&mut rng)
    })
    .collect();

  // Gaussian-kernel dips every `period` days, phase-offset into the span.
  let transits = (params.tspan / params.period) as usize + 2;
  let width = params.duration / 5.0;
  for k in 0..transits {
    let tc = k as f64 * params.period + params.period * 0.3;
    for (f, &t) in flux.iter_mut().zip(&time) {
      let z = (t - tc) / width;
      *f -= params.depth * (-0.5 * z * z).exp();
    }
  }

  (time, flux)
}

/// Moving-average detrend, normalized around 1.0.
///
/// The window is forced odd and clamped to the series length; edges are
/// padded by extension so the output has the same length as the input.
pub fn flatten(flux: &[f64], window_length: u32) -> Vec<f64> {
  let n = flux.len();
  if n == 0 {
    return Vec::new();
  }

  let mut wl = window_length as usize;
  if wl % 2 == 0 {
    wl += 1;
  }
  let largest_odd = if n % 2 == 0 { n.saturating_sub(1) } else { n };
  wl = wl.clamp(3, largest_odd.max(3));
  let pad = wl / 2;

  // Edge-extended prefix sums make each window mean O(1).
  let mut padded = Vec::with_capacity(n + 2 * pad);
  padded.extend(std::iter::repeat(flux[0]).take(pad));
  padded.extend_from_slice(flux);
  padded.extend(std::iter::repeat(flux[n - 1]).take(pad));

  let mut prefix = Vec::with_capacity(padded.len() + 1);
  prefix.push(0.0);
  for &value in &padded {
    prefix.push(prefix.last().copied().unwrap_or(0.0) + value);
  }

  (0..n)
    .map(|i| {
      let mean = (prefix[i + wl] - prefix[i]) / wl as f64;
      flux[i] / mean
    })
    .collect()
}

/// Standard normal draw via Box–Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
  let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
  let u2: f64 = rng.random();
  (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generator_is_deterministic_for_a_seed() {
    let params = TransitParams::default();
    let (time_a, flux_a) = synthetic_transit(&params);
    let (time_b, flux_b) = synthetic_transit(&params);
    assert_eq!(time_a, time_b);
    assert_eq!(flux_a, flux_b);
    assert_eq!(time_a.len(), 1350);
  }

  #[test]
  fn different_seeds_differ() {
    let (_, flux_a) = synthetic_transit(&TransitParams::default());
    let (_, flux_b) = synthetic_transit(&TransitParams { seed: 7, ..Default::default() });
    assert_ne!(flux_a, flux_b);
  }

  #[test]
  fn transits_dip_below_baseline() {
    let params = TransitParams { jitter: 0.0, ..Default::default() };
    let (_, flux) = synthetic_transit(&params);
    let min = flux.iter().cloned().fold(f64::MAX, f64::min);
    assert!(min < 1.0 - params.depth / 2.0);
  }

  #[test]
  fn flatten_centers_around_unity() {
    let (_, flux) = synthetic_transit(&TransitParams::default());
    let flat = flatten(&flux, 401);
    assert_eq!(flat.len(), flux.len());
    let mean = flat.iter().sum::<f64>() / flat.len() as f64;
    assert!((mean - 1.0).abs() < 0.01, "mean was {mean}");
  }

  #[test]
  fn flatten_clamps_oversized_windows() {
    let flux = vec![1.0; 10];
    let flat = flatten(&flux, 5001);
    assert_eq!(flat.len(), 10);
    assert!(flat.iter().all(|f| (f - 1.0).abs() < 1e-12));
  }

  #[test]
  fn flatten_handles_empty_input() {
    assert!(flatten(&[], 401).is_empty());
  }
}
