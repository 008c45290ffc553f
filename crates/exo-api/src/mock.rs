//! Client-side prediction fixture.
//!
//! Mock mode exists so the predict panel can be developed and demoed before
//! the scoring endpoint is reachable. The fixture is fixed and fully
//! deterministic: two calls with the same target and mission produce
//! byte-identical results.

use std::collections::BTreeMap;

use serde_json::json;

use crate::query::Mission;
use crate::types::{Decision, PredictionResult, TopFeature};

/// Probability reported by the fixture.
pub const MOCK_PROB_PLANET: f64 = 0.84;

/// Threshold baked into the fixture payload (the live label is still
/// recomputed against the client-held threshold).
pub const MOCK_THRESHOLD: f64 = 0.5;

/// Build the canonical mock prediction for a target. No network involved.
pub fn mock_prediction(target: &str, mission: Mission) -> PredictionResult {
  let mut diagnostics = BTreeMap::new();
  diagnostics.insert("snr".to_string(), json!(18.3));
  diagnostics.insert("cdpp_ppm".to_string(), json!(65));
  diagnostics.insert("odd_even_diff".to_string(), json!(0.01));
  diagnostics.insert("secondary_snr".to_string(), json!(0.2));
  diagnostics.insert("centroid_sigma".to_string(), json!(0.7));

  let top_features = vec![
    TopFeature { name: "depth_ppm".into(), value: Some(520.0), impact: 0.23 },
    TopFeature { name: "duration_hr".into(), value: Some(3.1), impact: 0.17 },
    TopFeature { name: "secondary_snr".into(), value: Some(0.2), impact: -0.10 },
    TopFeature { name: "cdpp_ppm".into(), value: Some(65.0), impact: -0.12 },
  ];

  PredictionResult {
    target: target.to_string(),
    mission,
    prob_planet: MOCK_PROB_PLANET,
    threshold: Some(MOCK_THRESHOLD),
    decision: Some(Decision::from_probability(MOCK_PROB_PLANET, MOCK_THRESHOLD)),
    diagnostics,
    top_features,
    notes: vec!["Mock scoring fixture; /api/predict replaces this".to_string()],
  }
}
