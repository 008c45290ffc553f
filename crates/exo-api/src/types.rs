//! Wire types shared between the dashboard and the backend.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::{Mission, Query};

/// Raw and detrended photometry for one target.
///
/// The paired arrays are the producer's responsibility to keep the same
/// length; the dashboard renders whatever it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
  pub time: Vec<f64>,
  pub flux: Vec<f64>,
  pub flat_time: Vec<f64>,
  pub flat_flux: Vec<f64>,
}

impl LightCurve {
  pub fn len(&self) -> usize {
    self.time.len()
  }

  pub fn is_empty(&self) -> bool {
    self.time.is_empty()
  }
}

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
  pub target: String,
  pub mission: Mission,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub threshold: Option<f64>,
}

impl PredictRequest {
  pub fn from_query(query: &Query, threshold: Option<f64>) -> Self {
    Self {
      target: query.target.clone(),
      mission: query.mission,
      author: query.author().map(str::to_string),
      threshold,
    }
  }
}

/// Classification label derived from a probability and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  PlanetLike,
  NotPlanetLike,
}

impl Decision {
  /// Planet-like iff `prob >= threshold`, boundary inclusive.
  ///
  /// The displayed label is always recomputed from the client-held
  /// threshold; any `decision` the backend embeds is informational only, so
  /// moving the threshold updates the label without a new request.
  pub fn from_probability(prob: f64, threshold: f64) -> Self {
    if prob >= threshold {
      Decision::PlanetLike
    } else {
      Decision::NotPlanetLike
    }
  }
}

impl fmt::Display for Decision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Decision::PlanetLike => "planet_like",
      Decision::NotPlanetLike => "not_planet_like",
    })
  }
}

/// One entry of the model's feature-impact breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFeature {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<f64>,
  pub impact: f64,
}

/// Response of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
  pub target: String,
  pub mission: Mission,
  pub prob_planet: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub threshold: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub decision: Option<Decision>,
  #[serde(default)]
  pub diagnostics: BTreeMap<String, serde_json::Value>,
  #[serde(default)]
  pub top_features: Vec<TopFeature>,
  #[serde(default)]
  pub notes: Vec<String>,
}
