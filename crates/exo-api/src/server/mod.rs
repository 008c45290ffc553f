//! Mock backend serving the dashboard contract against synthetic data.
//!
//! Implements the same routes the real model-serving service exposes, so
//! the dashboard (and its tests) run end-to-end with nothing external. All
//! failure responses carry a plain-text body; the dashboard shows that text
//! verbatim in its error slot.

mod svg;

use std::net::SocketAddr;

use axum::extract::{Path, Query as QueryParams};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::query::{Mission, WINDOW_DEFAULT, WINDOW_MAX, WINDOW_MIN};
use crate::synth::{flatten, synthetic_transit, TransitParams};
use crate::types::{Decision, LightCurve, PredictRequest, PredictionResult, TopFeature};

type Failure = (StatusCode, String);

/// Common query parameters of the light-curve and plot routes.
#[derive(Debug, Deserialize)]
struct LcParams {
  mission: Option<String>,
  window_length: Option<i64>,
  author: Option<String>,
  period: Option<f64>,
  depth_ppm: Option<f64>,
}

impl LcParams {
  fn mission(&self) -> Result<Mission, Failure> {
    match &self.mission {
      None => Ok(Mission::Kepler),
      Some(raw) => raw
        .parse::<Mission>()
        .map_err(|message| (StatusCode::BAD_REQUEST, message)),
    }
  }

  /// Unlike the client, the server rejects out-of-range windows instead of
  /// clamping, matching the original service's validation.
  fn window_length(&self) -> Result<u32, Failure> {
    let raw = self.window_length.unwrap_or(WINDOW_DEFAULT as i64);
    if raw < WINDOW_MIN as i64 || raw > WINDOW_MAX as i64 {
      return Err((
        StatusCode::BAD_REQUEST,
        format!("window_length must be between {WINDOW_MIN} and {WINDOW_MAX}, got {raw}"),
      ));
    }
    Ok(raw as u32)
  }

  fn transit_params(&self) -> TransitParams {
    TransitParams {
      period: self.period.unwrap_or(3.0),
      depth: self.depth_ppm.unwrap_or(1500.0) / 1e6,
      ..Default::default()
    }
  }
}

/// Reject targets the fixture pretends not to know, with the same message
/// shape (and TESS author hint) the original pipeline produced.
fn lookup_target(target: &str, mission: Mission, author: Option<&str>) -> Result<(), Failure> {
  if !target.eq_ignore_ascii_case("unknown") {
    return Ok(());
  }

  let author = author.unwrap_or(match mission {
    Mission::Kepler | Mission::K2 => "Kepler",
    Mission::Tess => "SPOC",
  });
  let mut message =
    format!("No light curves for '{target}' (mission={mission}, author={author}).");
  if mission == Mission::Tess && author == "SPOC" {
    message.push_str(" Try author=QLP.");
  }
  Err((StatusCode::NOT_FOUND, message))
}

fn build_light_curve(params: &LcParams) -> Result<LightCurve, Failure> {
  let window_length = params.window_length()?;
  let (time, flux) = synthetic_transit(&params.transit_params());
  let flat_flux = flatten(&flux, window_length);
  Ok(LightCurve { flat_time: time.clone(), time, flux, flat_flux })
}

async fn health() -> Json<serde_json::Value> {
  Json(json!({ "ok": true }))
}

/// GET /api/lc-test - synthetic light curve, target-agnostic
async fn lc_test(QueryParams(params): QueryParams<LcParams>) -> Result<Json<LightCurve>, Failure> {
  params.mission()?;
  Ok(Json(build_light_curve(&params)?))
}

/// GET /api/lc/{target} - synthetic light curve for a named target
async fn lc_target(
  Path(target): Path<String>,
  QueryParams(params): QueryParams<LcParams>,
) -> Result<Json<LightCurve>, Failure> {
  let mission = params.mission()?;
  lookup_target(&target, mission, params.author.as_deref())?;
  Ok(Json(build_light_curve(&params)?))
}

fn svg_response(curve: &LightCurve, title: &str) -> impl IntoResponse {
  let body = svg::render_light_curve(&curve.time, &curve.flux, &curve.flat_flux, title);
  ([(header::CONTENT_TYPE, "image/svg+xml")], body)
}

/// GET /api/plot-test - two-panel raw/flattened plot as SVG bytes
async fn plot_test(
  QueryParams(params): QueryParams<LcParams>,
) -> Result<impl IntoResponse, Failure> {
  params.mission()?;
  let curve = build_light_curve(&params)?;
  Ok(svg_response(&curve, "Synthetic light curve"))
}

/// GET /api/plot/{target}
async fn plot_target(
  Path(target): Path<String>,
  QueryParams(params): QueryParams<LcParams>,
) -> Result<impl IntoResponse, Failure> {
  let mission = params.mission()?;
  lookup_target(&target, mission, params.author.as_deref())?;
  let curve = build_light_curve(&params)?;
  let title = format!("{target} ({mission})");
  Ok(svg_response(&curve, &title))
}

/// POST /api/predict - toy scoring rule over canned diagnostics.
async fn predict(Json(request): Json<PredictRequest>) -> Result<Json<PredictionResult>, Failure> {
  lookup_target(&request.target, request.mission, request.author.as_deref())?;

  let snr = 18.3;
  let cdpp_ppm = 65.0;
  let odd_even_diff = 0.01;
  let secondary_snr = 0.2;

  let mut score = 0.6;
  score += 0.15 * (snr / 20.0);
  score -= 0.10 * (cdpp_ppm / 100.0);
  score -= 0.40 * secondary_snr.min(1.0);
  score -= 0.30 * (odd_even_diff * 10.0_f64).min(1.0);
  let prob_planet = ((score.clamp(0.0, 1.0)) * 1000.0).round() / 1000.0;

  let threshold = request.threshold.unwrap_or(0.5);

  let mut diagnostics = std::collections::BTreeMap::new();
  diagnostics.insert("snr".to_string(), json!(snr));
  diagnostics.insert("cdpp_ppm".to_string(), json!(cdpp_ppm));
  diagnostics.insert("odd_even_diff".to_string(), json!(odd_even_diff));
  diagnostics.insert("secondary_snr".to_string(), json!(secondary_snr));
  diagnostics.insert("centroid_sigma".to_string(), json!(0.7));

  Ok(Json(PredictionResult {
    target: request.target,
    mission: request.mission,
    prob_planet,
    threshold: Some(threshold),
    decision: Some(Decision::from_probability(prob_planet, threshold)),
    diagnostics,
    top_features: vec![
      TopFeature { name: "depth_ppm".into(), value: Some(520.0), impact: 0.23 },
      TopFeature { name: "duration_hr".into(), value: Some(3.1), impact: 0.17 },
      TopFeature { name: "secondary_snr".into(), value: Some(0.2), impact: -0.10 },
      TopFeature { name: "cdpp_ppm".into(), value: Some(65.0), impact: -0.12 },
    ],
    notes: vec!["Mock scoring; replace with the real model service".to_string()],
  }))
}

/// Build the application router.
pub fn router() -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/lc-test", get(lc_test))
    .route("/api/lc/{target}", get(lc_target))
    .route("/api/plot-test", get(plot_test))
    .route("/api/plot/{target}", get(plot_target))
    .route("/api/predict", post(predict))
}

/// Bind and serve until shutdown.
pub async fn run(addr: SocketAddr) -> Result<(), std::io::Error> {
  // Browser dev servers call this cross-origin; keep CORS permissive like
  // the original mock.
  let app = router()
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  info!("mock backend listening on {addr}");
  axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_target_carries_qlp_hint_for_tess_spoc() {
    let err = lookup_target("unknown", Mission::Tess, None).unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
    assert!(err.1.contains("Try author=QLP"));

    let err = lookup_target("unknown", Mission::Kepler, None).unwrap_err();
    assert!(!err.1.contains("QLP"));

    assert!(lookup_target("Kepler-10", Mission::Kepler, None).is_ok());
  }

  #[test]
  fn window_validation_rejects_out_of_range() {
    let params = LcParams {
      mission: None,
      window_length: Some(9),
      author: None,
      period: None,
      depth_ppm: None,
    };
    let err = params.window_length().unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
    assert!(err.1.contains("window_length"));
  }
}
