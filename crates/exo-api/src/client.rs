//! Thin HTTP client for the model-serving backend.
//!
//! Failure handling is deliberately flat: a non-success status surfaces the
//! response body text verbatim, and transport failures surface the
//! transport error's description. Callers show whichever message they get
//! in a single error slot and move on; there is no retry and no structured
//! classification beyond that.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::endpoints::EndpointStyle;
use crate::query::Query;
use crate::types::{LightCurve, PredictRequest, PredictionResult};

/// Errors surfaced to the UI, `Display`ing exactly the text to show.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  /// Request never completed (connect, timeout, decode).
  #[error("{0}")]
  Transport(#[from] reqwest::Error),
  /// Backend answered with a non-success status; `body` is verbatim.
  #[error("{body}")]
  Status { status: u16, body: String },
}

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the backend, e.g. "http://127.0.0.1:8000".
  pub base_url: String,
  /// Request timeout in seconds.
  pub timeout_secs: u64,
  /// Which endpoint style the backend speaks.
  pub endpoints: EndpointStyle,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: "http://127.0.0.1:8000".to_string(),
      timeout_secs: 30,
      endpoints: EndpointStyle::Mock,
    }
  }
}

/// HTTP client for the plot, light-curve and prediction endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
  http: Client,
  config: ClientConfig,
}

impl Default for BackendClient {
  fn default() -> Self {
    Self::new()
  }
}

impl BackendClient {
  pub fn new() -> Self {
    Self::with_config(ClientConfig::default())
  }

  pub fn with_config(config: ClientConfig) -> Self {
    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .expect("failed to build HTTP client");

    Self { http, config }
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  /// Absolute URL for the rendered-plot image. Pure; issuing the GET is the
  /// consumer's job (an image element, or [`BackendClient::fetch_plot`]).
  pub fn plot_url(&self, query: &Query) -> String {
    self.absolute(&self.config.endpoints.plot_path(query))
  }

  /// Fetch the raw image bytes behind [`BackendClient::plot_url`].
  pub async fn fetch_plot(&self, query: &Query) -> Result<Vec<u8>, ClientError> {
    let url = self.plot_url(query);
    debug!(%url, "GET plot");
    let response = check(self.http.get(&url).send().await?).await?;
    Ok(response.bytes().await?.to_vec())
  }

  /// Fetch the raw and detrended arrays for the query.
  pub async fn fetch_light_curve(&self, query: &Query) -> Result<LightCurve, ClientError> {
    let url = self.absolute(&self.config.endpoints.lc_path(query));
    debug!(%url, "GET light curve");
    let response = check(self.http.get(&url).send().await?).await?;
    Ok(response.json().await?)
  }

  /// Submit a target for scoring.
  pub async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, ClientError> {
    let url = self.absolute(self.config.endpoints.predict_path());
    debug!(%url, target = %request.target, "POST predict");
    let response = check(self.http.post(&url).json(request).send().await?).await?;
    Ok(response.json().await?)
  }

  /// Check whether the backend is reachable at all.
  pub async fn health(&self) -> Result<(), ClientError> {
    let url = self.absolute("/health");
    check(self.http.get(&url).send().await?).await?;
    Ok(())
  }

  fn absolute(&self, path_and_query: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path_and_query)
  }
}

/// Map non-success responses to [`ClientError::Status`], reading the body
/// text so the UI can show it unchanged. A bodyless response falls back to
/// the status line so the error slot is never blank.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  let body = if body.trim().is_empty() { format!("HTTP {status}") } else { body };
  Err(ClientError::Status { status: status.as_u16(), body })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::query::Mission;

  #[test]
  fn plot_url_joins_base_without_double_slash() {
    let config = ClientConfig { base_url: "http://backend.test/".into(), ..Default::default() };
    let client = BackendClient::with_config(config);
    let query = Query::new("Kepler-10", Mission::Kepler);
    assert_eq!(client.plot_url(&query), "http://backend.test/api/plot-test?window_length=401");
  }

  #[test]
  fn status_error_displays_body_verbatim() {
    let error = ClientError::Status { status: 404, body: "No light curves for 'X'".into() };
    assert_eq!(error.to_string(), "No light curves for 'X'");
  }
}
