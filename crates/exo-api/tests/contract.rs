//! Client ↔ mock-backend round trips over a real socket.

use exo_api::{
  BackendClient, ClientConfig, ClientError, EndpointStyle, Mission, PredictRequest, Query,
};

/// Serve the mock router on an ephemeral port, returning its base URL.
async fn spawn_backend() -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, exo_api::server::router()).await.unwrap();
  });
  format!("http://{addr}")
}

fn client_for(base_url: String, endpoints: EndpointStyle) -> BackendClient {
  BackendClient::with_config(ClientConfig { base_url, timeout_secs: 5, endpoints })
}

#[tokio::test]
async fn light_curve_round_trip() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);

  let query = Query::new("Kepler-10", Mission::Kepler);
  let curve = client.fetch_light_curve(&query).await.unwrap();

  assert!(!curve.is_empty());
  assert_eq!(curve.time.len(), curve.flux.len());
  assert_eq!(curve.flat_time.len(), curve.flat_flux.len());
  assert_eq!(curve.time.len(), curve.flat_time.len());

  // Flattened flux should hover around unity.
  let mean = curve.flat_flux.iter().sum::<f64>() / curve.flat_flux.len() as f64;
  assert!((mean - 1.0).abs() < 0.01);
}

#[tokio::test]
async fn light_curve_is_deterministic_across_requests() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);

  let query = Query::new("Kepler-10", Mission::Kepler);
  let first = client.fetch_light_curve(&query).await.unwrap();
  let second = client.fetch_light_curve(&query).await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn predict_round_trip_scores_in_range() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);

  let request = PredictRequest {
    target: "K2-18".into(),
    mission: Mission::K2,
    author: None,
    threshold: Some(0.5),
  };
  let result = client.predict(&request).await.unwrap();

  assert_eq!(result.target, "K2-18");
  assert_eq!(result.mission, Mission::K2);
  assert!((0.0..=1.0).contains(&result.prob_planet));
  assert_eq!(result.threshold, Some(0.5));
  assert!(!result.top_features.is_empty());
  assert!(result.diagnostics.contains_key("snr"));
}

#[tokio::test]
async fn unknown_target_surfaces_backend_text() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Production);

  let mut query = Query::new("unknown", Mission::Tess);
  query.set_author("SPOC");

  let err = client.fetch_light_curve(&query).await.unwrap_err();
  match err {
    ClientError::Status { status, body } => {
      assert_eq!(status, 404);
      assert!(body.contains("No light curves for 'unknown'"));
      assert!(body.contains("Try author=QLP"));
    }
    other => panic!("expected status error, got {other:?}"),
  }
}

#[tokio::test]
async fn out_of_range_window_is_rejected_by_the_server() {
  let base = spawn_backend().await;

  // The client clamps before sending, so drive the route directly.
  let response = reqwest::get(format!("{base}/api/lc-test?window_length=9")).await.unwrap();
  assert_eq!(response.status(), 400);
  let body = response.text().await.unwrap();
  assert!(body.contains("window_length"));
}

#[tokio::test]
async fn plot_endpoint_serves_svg_bytes() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);

  let query = Query::new("Kepler-10", Mission::Kepler);
  let bytes = client.fetch_plot(&query).await.unwrap();
  let text = String::from_utf8(bytes).unwrap();
  assert!(text.starts_with("<svg"));
}

#[tokio::test]
async fn health_answers_ok() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);
  client.health().await.unwrap();
}
