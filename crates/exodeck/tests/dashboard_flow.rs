//! End-to-end controller flows against an in-process mock backend: the
//! same reducer the dashboard runs, fed by real HTTP completions.

use exo_api::mock::mock_prediction;
use exo_api::{BackendClient, ClientConfig, EndpointStyle, Mission, PredictRequest, Query};
use exodeck::controller::{Action, Controller, Effect, FetchOutcome, FetchTicket, Operation, Tab};

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

fn ticket(effect: Effect) -> FetchTicket {
  match effect {
    Effect::StartFetch(ticket) => ticket,
    Effect::None => panic!("expected a fetch"),
  }
}

/// Run one light-curve fetch to completion, exactly as the dashboard's
/// spawned task would report it.
async fn complete_light_curve(controller: &mut Controller, client: &BackendClient, t: FetchTicket) {
  let action = match client.fetch_light_curve(&controller.query).await {
    Ok(curve) => Action::FetchSucceeded(t, FetchOutcome::LightCurve(curve)),
    Err(e) => Action::FetchFailed(t, e.to_string()),
  };
  controller.apply(action);
}

#[tokio::test]
async fn interactive_tab_loads_the_light_curve() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);
  let mut controller = Controller::new(Query::new("Kepler-10", Mission::Kepler));

  let t = ticket(controller.apply(Action::SelectTab(Tab::Interactive)));
  assert!(controller.is_loading(Operation::LightCurve));

  complete_light_curve(&mut controller, &client, t).await;

  assert!(!controller.is_loading(Operation::LightCurve));
  assert!(controller.light_curve.as_ref().is_some_and(|c| !c.is_empty()));
  assert_eq!(controller.error, None);
}

#[tokio::test]
async fn failed_fetch_surfaces_backend_text_then_success_clears_it() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Production);
  let mut controller = Controller::new(Query::new("unknown", Mission::Tess));
  controller.apply(Action::SetAuthor("SPOC".into()));

  let t = ticket(controller.apply(Action::SelectTab(Tab::Interactive)));
  complete_light_curve(&mut controller, &client, t).await;

  assert_eq!(controller.light_curve, None);
  let error = controller.error.clone().expect("error recorded");
  assert!(error.contains("No light curves for 'unknown'"));
  assert!(error.contains("Try author=QLP"));

  // Fix the query and retry: the slot clears on the next success.
  controller.apply(Action::SetTarget("TIC 307210830".into()));
  controller.apply(Action::SetAuthor("QLP".into()));
  let t = ticket(controller.apply(Action::FetchStarted(Operation::LightCurve)));
  complete_light_curve(&mut controller, &client, t).await;

  assert!(controller.light_curve.is_some());
  assert_eq!(controller.error, None);
}

#[tokio::test]
async fn overlapping_fetches_keep_only_the_latest_response() {
  let base = spawn_backend().await;
  let client = client_for(base.clone(), EndpointStyle::Mock);
  let mut controller = Controller::new(Query::new("Kepler-10", Mission::Kepler));

  let first = ticket(controller.apply(Action::FetchStarted(Operation::LightCurve)));
  controller.apply(Action::SetWindowLength("801".into()));
  let second = ticket(controller.apply(Action::FetchStarted(Operation::LightCurve)));

  // Both requests complete; the older one lands last, as in the race the
  // fencing redesign closes.
  let mut fresh = Query::new("Kepler-10", Mission::Kepler);
  fresh.window_length = 801;
  let second_curve = client.fetch_light_curve(&fresh).await.unwrap();

  let mut stale_query = Query::new("Kepler-10", Mission::Kepler);
  stale_query.window_length = 401;
  let first_curve = client.fetch_light_curve(&stale_query).await.unwrap();

  controller.apply(Action::FetchSucceeded(second, FetchOutcome::LightCurve(second_curve.clone())));
  controller.apply(Action::FetchSucceeded(first, FetchOutcome::LightCurve(first_curve)));

  assert_eq!(controller.light_curve, Some(second_curve));
  assert!(!controller.is_loading(Operation::LightCurve));
}

#[tokio::test]
async fn predict_flow_against_backend_and_mock_agree_on_shape() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);
  let mut controller = Controller::new(Query::new("K2-18", Mission::K2));

  // Real path.
  let t = ticket(controller.apply(Action::SelectTab(Tab::Predict)));
  let request = PredictRequest::from_query(&controller.query, Some(controller.threshold));
  let result = client.predict(&request).await.unwrap();
  controller.apply(Action::FetchSucceeded(t, FetchOutcome::Prediction(result)));

  assert!(!controller.is_loading(Operation::Predict));
  let backend_result = controller.prediction.clone().unwrap();
  assert!((0.0..=1.0).contains(&backend_result.prob_planet));

  // Mock path, same bracketing through the reducer.
  controller.apply(Action::SetMockMode(true));
  let t = ticket(controller.apply(Action::FetchStarted(Operation::Predict)));
  assert!(controller.is_loading(Operation::Predict));
  let fixture = mock_prediction(&controller.query.target, controller.query.mission);
  controller.apply(Action::FetchSucceeded(t, FetchOutcome::Prediction(fixture)));

  assert!(!controller.is_loading(Operation::Predict));
  let mock_result = controller.prediction.clone().unwrap();
  assert_eq!(mock_result.prob_planet, 0.84);
  assert_eq!(mock_result.target, backend_result.target);
  assert_eq!(mock_result.mission, backend_result.mission);
}

#[tokio::test]
async fn plot_bytes_can_be_saved_to_disk() {
  let base = spawn_backend().await;
  let client = client_for(base, EndpointStyle::Mock);
  let query = Query::new("Kepler-10", Mission::Kepler);

  let bytes = client.fetch_plot(&query).await.unwrap();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("plot.svg");
  std::fs::write(&path, &bytes).unwrap();

  let written = std::fs::read_to_string(&path).unwrap();
  assert!(written.starts_with("<svg"));
}
