//! View/request controller: the state machine behind the three view modes.
//!
//! All UI state lives in [`Controller`] and changes only through
//! [`Controller::apply`], a reducer over discrete [`Action`]s. The
//! controller performs no I/O itself: when an action requires a backend
//! request it returns an [`Effect::StartFetch`] carrying a ticket, the
//! caller runs the request however it likes (spawned task, inline await),
//! and reports back with a completion action holding the same ticket.
//!
//! Overlapping requests are fenced by token: each started fetch gets a
//! monotonically increasing token per operation, and completions whose
//! token is not the latest issued for that operation are discarded
//! outright. A stale completion neither overwrites state nor clears the
//! loading flag, since the newer request is still outstanding.

use exo_api::query::parse_window_length;
use exo_api::{Decision, LightCurve, Mission, PredictionResult, Query};

/// The three view modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
  #[default]
  Plot,
  Interactive,
  Predict,
}

impl Tab {
  pub const ALL: [Tab; 3] = [Tab::Plot, Tab::Interactive, Tab::Predict];

  pub fn title(&self) -> &'static str {
    match self {
      Tab::Plot => "Plot",
      Tab::Interactive => "Interactive",
      Tab::Predict => "Predict",
    }
  }
}

/// Backend operations the controller can have in flight. Plot has no
/// entry: selecting the plot tab only changes the derived image URL, and
/// whatever displays that URL performs the retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  LightCurve,
  Predict,
}

/// Identifies one issued fetch for fencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
  pub operation: Operation,
  pub token: u64,
}

/// Payload of a successful fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
  LightCurve(LightCurve),
  Prediction(PredictionResult),
}

/// Discrete state transitions.
#[derive(Debug, Clone)]
pub enum Action {
  SelectTab(Tab),
  SetTarget(String),
  SetMission(Mission),
  SetAuthor(String),
  /// Raw user input; clamped to the valid range, malformed text falls back
  /// to the default window.
  SetWindowLength(String),
  SetThreshold(f64),
  SetMockMode(bool),
  /// Explicit user-triggered (re)fetch of an operation.
  FetchStarted(Operation),
  FetchSucceeded(FetchTicket, FetchOutcome),
  FetchFailed(FetchTicket, String),
}

/// What the caller must do after applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
  None,
  StartFetch(FetchTicket),
}

#[derive(Debug, Clone, Copy, Default)]
struct OpSlot {
  loading: bool,
  latest: u64,
}

/// All state owned by the dashboard for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Controller {
  pub query: Query,
  pub threshold: f64,
  pub mock_mode: bool,
  pub active_tab: Tab,
  pub light_curve: Option<LightCurve>,
  pub prediction: Option<PredictionResult>,
  pub error: Option<String>,
  light_curve_slot: OpSlot,
  predict_slot: OpSlot,
  next_token: u64,
}

impl Controller {
  pub fn new(query: Query) -> Self {
    Self {
      query,
      threshold: 0.5,
      mock_mode: false,
      active_tab: Tab::Plot,
      light_curve: None,
      prediction: None,
      error: None,
      light_curve_slot: OpSlot::default(),
      predict_slot: OpSlot::default(),
      next_token: 0,
    }
  }

  /// True while the latest fetch for the operation is outstanding.
  pub fn is_loading(&self, operation: Operation) -> bool {
    self.slot(operation).loading
  }

  pub fn any_loading(&self) -> bool {
    self.light_curve_slot.loading || self.predict_slot.loading
  }

  /// Decision label for the current prediction, recomputed from the
  /// client-held threshold. Takes precedence over any decision the backend
  /// embedded, so threshold changes re-label without a request.
  pub fn decision(&self) -> Option<Decision> {
    self
      .prediction
      .as_ref()
      .map(|p| Decision::from_probability(p.prob_planet, self.threshold))
  }

  /// Apply one action, returning the effect the caller must perform.
  pub fn apply(&mut self, action: Action) -> Effect {
    match action {
      Action::SelectTab(tab) => {
        self.active_tab = tab;
        match tab {
          Tab::Plot => Effect::None,
          Tab::Interactive => self.begin(Operation::LightCurve),
          Tab::Predict => self.begin(Operation::Predict),
        }
      }
      Action::SetTarget(target) => {
        self.query.target = target;
        Effect::None
      }
      Action::SetMission(mission) => {
        self.query.mission = mission;
        Effect::None
      }
      Action::SetAuthor(author) => {
        self.query.set_author(&author);
        Effect::None
      }
      Action::SetWindowLength(raw) => {
        self.query.window_length = parse_window_length(&raw);
        Effect::None
      }
      Action::SetThreshold(threshold) => {
        self.threshold = threshold.clamp(0.0, 1.0);
        Effect::None
      }
      Action::SetMockMode(on) => {
        self.mock_mode = on;
        Effect::None
      }
      Action::FetchStarted(operation) => self.begin(operation),
      Action::FetchSucceeded(ticket, outcome) => {
        if !self.is_latest(ticket) {
          return Effect::None;
        }
        self.slot_mut(ticket.operation).loading = false;
        self.error = None;
        match outcome {
          FetchOutcome::LightCurve(curve) => self.light_curve = Some(curve),
          FetchOutcome::Prediction(result) => self.prediction = Some(result),
        }
        Effect::None
      }
      Action::FetchFailed(ticket, message) => {
        if !self.is_latest(ticket) {
          return Effect::None;
        }
        self.slot_mut(ticket.operation).loading = false;
        self.error = Some(message);
        match ticket.operation {
          Operation::LightCurve => self.light_curve = None,
          Operation::Predict => self.prediction = None,
        }
        Effect::None
      }
    }
  }

  fn begin(&mut self, operation: Operation) -> Effect {
    self.next_token += 1;
    let token = self.next_token;
    let slot = self.slot_mut(operation);
    slot.latest = token;
    slot.loading = true;
    Effect::StartFetch(FetchTicket { operation, token })
  }

  fn is_latest(&self, ticket: FetchTicket) -> bool {
    self.slot(ticket.operation).latest == ticket.token
  }

  fn slot(&self, operation: Operation) -> &OpSlot {
    match operation {
      Operation::LightCurve => &self.light_curve_slot,
      Operation::Predict => &self.predict_slot,
    }
  }

  fn slot_mut(&mut self, operation: Operation) -> &mut OpSlot {
    match operation {
      Operation::LightCurve => &mut self.light_curve_slot,
      Operation::Predict => &mut self.predict_slot,
    }
  }
}

impl Default for Controller {
  fn default() -> Self {
    Self::new(Query::new(String::new(), Mission::Kepler))
  }
}
