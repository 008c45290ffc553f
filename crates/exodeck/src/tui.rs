//! Interactive dashboard: the three tabs, driven by the controller.
//!
//! The event loop is single-threaded and cooperative. Key presses become
//! controller actions; any [`Effect::StartFetch`] is run on a spawned task
//! that reports back through an mpsc channel as a completion action, so
//! every state change funnels through [`Controller::apply`] and the
//! fencing/loading semantics hold exactly as in the unit tests.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph, Tabs, Wrap};
use tokio::sync::mpsc;

use exo_api::mock::mock_prediction;
use exo_api::{BackendClient, Decision, Mission, PredictRequest, Query};

use crate::config::BackendOptions;
use crate::controller::{Action, Controller, Effect, FetchOutcome, FetchTicket, Operation, Tab};

const PLOT_FILE: &str = "exodeck-plot.svg";

enum UiMsg {
  Action(Action),
  Notice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditField {
  Target,
  Author,
  WindowLength,
}

impl EditField {
  fn label(&self) -> &'static str {
    match self {
      EditField::Target => "target",
      EditField::Author => "author",
      EditField::WindowLength => "window length",
    }
  }
}

struct App {
  controller: Controller,
  client: BackendClient,
  status: String,
  editing: Option<(EditField, String)>,
  tx: mpsc::UnboundedSender<UiMsg>,
}

impl App {
  fn dispatch(&mut self, action: Action) {
    let effect = self.controller.apply(action);
    if let Effect::StartFetch(ticket) = effect {
      self.spawn_fetch(ticket);
    }
  }

  fn spawn_fetch(&self, ticket: FetchTicket) {
    let client = self.client.clone();
    let query = self.controller.query.clone();
    let threshold = self.controller.threshold;
    let mock_mode = self.controller.mock_mode;
    let tx = self.tx.clone();

    tokio::spawn(async move {
      let action = match ticket.operation {
        Operation::LightCurve => match client.fetch_light_curve(&query).await {
          Ok(curve) => Action::FetchSucceeded(ticket, FetchOutcome::LightCurve(curve)),
          Err(e) => Action::FetchFailed(ticket, e.to_string()),
        },
        Operation::Predict => {
          if mock_mode {
            let fixture = mock_prediction(&query.target, query.mission);
            Action::FetchSucceeded(ticket, FetchOutcome::Prediction(fixture))
          } else {
            let request = PredictRequest::from_query(&query, Some(threshold));
            match client.predict(&request).await {
              Ok(result) => Action::FetchSucceeded(ticket, FetchOutcome::Prediction(result)),
              Err(e) => Action::FetchFailed(ticket, e.to_string()),
            }
          }
        }
      };
      let _ = tx.send(UiMsg::Action(action));
    });
  }

  /// The plot tab never fetches on its own; saving is the explicit consumer
  /// of the derived URL.
  fn save_plot(&self) {
    let client = self.client.clone();
    let query = self.controller.query.clone();
    let tx = self.tx.clone();

    tokio::spawn(async move {
      let notice = match client.fetch_plot(&query).await {
        Ok(bytes) => match std::fs::write(PLOT_FILE, &bytes) {
          Ok(()) => format!("saved {PLOT_FILE} ({} bytes)", bytes.len()),
          Err(e) => format!("could not write {PLOT_FILE}: {e}"),
        },
        Err(e) => format!("plot fetch failed: {e}"),
      };
      let _ = tx.send(UiMsg::Notice(notice));
    });
  }
}

pub async fn run(backend: &BackendOptions, query: Query) -> Result<()> {
  let client = backend.client()?;

  enable_raw_mode()?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;
  let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

  let result = event_loop(&mut terminal, client, query).await;

  disable_raw_mode()?;
  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
  terminal.show_cursor()?;
  result
}

async fn event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  client: BackendClient,
  query: Query,
) -> Result<()> {
  let (tx, mut rx) = mpsc::unbounded_channel();
  let mut app = App {
    controller: Controller::new(query),
    client,
    status: format!("exodeck v{}", env!("CARGO_PKG_VERSION")),
    editing: None,
    tx,
  };

  loop {
    terminal.draw(|frame| draw(frame, &app))?;

    while let Ok(msg) = rx.try_recv() {
      match msg {
        UiMsg::Action(action) => app.dispatch(action),
        UiMsg::Notice(text) => app.status = text,
      }
    }

    if event::poll(Duration::from_millis(100))? {
      if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press && handle_key(&mut app, key.code) {
          break;
        }
      }
    }
  }

  Ok(())
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, code: KeyCode) -> bool {
  if let Some((field, mut buffer)) = app.editing.take() {
    match code {
      KeyCode::Esc => {}
      KeyCode::Enter => {
        let action = match field {
          EditField::Target => Action::SetTarget(buffer),
          EditField::Author => Action::SetAuthor(buffer),
          EditField::WindowLength => Action::SetWindowLength(buffer),
        };
        app.dispatch(action);
        app.status = format!("{} updated", field.label());
      }
      KeyCode::Backspace => {
        buffer.pop();
        app.editing = Some((field, buffer));
      }
      KeyCode::Char(ch) => {
        buffer.push(ch);
        app.editing = Some((field, buffer));
      }
      _ => {
        app.editing = Some((field, buffer));
      }
    }
    return false;
  }

  match code {
    KeyCode::Char('q') | KeyCode::Esc => return true,
    KeyCode::Char('1') => app.dispatch(Action::SelectTab(Tab::Plot)),
    KeyCode::Char('2') => app.dispatch(Action::SelectTab(Tab::Interactive)),
    KeyCode::Char('3') => app.dispatch(Action::SelectTab(Tab::Predict)),
    KeyCode::Char('r') => match app.controller.active_tab {
      Tab::Plot => app.status = "plot tab issues no fetch; press s to save the image".into(),
      Tab::Interactive => app.dispatch(Action::FetchStarted(Operation::LightCurve)),
      Tab::Predict => app.dispatch(Action::FetchStarted(Operation::Predict)),
    },
    KeyCode::Char('m') => {
      let on = !app.controller.mock_mode;
      app.dispatch(Action::SetMockMode(on));
      app.status = format!("mock mode {}", if on { "on" } else { "off" });
    }
    KeyCode::Char('+') | KeyCode::Char('=') => {
      let threshold = app.controller.threshold + 0.05;
      app.dispatch(Action::SetThreshold(threshold));
    }
    KeyCode::Char('-') => {
      let threshold = app.controller.threshold - 0.05;
      app.dispatch(Action::SetThreshold(threshold));
    }
    KeyCode::Char('M') => {
      let next = match app.controller.query.mission {
        Mission::Kepler => Mission::K2,
        Mission::K2 => Mission::Tess,
        Mission::Tess => Mission::Kepler,
      };
      app.dispatch(Action::SetMission(next));
    }
    KeyCode::Char('t') => {
      app.editing = Some((EditField::Target, app.controller.query.target.clone()));
    }
    KeyCode::Char('a') => {
      let current = app.controller.query.author().unwrap_or_default().to_string();
      app.editing = Some((EditField::Author, current));
    }
    KeyCode::Char('w') => {
      app.editing =
        Some((EditField::WindowLength, app.controller.query.window_length.to_string()));
    }
    KeyCode::Char('s') => {
      if app.controller.active_tab == Tab::Plot {
        app.status = format!("fetching plot into {PLOT_FILE}...");
        app.save_plot();
      }
    }
    _ => {}
  }
  false
}

fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3),
      Constraint::Length(1),
      Constraint::Min(8),
      Constraint::Length(2),
    ])
    .split(frame.area());

  draw_header(frame, app, chunks[0]);
  draw_tabs(frame, app, chunks[1]);
  match app.controller.active_tab {
    Tab::Plot => draw_plot_tab(frame, app, chunks[2]),
    Tab::Interactive => draw_interactive_tab(frame, app, chunks[2]),
    Tab::Predict => draw_predict_tab(frame, app, chunks[2]),
  }
  draw_footer(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
  let query = &app.controller.query;
  let mut spans = vec![
    Span::styled(query.target.clone(), Style::default().fg(Color::Yellow).bold()),
    Span::raw("  mission "),
    Span::styled(query.mission.to_string(), Style::default().fg(Color::Cyan)),
    Span::raw(format!("  window {}", query.window_length)),
  ];
  if let Some(author) = query.author() {
    spans.push(Span::raw(format!("  author {author}")));
  }
  if app.controller.mock_mode {
    spans.push(Span::styled("  [mock]", Style::default().fg(Color::Magenta).bold()));
  }

  let block = Block::default().borders(Borders::ALL).title(" exodeck ");
  frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
  let index = Tab::ALL.iter().position(|t| *t == app.controller.active_tab).unwrap_or(0);
  let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
    .select(index)
    .style(Style::default().fg(Color::Gray))
    .highlight_style(Style::default().fg(Color::White).bold());
  frame.render_widget(tabs, area);
}

fn draw_plot_tab(frame: &mut Frame, app: &App, area: Rect) {
  let url = app.client.plot_url(&app.controller.query);
  let lines = vec![
    Line::from(Span::styled("Backend-rendered plot", Style::default().bold())),
    Line::default(),
    Line::from(vec![Span::raw("URL: "), Span::styled(url, Style::default().fg(Color::Cyan))]),
    Line::default(),
    Line::from("Selecting this tab issues no request; the consumer of the"),
    Line::from("URL retrieves the image. Press s to save it locally."),
  ];
  let block = Block::default().borders(Borders::ALL).title(" Plot ");
  frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_interactive_tab(frame: &mut Frame, app: &App, area: Rect) {
  let block = Block::default().borders(Borders::ALL).title(" Light curve ");

  if app.controller.is_loading(Operation::LightCurve) {
    frame.render_widget(Paragraph::new("Loading light curve...").block(block), area);
    return;
  }

  let Some(curve) = &app.controller.light_curve else {
    let hint = if app.controller.error.is_some() {
      "Fetch failed; press r to retry."
    } else {
      "No data yet; press r to fetch."
    };
    frame.render_widget(Paragraph::new(hint).block(block), area);
    return;
  };

  let raw_points: Vec<(f64, f64)> =
    curve.time.iter().zip(&curve.flux).map(|(&t, &f)| (t, f)).collect();
  let flat_points: Vec<(f64, f64)> =
    curve.flat_time.iter().zip(&curve.flat_flux).map(|(&t, &f)| (t, f)).collect();

  let x_min = curve.time.first().copied().unwrap_or(0.0);
  let x_max = curve.time.last().copied().unwrap_or(1.0);
  let all = curve.flux.iter().chain(&curve.flat_flux).copied();
  let y_min = all.clone().fold(f64::MAX, f64::min);
  let y_max = all.fold(f64::MIN, f64::max);
  let pad = ((y_max - y_min) * 0.05).max(1e-9);

  let datasets = vec![
    Dataset::default()
      .name("raw")
      .marker(symbols::Marker::Braille)
      .style(Style::default().fg(Color::DarkGray))
      .data(&raw_points),
    Dataset::default()
      .name("flat")
      .marker(symbols::Marker::Braille)
      .style(Style::default().fg(Color::Cyan))
      .data(&flat_points),
  ];

  let chart = Chart::new(datasets)
    .block(block)
    .x_axis(
      Axis::default()
        .title("time [days]")
        .bounds([x_min, x_max])
        .labels(vec![Line::from(format!("{x_min:.1}")), Line::from(format!("{x_max:.1}"))]),
    )
    .y_axis(
      Axis::default()
        .title("flux")
        .bounds([y_min - pad, y_max + pad])
        .labels(vec![
          Line::from(format!("{:.4}", y_min - pad)),
          Line::from(format!("{:.4}", y_max + pad)),
        ]),
    );

  frame.render_widget(chart, area);
}

fn draw_predict_tab(frame: &mut Frame, app: &App, area: Rect) {
  let block = Block::default().borders(Borders::ALL).title(" Prediction ");

  if app.controller.is_loading(Operation::Predict) {
    frame.render_widget(Paragraph::new("Scoring...").block(block), area);
    return;
  }

  let Some(result) = &app.controller.prediction else {
    let hint = if app.controller.error.is_some() {
      "Scoring failed; press r to retry."
    } else {
      "No score yet; press r to run the classifier (m toggles mock mode)."
    };
    frame.render_widget(Paragraph::new(hint).block(block), area);
    return;
  };

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(4)])
    .split(inner);

  let decision = app.controller.decision().unwrap_or(Decision::NotPlanetLike);
  let gauge_color = match decision {
    Decision::PlanetLike => Color::Green,
    Decision::NotPlanetLike => Color::Red,
  };
  let gauge = Gauge::default()
    .block(Block::default().borders(Borders::ALL).title(" prob_planet "))
    .gauge_style(Style::default().fg(gauge_color))
    .ratio(result.prob_planet.clamp(0.0, 1.0))
    .label(format!("{:.3}", result.prob_planet));
  frame.render_widget(gauge, rows[0]);

  let mut lines = vec![Line::from(vec![
    Span::raw("decision: "),
    Span::styled(decision.to_string(), Style::default().fg(gauge_color).bold()),
    Span::raw(format!("  threshold {:.2}  (+/- to adjust, no refetch)", app.controller.threshold)),
  ])];

  if !result.top_features.is_empty() {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("top features", Style::default().bold())));
    for feature in &result.top_features {
      let impact_style = if feature.impact >= 0.0 {
        Style::default().fg(Color::Green)
      } else {
        Style::default().fg(Color::Red)
      };
      let value = feature.value.map(|v| format!("{v}")).unwrap_or_else(|| "-".into());
      lines.push(Line::from(vec![
        Span::raw(format!("  {:<16} {:>10}  ", feature.name, value)),
        Span::styled(format!("{:+.2}", feature.impact), impact_style),
      ]));
    }
  }

  if !result.diagnostics.is_empty() {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("diagnostics", Style::default().bold())));
    for (name, value) in &result.diagnostics {
      lines.push(Line::from(format!("  {name:<16} {value}")));
    }
  }

  for note in &result.notes {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(note.clone(), Style::default().fg(Color::DarkGray))));
  }

  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), rows[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Length(1)])
    .split(area);

  let first = if let Some((field, buffer)) = &app.editing {
    Line::from(vec![
      Span::styled(format!("editing {}: ", field.label()), Style::default().fg(Color::Yellow)),
      Span::raw(buffer.clone()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
      Span::raw("  (Enter apply, Esc cancel)"),
    ])
  } else if let Some(error) = &app.controller.error {
    Line::from(vec![
      Span::styled("✗ ", Style::default().fg(Color::Red).bold()),
      Span::styled(error.clone(), Style::default().fg(Color::Red)),
    ])
  } else if app.controller.any_loading() {
    Line::from(Span::styled("working...", Style::default().fg(Color::Yellow)))
  } else {
    Line::from(Span::raw(app.status.clone()))
  };
  frame.render_widget(Paragraph::new(first), rows[0]);

  let hints =
    "q quit  1/2/3 tabs  r refresh  m mock  +/- threshold  t/a/w edit  M mission  s save plot";
  frame.render_widget(
    Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    rows[1],
  );
}
