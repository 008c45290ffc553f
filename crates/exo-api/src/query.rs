//! Query model: target, mission, author and detrending window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest accepted detrending window.
pub const WINDOW_MIN: u32 = 51;
/// Largest accepted detrending window.
pub const WINDOW_MAX: u32 = 5001;
/// Fallback used when the window input is absent or malformed.
pub const WINDOW_DEFAULT: u32 = 401;

/// Space-telescope survey the target was observed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mission {
  Kepler,
  K2,
  #[serde(rename = "TESS")]
  Tess,
}

impl Mission {
  pub const ALL: [Mission; 3] = [Mission::Kepler, Mission::K2, Mission::Tess];

  /// Wire name as the backend expects it.
  pub fn as_str(&self) -> &'static str {
    match self {
      Mission::Kepler => "Kepler",
      Mission::K2 => "K2",
      Mission::Tess => "TESS",
    }
  }
}

impl fmt::Display for Mission {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Mission {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "kepler" => Ok(Mission::Kepler),
      "k2" => Ok(Mission::K2),
      "tess" => Ok(Mission::Tess),
      other => Err(format!("unknown mission '{other}' (expected Kepler, K2 or TESS)")),
    }
  }
}

/// Clamp a raw window value into [`WINDOW_MIN`, `WINDOW_MAX`].
pub fn clamp_window_length(raw: i64) -> u32 {
  raw.clamp(WINDOW_MIN as i64, WINDOW_MAX as i64) as u32
}

/// Parse user input for the window length. Malformed input falls back to
/// [`WINDOW_DEFAULT`]; out-of-range values are clamped, never rejected.
pub fn parse_window_length(input: &str) -> u32 {
  match input.trim().parse::<i64>() {
    Ok(raw) => clamp_window_length(raw),
    Err(_) => WINDOW_DEFAULT,
  }
}

/// Everything needed to address one target's light curve.
///
/// `author` is only meaningful for TESS (SPOC vs. QLP products); for the
/// other missions it is carried but ignored by convention, so nothing here
/// enforces the pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
  pub target: String,
  pub mission: Mission,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  pub window_length: u32,
}

impl Query {
  pub fn new(target: impl Into<String>, mission: Mission) -> Self {
    Self { target: target.into(), mission, author: None, window_length: WINDOW_DEFAULT }
  }

  /// Set the author, treating blank input as "no author".
  pub fn set_author(&mut self, author: &str) {
    let trimmed = author.trim();
    self.author = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
  }

  /// Author to send, if any. Blank strings count as absent so the query
  /// parameter is omitted entirely rather than sent empty.
  pub fn author(&self) -> Option<&str> {
    self.author.as_deref().filter(|a| !a.trim().is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mission_round_trips_through_wire_names() {
    for mission in Mission::ALL {
      assert_eq!(mission.as_str().parse::<Mission>().unwrap(), mission);
    }
    assert_eq!("tess".parse::<Mission>().unwrap(), Mission::Tess);
    assert!("hubble".parse::<Mission>().is_err());
  }

  #[test]
  fn mission_serializes_as_wire_name() {
    assert_eq!(serde_json::to_string(&Mission::Tess).unwrap(), "\"TESS\"");
    assert_eq!(serde_json::from_str::<Mission>("\"K2\"").unwrap(), Mission::K2);
  }

  #[test]
  fn window_length_is_clamped_to_range() {
    assert_eq!(parse_window_length("401"), 401);
    assert_eq!(parse_window_length("51"), 51);
    assert_eq!(parse_window_length("5001"), 5001);
    assert_eq!(parse_window_length("10"), 51);
    assert_eq!(parse_window_length("-3"), 51);
    assert_eq!(parse_window_length("999999"), 5001);
  }

  #[test]
  fn malformed_window_length_falls_back_to_default() {
    assert_eq!(parse_window_length(""), WINDOW_DEFAULT);
    assert_eq!(parse_window_length("abc"), WINDOW_DEFAULT);
    assert_eq!(parse_window_length("4.01e2"), WINDOW_DEFAULT);
  }

  #[test]
  fn blank_author_counts_as_absent() {
    let mut query = Query::new("Kepler-10", Mission::Kepler);
    assert_eq!(query.author(), None);

    query.set_author("  ");
    assert_eq!(query.author(), None);

    query.set_author("SPOC");
    assert_eq!(query.author(), Some("SPOC"));

    query.set_author("");
    assert_eq!(query.author(), None);
  }
}
