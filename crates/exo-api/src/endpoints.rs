//! Deterministic path construction for the two endpoint styles.
//!
//! The mock backend exposes fixture routes (`/api/plot-test`,
//! `/api/lc-test`) that ignore the target; the production service addresses
//! the target in the path. Both styles build the same way from a [`Query`]
//! and are pure string functions, so the derived plot URL can be displayed
//! and compared without any I/O.

use url::form_urlencoded;

use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointStyle {
  /// Fixture routes served by `exo-mockd`.
  #[default]
  Mock,
  /// Target-addressed routes of the real service.
  Production,
}

impl EndpointStyle {
  /// Path and query string for the rendered-plot image.
  ///
  /// The mock route encodes only the window length and optional author (the
  /// fixture has no notion of a target); the production route adds the
  /// mission. An absent author omits the parameter entirely.
  pub fn plot_path(&self, query: &Query) -> String {
    match self {
      EndpointStyle::Mock => {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("window_length", &query.window_length.to_string());
        if let Some(author) = query.author() {
          params.append_pair("author", author);
        }
        format!("/api/plot-test?{}", params.finish())
      }
      EndpointStyle::Production => {
        format!("/api/plot/{}?{}", query.target, common_params(query))
      }
    }
  }

  /// Path and query string for the light-curve JSON.
  pub fn lc_path(&self, query: &Query) -> String {
    match self {
      EndpointStyle::Mock => format!("/api/lc-test?{}", common_params(query)),
      EndpointStyle::Production => format!("/api/lc/{}?{}", query.target, common_params(query)),
    }
  }

  /// Path for the prediction endpoint (same in both styles).
  pub fn predict_path(&self) -> &'static str {
    "/api/predict"
  }
}

fn common_params(query: &Query) -> String {
  let mut params = form_urlencoded::Serializer::new(String::new());
  params.append_pair("mission", query.mission.as_str());
  params.append_pair("window_length", &query.window_length.to_string());
  if let Some(author) = query.author() {
    params.append_pair("author", author);
  }
  params.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::query::Mission;

  #[test]
  fn mock_plot_path_matches_contract_example() {
    let mut query = Query::new("Kepler-10", Mission::Kepler);
    query.window_length = 401;
    query.set_author("");
    assert_eq!(EndpointStyle::Mock.plot_path(&query), "/api/plot-test?window_length=401");
  }

  #[test]
  fn plot_path_is_deterministic() {
    let mut query = Query::new("TIC 307210830", Mission::Tess);
    query.set_author("QLP");
    let first = EndpointStyle::Mock.plot_path(&query);
    let second = EndpointStyle::Mock.plot_path(&query);
    assert_eq!(first, second);
    assert_eq!(first, "/api/plot-test?window_length=401&author=QLP");
  }

  #[test]
  fn absent_author_omits_the_parameter() {
    let query = Query::new("K2-18", Mission::K2);
    let path = EndpointStyle::Mock.lc_path(&query);
    assert!(!path.contains("author"));
    assert_eq!(path, "/api/lc-test?mission=K2&window_length=401");
  }

  #[test]
  fn production_paths_address_the_target() {
    let mut query = Query::new("Kepler-10", Mission::Kepler);
    query.window_length = 801;
    assert_eq!(
      EndpointStyle::Production.lc_path(&query),
      "/api/lc/Kepler-10?mission=Kepler&window_length=801"
    );
    assert_eq!(
      EndpointStyle::Production.plot_path(&query),
      "/api/plot/Kepler-10?mission=Kepler&window_length=801"
    );
  }
}
