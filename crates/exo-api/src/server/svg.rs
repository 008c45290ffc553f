//! Hand-emitted SVG rendering of the two-panel light-curve figure.
//!
//! Mirrors the original figure: raw flux on top, flattened flux below with
//! a dashed unity line. SVG keeps the plot endpoints dependency-free while
//! still returning image bytes an `<img>` tag consumes directly.

const WIDTH: f64 = 900.0;
const PANEL_HEIGHT: f64 = 190.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const PANEL_GAP: f64 = 40.0;

struct Panel {
  top: f64,
}

impl Panel {
  fn x(&self, t: f64, t_min: f64, t_max: f64) -> f64 {
    let span = (t_max - t_min).max(f64::EPSILON);
    MARGIN_LEFT + (t - t_min) / span * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
  }

  fn y(&self, v: f64, v_min: f64, v_max: f64) -> f64 {
    let span = (v_max - v_min).max(f64::EPSILON);
    self.top + PANEL_HEIGHT - (v - v_min) / span * PANEL_HEIGHT
  }

  fn polyline(&self, time: &[f64], values: &[f64], color: &str) -> String {
    if time.is_empty() || values.is_empty() {
      return String::new();
    }
    let (t_min, t_max) = bounds(time);
    let (v_min, v_max) = padded_bounds(values);

    let mut points = String::new();
    for (t, v) in time.iter().zip(values) {
      let x = self.x(*t, t_min, t_max);
      let y = self.y(*v, v_min, v_max);
      points.push_str(&format!("{x:.1},{y:.1} "));
    }
    format!("<polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"0.8\" points=\"{}\"/>\n", points.trim_end())
  }
}

fn bounds(values: &[f64]) -> (f64, f64) {
  let min = values.iter().cloned().fold(f64::MAX, f64::min);
  let max = values.iter().cloned().fold(f64::MIN, f64::max);
  (min, max)
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
  let (min, max) = bounds(values);
  let pad = ((max - min) * 0.05).max(1e-9);
  (min - pad, max + pad)
}

/// Render the raw and flattened series as a standalone SVG document.
pub fn render_light_curve(time: &[f64], flux: &[f64], flat_flux: &[f64], title: &str) -> String {
  let total_height = MARGIN_TOP + 2.0 * PANEL_HEIGHT + PANEL_GAP + 30.0;
  let raw = Panel { top: MARGIN_TOP };
  let flat = Panel { top: MARGIN_TOP + PANEL_HEIGHT + PANEL_GAP };

  let mut svg = String::new();
  svg.push_str(&format!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{total_height}\" viewBox=\"0 0 {WIDTH} {total_height}\">\n"
  ));
  svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
  svg.push_str(&format!(
    "<text x=\"{MARGIN_LEFT}\" y=\"20\" font-family=\"sans-serif\" font-size=\"14\">{} (raw)</text>\n",
    escape(title)
  ));
  svg.push_str(&raw.polyline(time, flux, "#1f77b4"));

  svg.push_str(&format!(
    "<text x=\"{MARGIN_LEFT}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"14\">Flux (flat)</text>\n",
    flat.top - 10.0
  ));
  if !flat_flux.is_empty() {
    let (v_min, v_max) = padded_bounds(flat_flux);
    let unity = flat.y(1.0, v_min, v_max);
    svg.push_str(&format!(
      "<line x1=\"{MARGIN_LEFT}\" y1=\"{unity:.1}\" x2=\"{:.1}\" y2=\"{unity:.1}\" stroke=\"gray\" stroke-width=\"0.7\" stroke-dasharray=\"4 3\"/>\n",
      WIDTH - MARGIN_RIGHT
    ));
  }
  svg.push_str(&flat.polyline(time, flat_flux, "#2ca02c"));

  svg.push_str(&format!(
    "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"12\" fill=\"gray\">Time [days]</text>\n",
    WIDTH / 2.0 - 30.0,
    total_height - 8.0
  ));
  svg.push_str("</svg>\n");
  svg
}

fn escape(text: &str) -> String {
  text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_a_wellformed_document() {
    let time: Vec<f64> = (0..100).map(|i| i as f64 * 0.02).collect();
    let flux: Vec<f64> = time.iter().map(|t| 1.0 + 0.001 * t.sin()).collect();
    let flat = vec![1.0; 100];

    let svg = render_light_curve(&time, &flux, &flat, "Kepler-10 <test>");
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<polyline").count(), 2);
    assert!(svg.contains("&lt;test&gt;"));
    assert!(svg.contains("stroke-dasharray"));
  }

  #[test]
  fn empty_series_still_renders() {
    let svg = render_light_curve(&[], &[], &[], "empty");
    assert!(svg.contains("</svg>"));
    assert_eq!(svg.matches("<polyline").count(), 0);
  }
}
