//! Exodeck - terminal dashboard for exoplanet transit vetting.
//!
//! Three views over an external model-serving backend: a backend-rendered
//! plot, an interactive chart of the light-curve arrays, and a prediction
//! panel. The [`controller`] module owns all of the sequencing and
//! failure-handling logic; everything else is presentation.

pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod tui;
