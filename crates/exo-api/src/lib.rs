//! HTTP contract for the exodeck transit dashboard.
//!
//! Everything the dashboard knows about the model-serving backend lives in
//! this crate: the query model, the wire types, deterministic URL
//! construction for both endpoint styles, a thin reqwest client that
//! surfaces backend error text verbatim, and the client-side prediction
//! fixture used before the scoring endpoint exists.
//!
//! With the `mock-server` feature (on by default) the crate also ships
//! `exo-mockd`, an axum backend serving the same contract against synthetic
//! light curves, so the whole dashboard runs without the real service.

pub mod client;
pub mod endpoints;
pub mod mock;
pub mod query;
pub mod types;

#[cfg(feature = "mock-server")]
pub mod server;
#[cfg(feature = "mock-server")]
pub mod synth;

pub use client::{BackendClient, ClientConfig, ClientError};
pub use endpoints::EndpointStyle;
pub use query::{Mission, Query};
pub use types::{Decision, LightCurve, PredictRequest, PredictionResult, TopFeature};
