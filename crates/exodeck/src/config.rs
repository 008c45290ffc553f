//! Backend connection options, shared by every subcommand.

use anyhow::{bail, Result};
use clap::Args;
use exo_api::{BackendClient, ClientConfig, EndpointStyle};

#[derive(Debug, Clone, Args)]
pub struct BackendOptions {
  /// Base URL of the model-serving backend
  #[arg(long, global = true, env = "EXODECK_BASE_URL", default_value = "http://127.0.0.1:8000")]
  pub base_url: String,

  /// Request timeout in seconds
  #[arg(long, global = true, env = "EXODECK_TIMEOUT_SECS", default_value_t = 30)]
  pub timeout_secs: u64,

  /// Endpoint style the backend speaks: "mock" or "production"
  #[arg(long, global = true, env = "EXODECK_ENDPOINTS", default_value = "mock")]
  pub endpoints: String,
}

impl BackendOptions {
  pub fn endpoint_style(&self) -> Result<EndpointStyle> {
    match self.endpoints.to_ascii_lowercase().as_str() {
      "mock" => Ok(EndpointStyle::Mock),
      "production" => Ok(EndpointStyle::Production),
      other => bail!("unknown endpoint style '{other}' (expected mock or production)"),
    }
  }

  pub fn client(&self) -> Result<BackendClient> {
    Ok(BackendClient::with_config(ClientConfig {
      base_url: self.base_url.clone(),
      timeout_secs: self.timeout_secs,
      endpoints: self.endpoint_style()?,
    }))
  }
}
