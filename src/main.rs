//! Spacey Science · Content Backend
//!
//! - Axum HTTP API for AI-generated space quizzes and lessons
//! - Pluggable generative model (OpenAI-compatible or Anthropic, via environment variables)
//! - Static fallback content whenever the model is missing or misbehaves
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   MODEL_PROVIDER      : "openai" or "anthropic" (default: whichever key is set)
//!   OPENAI_API_KEY      : enables the OpenAI provider
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_MODEL        : default "gpt-4o-mini"
//!   ANTHROPIC_API_KEY   : enables the Anthropic provider
//!   ANTHROPIC_BASE_URL  : default "https://api.anthropic.com/v1"
//!   ANTHROPIC_MODEL     : default "claude-sonnet-4-20250514"
//!   MODEL_TIMEOUT_SECS  : model HTTP client timeout (default 30)
//!   CONTENT_CONFIG_PATH : path to TOML config (prompt templates + generation settings)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod anthropic;
mod config;
mod domain;
mod error;
mod extract;
mod generator;
mod model;
mod openai;
mod protocol;
mod routes;
mod seeds;
mod state;
mod telemetry;
mod topics;
mod util;
mod validate;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (content generator, in-memory quiz store).
  let state = Arc::new(AppState::from_env());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "spacey_science", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "spacey_science", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "spacey_science", "Shutdown signal received");
}
