//! Slack Env Relay - Partner Environment Lookup
//!
//! Receives a Slack slash command, searches every configured partner region for
//! environments whose name contains the command text, and posts a message with one
//! "Get Logs" button per deployment to a Slack channel through an incoming webhook.
//! The invoking user only ever sees an ephemeral acknowledgment.
//!
//! Every outbound call for one command is made sequentially; nothing is cached,
//! retried or persisted between commands.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod publish;
pub mod server;
pub mod slack;

pub use config::{Args, Region, RegionSpec, RelayConfig};
pub use error::{ConfigError, RelayError};
pub use server::{AppState, router, serve};
