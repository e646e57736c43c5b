//! Slack Env Relay binary.
//!
//! # Usage
//!
//! ```bash
//! # Built-in regions; credentials come from us_east1_key / eu_west12_key
//! SLACK_WEBHOOK_URL=https://hooks.slack.com/services/... slack-env-relay
//!
//! # Custom region table and outbound timeout
//! slack-env-relay --region lab=http://localhost:9000/api=lab_key --timeout 10
//! ```

use anyhow::Context;
use clap::Parser;
use slack_env_relay::{AppState, Args, serve};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("slack_env_relay=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = args.relay_config(|key| std::env::var(key).ok());

    for region in &config.regions {
        if region.credential.is_none() {
            tracing::warn!(region = %region.label, key = %region.key_name, "region credential not set, it will be skipped");
        }
    }
    if config.webhook_url.is_none() {
        tracing::warn!("SLACK_WEBHOOK_URL is not set, matching commands will fail");
    }

    let mut http = reqwest::Client::builder();
    if let Some(secs) = args.timeout {
        http = http.timeout(Duration::from_secs(secs));
    }
    let http = http.build().context("failed to build HTTP client")?;

    let state = Arc::new(AppState::new(config, http));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, regions = state.config.regions.len(), "slack-env-relay listening");
    serve(listener, state).await?;

    Ok(())
}
