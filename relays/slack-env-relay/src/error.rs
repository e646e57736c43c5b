//! Error types that cross module boundaries.

use crate::publish::PublishError;

/// Rejected startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A `--region` value that is not `LABEL=BASE_URL=KEY_NAME`.
    #[error("invalid region '{value}': {reason}")]
    InvalidRegion { value: String, reason: &'static str },
}

/// Failure anywhere in the slash-command pipeline.
///
/// Only the server's error boundary sees these; the user gets a generic reply.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to publish Slack message")]
    Publish(#[from] PublishError),
}
