//! Error types shared across the TopicFlow builder.

use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum TopicFlowError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
