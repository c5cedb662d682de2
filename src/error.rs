//! Error types for the notification pipeline.

use std::time::Duration;
use thiserror::Error;

/// A single strategy that failed during a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    /// Name of the strategy, as reported by `DeliveryStrategy::name`.
    pub strategy: String,
    /// Rendered error message.
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("no notification has been published yet")]
    NoCurrentNotification,

    #[error("observer '{observer}' failed: {reason}")]
    Observer { observer: String, reason: String },

    #[error("{failed} of {attempted} delivery strategies failed")]
    Delivery {
        failed: usize,
        attempted: usize,
        failures: Vec<StrategyFailure>,
    },

    #[error("delivery via '{strategy}' timed out after {timeout:?}")]
    Timeout { strategy: String, timeout: Duration },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for NotifierError {
    fn from(err: figment::Error) -> Self {
        NotifierError::Config(Box::new(err))
    }
}
