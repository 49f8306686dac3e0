//! Proxy selection error types

use thiserror::Error;

/// PAC policy logic raised during evaluation
///
/// Carries the offending policy text so it can be logged at the
/// fail-open boundary; never propagated to `select` callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("PAC evaluation failed: {message}")]
pub struct EvaluationError {
    /// The policy text that was being evaluated
    pub script: String,
    /// What the evaluation backend reported
    pub message: String,
}

impl EvaluationError {
    pub fn new(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            message: message.into(),
        }
    }
}

/// Error taxonomy of the selection core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Policy logic raised during evaluation; recovered locally
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Evaluation engine failed to construct; selector degrades permanently
    #[error("PAC engine initialization failed: {0}")]
    Initialization(String),

    /// A directive's address token has a non-numeric port suffix
    #[error("malformed port in proxy address {token:?}")]
    MalformedPort { token: String },

    /// Diagnostic cause handed to `connect_failed` by callers
    #[error("connection failed: {0}")]
    Connect(String),
}

impl ProxyError {
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }

    pub fn malformed_port(token: impl Into<String>) -> Self {
        Self::MalformedPort {
            token: token.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }
}
