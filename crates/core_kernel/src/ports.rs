//! Shared port plumbing
//!
//! Each domain crate declares its own port traits (`PricingPort`,
//! `ClaimPort`, `GeocodingPort`, `OrderRecordPort`) on top of [`DomainPort`]
//! and reports failures as [`PortError`]. `infra_yandex` supplies the HTTP
//! adapters; the in-memory ones sit behind each crate's `mock` feature.

use thiserror::Error;

/// Failure of a single call through a port
///
/// Workflows use it to tell a transport problem (skip and move on) from a
/// structured refusal by the provider (report the message).
#[derive(Debug, Error)]
pub enum PortError {
    /// The request was rejected before it was sent
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// The external system answered with a structured error payload
    /// or a non-success status
    #[error("Provider error (status {status:?}, code {code:?}): {message}")]
    Provider {
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// A data transformation error occurred
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Provider error
    pub fn provider(status: Option<u16>, code: Option<String>, message: impl Into<String>) -> Self {
        PortError::Provider {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Connection loss, timeouts and 503s
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if the provider itself refused the request
    pub fn is_provider(&self) -> bool {
        matches!(self, PortError::Provider { .. } | PortError::Unauthorized { .. })
    }

    /// The message to show a human, verbatim from the provider when there is one
    pub fn display_message(&self) -> String {
        match self {
            PortError::Provider { message, .. } | PortError::Unauthorized { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Supertrait of every port, so adapters can sit behind `Arc<dyn _>`
pub trait DomainPort: Send + Sync + 'static {}
