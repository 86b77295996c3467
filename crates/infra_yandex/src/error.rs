//! Adapter errors
//!
//! [`YandexError`] covers client construction. Once a client exists every
//! call reports through `PortError`; the mapping from `reqwest` and from the
//! provider's `{code, message}` bodies lives here.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use core_kernel::PortError;

/// Errors building an adapter
#[derive(Debug, Error)]
pub enum YandexError {
    /// A configured base URL does not parse
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The OAuth token cannot be sent as a header value
    #[error("OAuth token is not a valid header value")]
    InvalidToken,

    /// A configured header value cannot be sent
    #[error("Invalid {header} header value '{value}'")]
    InvalidHeader { header: &'static str, value: String },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Maps a failed send or body read onto the port error
///
/// The request URL is dropped first: the geocoder carries its API key in the
/// query string.
pub(crate) fn transport_error(operation: &str, timeout: Duration, err: reqwest::Error) -> PortError {
    let err = err.without_url();
    if err.is_timeout() {
        PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout.as_millis() as u64,
        }
    } else if err.is_connect() {
        PortError::Connection {
            message: format!("{operation}: {err}"),
            source: Some(Box::new(err)),
        }
    } else if err.is_decode() {
        PortError::transformation(format!("{operation}: {err}"))
    } else {
        PortError::Internal {
            message: format!("{operation}: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

/// Maps a non-success status and its body onto the port error
///
/// The provider's `message` is kept verbatim when the body carries one.
pub(crate) fn status_error(status: StatusCode, body: &str) -> PortError {
    let payload = serde_json::from_str::<Value>(body).ok();
    let (code, message) = payload
        .as_ref()
        .and_then(error_fields)
        .unwrap_or((None, None));
    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized { message },
        StatusCode::SERVICE_UNAVAILABLE => PortError::ServiceUnavailable { service: message },
        _ => PortError::provider(Some(status.as_u16()), code, message),
    }
}

/// `{code, message}` from an error body, when either is present
pub(crate) fn error_fields(body: &Value) -> Option<(Option<String>, Option<String>)> {
    let object = body.as_object()?;
    if !object.contains_key("code") && !object.contains_key("message") {
        return None;
    }
    let code = object.get("code").and_then(scalar_text);
    let message = object.get("message").and_then(scalar_text);
    Some((code, message))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
