use std::fmt;
use thiserror::Error;

/// Failures at the HTTP client boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable, connection refused, timeout, TLS, …
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("request to {path} failed with HTTP {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },
    /// Body was not valid JSON.
    #[error("could not decode response from {path}: {reason}")]
    Decode { path: String, reason: String },
    /// JSON arrived but not in the expected shape (e.g. no `data` envelope).
    #[error("unexpected response shape from {path}: {reason}")]
    Format { path: String, reason: String },
}

impl ApiError {
    pub fn path(&self) -> &str {
        match self {
            ApiError::Transport { path, .. }
            | ApiError::Status { path, .. }
            | ApiError::Decode { path, .. }
            | ApiError::Format { path, .. } => path,
        }
    }

    /// Timeouts are transport failures; this only tells them apart for logging.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { source, .. } if source.is_timeout())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, ApiError::Format { .. } | ApiError::Decode { .. })
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Client-side form validation failure, one entry per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid form: {}", join_fields(.errors))]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl FormError {
    /// Message for `field`, if that field failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
