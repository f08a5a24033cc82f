//! Error types for web handlers.
//!
//! [`AppError`] bridges [`TicketError`] and HTTP responses. Client mistakes
//! keep their message; integrity and storage failures are logged with their
//! source and answered with a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatepass_core::TicketError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```
/// use axum::http::StatusCode;
/// use gatepass_core::TicketError;
/// use gatepass_web::AppError;
///
/// let err = AppError::from(TicketError::AlreadyRegistered);
/// assert_eq!(err.status(), StatusCode::CONFLICT);
/// assert_eq!(err.code(), "ALREADY_REGISTERED");
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Map engine errors to statuses by kind.
impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        let status = match &err {
            TicketError::UserNotFound { .. } | TicketError::TicketNotFound => {
                StatusCode::NOT_FOUND
            }
            TicketError::AlreadyRegistered
            | TicketError::UsernameTaken
            | TicketError::InvalidStatus { .. } => StatusCode::CONFLICT,
            TicketError::InvalidCode => StatusCode::UNAUTHORIZED,
            TicketError::InvalidTicketDetails { .. }
            | TicketError::NotRegistered
            | TicketError::InvalidUserDetails { .. } => StatusCode::BAD_REQUEST,
            TicketError::RegistrationFailed { .. }
            | TicketError::TicketMissingId
            | TicketError::MissingSeed
            | TicketError::InvalidSeed
            | TicketError::AttendanceUpdateFailed { .. }
            | TicketError::UserCreationFailed { .. } => {
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    err.kind().to_string(),
                )
                .with_source(anyhow::Error::new(err));
            }
        };
        Self::new(status, err.to_string(), err.kind().to_string())
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatepass_core::TicketStatus;

    #[test]
    fn test_error_display() {
        let err = AppError::from(TicketError::TicketNotFound);
        assert_eq!(err.to_string(), "[TICKET_NOT_FOUND] Ticket does not exist");
    }

    #[test]
    fn user_errors_keep_their_message() {
        let err = AppError::from(TicketError::UserNotFound {
            username: "ghost".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User ghost does not exist");
        assert!(err.source.is_none());
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (TicketError::AlreadyRegistered, StatusCode::CONFLICT),
            (TicketError::UsernameTaken, StatusCode::CONFLICT),
            (
                TicketError::InvalidStatus {
                    status: TicketStatus::Used,
                },
                StatusCode::CONFLICT,
            ),
            (TicketError::InvalidCode, StatusCode::UNAUTHORIZED),
            (TicketError::NotRegistered, StatusCode::BAD_REQUEST),
            (
                TicketError::InvalidTicketDetails {
                    reason: "bad gate".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (TicketError::MissingSeed, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err.clone()).status(), status, "{err:?}");
        }
    }

    #[test]
    fn internal_failures_hide_details() {
        let err = AppError::from(TicketError::RegistrationFailed {
            reason: "Database error: connection reset".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "REGISTRATION_FAILED");
        assert!(!err.message.contains("connection reset"));
        assert!(err.source.is_some());
    }
}
