//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the domain only commits to a stable code, a human-readable
//! message, and optional structured details.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
///
/// Codes serialise in SCREAMING_SNAKE_CASE because staff scanning clients
/// branch on the `code` field of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    ValidationError,
    /// Authenticated but not permitted to act on this reservation.
    Forbidden,
    /// The scanned verification code does not exist.
    CodeNotFound,
    /// The addressed reservation does not exist.
    ReservationNotFound,
    /// The addressed photo attachment does not exist.
    PhotoNotFound,
    /// The addressed stage cannot carry this operation.
    CodeStageMismatch,
    /// The reservation's stored stage no longer matches the scanned code,
    /// either because the code is stale or a concurrent confirm won the race.
    StatusNotMatch,
    /// The reservation has already reached the terminal stage.
    AlreadyDone,
    /// The current stage's checklist gate does not hold.
    ChecklistNotReady,
    /// Completion requires at least one attached photo.
    PhotoRequired,
    /// Completion requires every checklist item to be checked.
    ChecklistIncomplete,
    /// The per-stage photo attachment limit has been reached.
    PhotoLimit,
    /// The uploaded payload is not an allowed image type.
    UnsupportedType,
    /// The uploaded payload exceeds the byte-size ceiling.
    FileTooLarge,
    /// An unexpected error occurred inside the domain.
    InternalError,
    /// A backing store is unavailable.
    ServiceUnavailable,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use gearpass::domain::{Error, ErrorCode};
///
/// let err = Error::code_not_found("no such code");
/// assert_eq!(err.code(), ErrorCode::CodeNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "CODE_NOT_FOUND")]
    code: ErrorCode,
    #[schema(example = "verification code is not recognised")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty after trimming.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// # Panics
    /// Panics when `message` is empty after trimming; call sites pass
    /// literal, non-empty messages.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use gearpass::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation("bad stage").with_details(json!({ "field": "stage" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::CodeNotFound`].
    pub fn code_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CodeNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ReservationNotFound`].
    pub fn reservation_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReservationNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::PhotoNotFound`].
    pub fn photo_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PhotoNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::CodeStageMismatch`].
    pub fn code_stage_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CodeStageMismatch, message)
    }

    /// Convenience constructor for [`ErrorCode::StatusNotMatch`].
    pub fn status_not_match(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StatusNotMatch, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyDone`].
    pub fn already_done(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyDone, message)
    }

    /// Convenience constructor for [`ErrorCode::ChecklistNotReady`].
    pub fn checklist_not_ready(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ChecklistNotReady, message)
    }

    /// Convenience constructor for [`ErrorCode::PhotoRequired`].
    pub fn photo_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PhotoRequired, message)
    }

    /// Convenience constructor for [`ErrorCode::ChecklistIncomplete`].
    pub fn checklist_incomplete(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ChecklistIncomplete, message)
    }

    /// Convenience constructor for [`ErrorCode::PhotoLimit`].
    pub fn photo_limit(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PhotoLimit, message)
    }

    /// Convenience constructor for [`ErrorCode::UnsupportedType`].
    pub fn unsupported_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedType, message)
    }

    /// Convenience constructor for [`ErrorCode::FileTooLarge`].
    pub fn file_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FileTooLarge, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Self::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
