//! Verification codes scanned by staff to authorise stage transitions.
//!
//! A code is a 6-digit numeric token bound to exactly one
//! (reservation, stage) pair. Uniqueness across the whole population is a
//! storage invariant; this module only guarantees shape and uniform draws.

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of decimal digits in a verification code.
pub const CODE_LENGTH: usize = 6;

const CODE_SPACE: u32 = 1_000_000;

/// A validated 6-digit numeric verification code.
///
/// # Examples
/// ```
/// use gearpass::domain::VerificationCode;
///
/// let code = VerificationCode::parse(" 042137 ").expect("valid code");
/// assert_eq!(code.as_str(), "042137");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "042137")]
pub struct VerificationCode(String);

/// Validation errors returned when constructing [`VerificationCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeValidationError {
    /// Input was empty after trimming whitespace.
    #[error("verification code must not be empty")]
    Empty,
    /// Input was not exactly six ASCII digits.
    #[error("verification code must be exactly {CODE_LENGTH} digits")]
    Malformed,
}

impl VerificationCode {
    /// Parse a scanned code, stripping surrounding whitespace.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CodeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CodeValidationError::Empty);
        }
        if trimmed.len() != CODE_LENGTH || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeValidationError::Malformed);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Draw a code uniformly at random from the full 6-digit space.
    ///
    /// Collision with an already-issued code is possible and must be
    /// handled at persistence time; see `CodeIssuer`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("{:06}", rng.gen_range(0..CODE_SPACE)))
    }

    /// Borrow the code digits as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for VerificationCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for VerificationCode {
    type Error = CodeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<VerificationCode> for String {
    fn from(value: VerificationCode) -> Self {
        value.0
    }
}
