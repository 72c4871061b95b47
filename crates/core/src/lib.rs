//! Shared primitives for all Rust crates in the ECR image audit.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across audit crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty, trimmed UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string with surrounding whitespace removed.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced cluster, service, image or repository does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The cloud API could not be reached, rejected the call, or timed out.
    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// Image string lacks the `repository:tag` shape.
    #[error("malformed image reference '{0}'")]
    MalformedImageRef(String),

    /// A lookup needed to classify an image failed.
    #[error("lookup failed for {subject}: {source}")]
    LookupFailure {
        /// What was being looked up, e.g. the image reference.
        subject: String,
        /// Underlying gateway error.
        #[source]
        source: Box<AppError>,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a gateway error as a lookup failure for `subject`.
    ///
    /// Errors that already are lookup failures are returned unchanged.
    #[must_use]
    pub fn lookup_failure(subject: impl Into<String>, error: AppError) -> Self {
        match error {
            already @ Self::LookupFailure { .. } => already,
            other => Self::LookupFailure {
                subject: subject.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error behind any lookup-failure wrapping.
    #[must_use]
    pub fn root_cause(&self) -> &AppError {
        match self {
            Self::LookupFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
