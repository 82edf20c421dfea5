//! Error taxonomy for the query layer.
//!
//! | Category      | Variant                     | Caller sees            |
//! |---------------|-----------------------------|------------------------|
//! | Field         | `QueryError::Validation`    | field + reason (400)   |
//! | Configuration | `QueryError::Configuration` | opaque server error    |
//! | Upstream      | `QueryError::Upstream`      | opaque server error    |
//! | Internal      | `QueryError::Internal`      | opaque server error    |
//!
//! An enrichment miss is not an error and has no variant.

use serde::Serialize;
use std::fmt;

/// HTTP-style status codes carried by [`Problem`].
pub mod status {
    pub const BAD_REQUEST: u16 = 400;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Raw field name as it appears in the query string.
    pub field: String,
    /// Name of the rule that rejected it.
    pub rule: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field failures in declaration order, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The error surfaced to the caller: first invalid field in declaration order.
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(first) => write!(f, "invalid field {}", first),
            None => f.write_str("no validation errors"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Programming or deployment mistakes. Never caused by request input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// A shape references a rule that was never registered.
    #[error("field {field:?} references unregistered rule {rule:?}")]
    UnknownRule { field: String, rule: String },

    /// A shape declares a field it cannot read back.
    #[error("shape declares unknown field {0:?}")]
    UnknownField(String),

    /// The same rule name was registered twice.
    #[error("rule {0:?} registered twice")]
    DuplicateRule(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failures reported by outbound ports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("storage request timed out")]
    Timeout,
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Caller input failed a named rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Registry or shape misconfiguration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Storage or live ledger state failed.
    #[error("{stage} failed: {source}")]
    Upstream {
        stage: &'static str,
        #[source]
        source: StorageError,
    },

    /// A value that passed validation could not be converted.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QueryError {
    pub fn upstream(stage: &'static str, source: StorageError) -> Self {
        QueryError::Upstream { stage, source }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        QueryError::Internal(details.into())
    }

    /// Only field failures are the caller's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::Validation(_))
    }
}

/// Extra members of a bad-request problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemExtras {
    pub invalid_field: String,
    pub reason: String,
}

/// Client-facing error payload.
///
/// Server-side failures carry no detail about which stage failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<ProblemExtras>,
}

impl From<&QueryError> for Problem {
    fn from(err: &QueryError) -> Self {
        match err {
            QueryError::Validation(validation) => {
                let extras = validation.first().map(|first| ProblemExtras {
                    invalid_field: first.field.clone(),
                    reason: first.message.clone(),
                });
                Problem {
                    kind: "bad_request".to_string(),
                    title: "Bad Request".to_string(),
                    status: status::BAD_REQUEST,
                    detail: "The request you sent was invalid in some way.".to_string(),
                    extras,
                }
            }
            _ => Problem {
                kind: "server_error".to_string(),
                title: "Internal Server Error".to_string(),
                status: status::INTERNAL_SERVER_ERROR,
                detail: "An error occurred while processing this request.".to_string(),
                extras: None,
            },
        }
    }
}

/// Result type for query-layer operations.
pub type QueryResult<T> = Result<T, QueryError>;
