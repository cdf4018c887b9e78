//! Error types and the aggregated validation error format.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for validator operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by the validator.
///
/// Only [`Error::Validation`] means the data was rejected; the other two
/// variants are programming errors.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Custom tag installation failed while building the validator
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A rule expression could not be evaluated
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
    /// One or more rules rejected the target
    #[error(transparent)]
    Validation(#[from] AggregatedError),
}

impl Error {
    /// Returns true if this is a data validation rejection.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Get the aggregated failures, if this is a validation rejection.
    pub fn as_validation(&self) -> Option<&AggregatedError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while installing custom rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("tag '{0}' is already registered")]
    DuplicateTag(String),
    #[error("invalid tag name '{0}': tag names must be non-empty identifiers")]
    InvalidTagName(String),
    #[error("tag name '{0}' is reserved")]
    ReservedTagName(String),
    #[error("custom tag '{0}' has no predicate")]
    MissingPredicate(String),
    #[error("custom tag '{0}' has an empty error template")]
    MissingTemplate(String),
}

/// The translation context rejected a template.
///
/// Not fatal: the rule stays active and rendering falls back to the
/// generic description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateBindError {
    #[error("template for '{key}' has an unbalanced brace at byte {position}")]
    UnbalancedBrace { key: String, position: usize },
    #[error("template for '{key}' uses unknown placeholder '{{{placeholder}}}'")]
    UnknownPlaceholder { key: String, placeholder: String },
    #[error("a template for '{0}' already exists")]
    AlreadyBound(String),
}

/// A rule expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    #[error("field '{field}': undefined validation tag '{tag}'")]
    UnknownTag { field: String, tag: String },
    #[error("field '{field}': malformed rule expression '{expression}'")]
    Syntax { field: String, expression: String },
    #[error("field '{field}': tag '{tag}' cannot use parameter '{param}'")]
    BadParam {
        field: String,
        tag: String,
        param: String,
    },
}

/// Whether a failed rule is one of the engine's own tags or a custom one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    BuiltIn,
    Custom,
}

/// A single failed rule as reported by the engine, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Field name (nested fields are dotted: "address.city")
    pub field: String,
    /// Failing tag name
    pub tag: String,
    /// Tag parameter, empty when the tag has none
    pub param: String,
    pub kind: RuleKind,
}

impl FieldFailure {
    /// Create a new field failure.
    pub fn new(
        field: impl Into<String>,
        tag: impl Into<String>,
        param: impl Into<String>,
        kind: RuleKind,
    ) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            param: param.into(),
            kind,
        }
    }
}

/// A rendered failure, one entry of an [`AggregatedError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// The field name that failed validation
    pub field: String,
    /// The failing tag (e.g., "required", "email", "inn")
    pub tag: String,
    /// Tag parameter, omitted when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub param: String,
    pub kind: RuleKind,
    /// Human-readable error message
    pub message: String,
}

impl FailureRecord {
    /// Attach a rendered message to an engine failure.
    pub fn new(failure: FieldFailure, message: impl Into<String>) -> Self {
        Self {
            field: failure.field,
            tag: failure.tag,
            param: failure.param,
            kind: failure.kind,
            message: message.into(),
        }
    }
}

/// Internal error structure for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    fields: Vec<FailureRecord>,
}

/// Wrapper for the error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

/// Every rule violation of one validation call, rendered and in engine order.
///
/// The textual form joins the rendered messages with the configured
/// separator. Serializes to:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "Validation failed",
///     "fields": [...]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedError {
    failures: Vec<FailureRecord>,
    separator: String,
}

impl AggregatedError {
    /// Default separator between rendered messages.
    pub const DEFAULT_SEPARATOR: &'static str = "\n";

    /// Build an aggregated error, or `None` when there is nothing to report.
    pub fn from_failures(
        failures: Vec<FailureRecord>,
        separator: impl Into<String>,
    ) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self {
                failures,
                separator: separator.into(),
            })
        }
    }

    /// All rendered failures, in the order the engine reported them.
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Iterate over the rendered failures.
    pub fn iter(&self) -> std::slice::Iter<'_, FailureRecord> {
        self.failures.iter()
    }

    /// Number of failures. Never zero.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures reported for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FailureRecord> + 'a {
        self.failures.iter().filter(move |f| f.field == field)
    }

    /// Rendered messages in order.
    pub fn messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message.as_str()).collect()
    }

    /// Consume the error and return its records.
    pub fn into_failures(self) -> Vec<FailureRecord> {
        self.failures
    }
}

impl fmt::Display for AggregatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str(&self.separator)?;
            }
            f.write_str(&failure.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedError {}

impl<'a> IntoIterator for &'a AggregatedError {
    type Item = &'a FailureRecord;
    type IntoIter = std::slice::Iter<'a, FailureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl Serialize for AggregatedError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wrapper = ErrorWrapper {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: "Validation failed".to_string(),
                fields: self.failures.clone(),
            },
        };
        wrapper.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AggregatedError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wrapper = ErrorWrapper::deserialize(deserializer)?;
        AggregatedError::from_failures(wrapper.error.fields, Self::DEFAULT_SEPARATOR)
            .ok_or_else(|| serde::de::Error::custom("validation error without fields"))
    }
}
