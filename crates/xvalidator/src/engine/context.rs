//! Field-level context handed to predicates.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A custom validation predicate.
///
/// Implemented for every `Fn(&FieldContext) -> bool + Send + Sync`, so a
/// closure is usually enough:
///
/// ```rust
/// use xvalidator::FieldContext;
///
/// let inn = |field: &FieldContext| {
///     field
///         .as_str()
///         .map(|s| s.len() == 12 && s.chars().all(|c| c.is_ascii_digit()))
///         .unwrap_or(false)
/// };
/// # let _ = inn;
/// ```
pub trait Predicate: Send + Sync {
    /// Return true if the field passes.
    fn check(&self, field: &FieldContext<'_>) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&FieldContext<'_>) -> bool + Send + Sync,
{
    fn check(&self, field: &FieldContext<'_>) -> bool {
        self(field)
    }
}

impl fmt::Debug for dyn Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// What a predicate can see about the field under validation.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    field: &'a str,
    value: &'a Value,
    param: &'a str,
    siblings: &'a [(&'a str, &'a Value)],
}

impl<'a> FieldContext<'a> {
    pub(crate) fn new(
        field: &'a str,
        value: &'a Value,
        param: &'a str,
        siblings: &'a [(&'a str, &'a Value)],
    ) -> Self {
        Self {
            field,
            value,
            param,
            siblings,
        }
    }

    /// Field name as reported in failures.
    pub fn field_name(&self) -> &str {
        self.field
    }

    /// The field value.
    pub fn value(&self) -> &Value {
        self.value
    }

    /// The tag parameter (`"9"` for `len=9`), empty when absent.
    pub fn param(&self) -> &str {
        self.param
    }

    /// Parse the tag parameter.
    pub fn param_as<T: FromStr>(&self) -> Option<T> {
        self.param.parse().ok()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    /// True for null, `""`, `0`, `false` and empty collections.
    pub fn is_empty(&self) -> bool {
        is_zero(self.value)
    }

    /// Value of another field of the same struct, looked up by struct
    /// identifier or by message name.
    pub fn sibling(&self, name: &str) -> Option<&Value> {
        self.siblings
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

/// Zero-value check shared by `required` and `omitempty`.
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
