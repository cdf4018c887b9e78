//! Built-in tags.
//!
//! Size-based tags (`len`, `min`, `max`, `eq`, `ne`, `gt`, `gte`, `lt`,
//! `lte`) measure strings in characters, arrays by element count, objects
//! by key count and numbers by value.

use super::context::{is_zero, FieldContext};
use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified, with a dotted domain
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
        ).unwrap()
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").unwrap())
}

fn uuid_regex() -> &'static Regex {
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .unwrap()
    })
}

fn numeric_regex() -> &'static Regex {
    NUMERIC_REGEX.get_or_init(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap())
}

/// The parameter of a built-in tag could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BadParam;

/// Tags the engine knows without registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Required,
    Email,
    Url,
    Uuid,
    Len,
    Min,
    Max,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    OneOf,
    Numeric,
    Number,
    Alpha,
    AlphaNum,
    Lowercase,
    Uppercase,
    Contains,
    StartsWith,
    EndsWith,
    EqField,
    NeField,
}

impl Builtin {
    /// Every built-in tag, in catalog order.
    pub const ALL: &'static [Builtin] = &[
        Builtin::Required,
        Builtin::Email,
        Builtin::Url,
        Builtin::Uuid,
        Builtin::Len,
        Builtin::Min,
        Builtin::Max,
        Builtin::Eq,
        Builtin::Ne,
        Builtin::Gt,
        Builtin::Gte,
        Builtin::Lt,
        Builtin::Lte,
        Builtin::OneOf,
        Builtin::Numeric,
        Builtin::Number,
        Builtin::Alpha,
        Builtin::AlphaNum,
        Builtin::Lowercase,
        Builtin::Uppercase,
        Builtin::Contains,
        Builtin::StartsWith,
        Builtin::EndsWith,
        Builtin::EqField,
        Builtin::NeField,
    ];

    /// The tag name used in rule expressions.
    pub const fn tag(self) -> &'static str {
        match self {
            Builtin::Required => "required",
            Builtin::Email => "email",
            Builtin::Url => "url",
            Builtin::Uuid => "uuid",
            Builtin::Len => "len",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Eq => "eq",
            Builtin::Ne => "ne",
            Builtin::Gt => "gt",
            Builtin::Gte => "gte",
            Builtin::Lt => "lt",
            Builtin::Lte => "lte",
            Builtin::OneOf => "oneof",
            Builtin::Numeric => "numeric",
            Builtin::Number => "number",
            Builtin::Alpha => "alpha",
            Builtin::AlphaNum => "alphanum",
            Builtin::Lowercase => "lowercase",
            Builtin::Uppercase => "uppercase",
            Builtin::Contains => "contains",
            Builtin::StartsWith => "startswith",
            Builtin::EndsWith => "endswith",
            Builtin::EqField => "eqfield",
            Builtin::NeField => "nefield",
        }
    }

    /// Look up a built-in by tag name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.tag() == tag)
    }

    /// Whether the tag needs a parameter.
    pub const fn takes_param(self) -> bool {
        matches!(
            self,
            Builtin::Len
                | Builtin::Min
                | Builtin::Max
                | Builtin::Gt
                | Builtin::Gte
                | Builtin::Lt
                | Builtin::Lte
                | Builtin::OneOf
                | Builtin::Contains
                | Builtin::StartsWith
                | Builtin::EndsWith
                | Builtin::EqField
                | Builtin::NeField
        )
    }

    pub(crate) fn check(self, field: &FieldContext<'_>) -> Result<bool, BadParam> {
        if self.takes_param() && field.param().is_empty() {
            return Err(BadParam);
        }
        let value = field.value();
        let param = field.param();

        let passed = match self {
            Builtin::Required => !is_zero(value),
            Builtin::Email => str_matches(value, email_regex()),
            Builtin::Url => str_matches(value, url_regex()),
            Builtin::Uuid => str_matches(value, uuid_regex()),
            Builtin::Len => compare_size(value, param, Ordering::is_eq)?,
            Builtin::Min | Builtin::Gte => compare_size(value, param, Ordering::is_ge)?,
            Builtin::Max | Builtin::Lte => compare_size(value, param, Ordering::is_le)?,
            Builtin::Gt => compare_size(value, param, Ordering::is_gt)?,
            Builtin::Lt => compare_size(value, param, Ordering::is_lt)?,
            Builtin::Eq => equals_param(value, param)?,
            Builtin::Ne => !equals_param(value, param)?,
            Builtin::OneOf => param
                .split_whitespace()
                .any(|option| matches_option(value, option)),
            Builtin::Numeric => str_matches(value, numeric_regex()),
            Builtin::Number => value
                .as_str()
                .map(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false),
            Builtin::Alpha => str_all(value, |c| c.is_ascii_alphabetic()),
            Builtin::AlphaNum => str_all(value, |c| c.is_ascii_alphanumeric()),
            Builtin::Lowercase => value
                .as_str()
                .map(|s| !s.is_empty() && s == s.to_lowercase())
                .unwrap_or(false),
            Builtin::Uppercase => value
                .as_str()
                .map(|s| !s.is_empty() && s == s.to_uppercase())
                .unwrap_or(false),
            Builtin::Contains => value.as_str().map(|s| s.contains(param)).unwrap_or(false),
            Builtin::StartsWith => value.as_str().map(|s| s.starts_with(param)).unwrap_or(false),
            Builtin::EndsWith => value.as_str().map(|s| s.ends_with(param)).unwrap_or(false),
            Builtin::EqField => field.sibling(param).ok_or(BadParam)? == value,
            Builtin::NeField => field.sibling(param).ok_or(BadParam)? != value,
        };
        Ok(passed)
    }
}

fn str_matches(value: &Value, regex: &Regex) -> bool {
    value.as_str().map(|s| regex.is_match(s)).unwrap_or(false)
}

fn str_all(value: &Value, pred: impl Fn(char) -> bool) -> bool {
    value
        .as_str()
        .map(|s| !s.is_empty() && s.chars().all(pred))
        .unwrap_or(false)
}

/// A size or number. Integers stay exact; only real floats go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Size {
    Int(i128),
    Float(f64),
}

impl Size {
    fn parse(text: &str) -> Option<Self> {
        match text.parse::<i128>() {
            Ok(i) => Some(Size::Int(i)),
            Err(_) => text.parse::<f64>().ok().map(Size::Float),
        }
    }

    fn of_number(n: &Number) -> Option<Self> {
        n.as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .map(Size::Int)
            .or_else(|| n.as_f64().map(Size::Float))
    }

    fn as_f64(self) -> f64 {
        match self {
            Size::Int(i) => i as f64,
            Size::Float(f) => f,
        }
    }

    fn compare(self, other: Size) -> Option<Ordering> {
        match (self, other) {
            (Size::Int(a), Size::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Comparable size of a value: character count, element count, key count
/// or the number itself. `None` for null and booleans.
fn size_of(value: &Value) -> Option<Size> {
    match value {
        Value::String(s) => Some(Size::Int(s.chars().count() as i128)),
        Value::Array(a) => Some(Size::Int(a.len() as i128)),
        Value::Object(o) => Some(Size::Int(o.len() as i128)),
        Value::Number(n) => Size::of_number(n),
        Value::Null | Value::Bool(_) => None,
    }
}

fn compare_size(
    value: &Value,
    param: &str,
    accept: impl Fn(Ordering) -> bool,
) -> Result<bool, BadParam> {
    let bound = Size::parse(param).ok_or(BadParam)?;
    Ok(size_of(value)
        .and_then(|size| size.compare(bound))
        .map(accept)
        .unwrap_or(false))
}

/// `oneof` option match: numbers by value, strings and booleans by text.
fn matches_option(value: &Value, option: &str) -> bool {
    match value {
        Value::String(s) => s == option,
        Value::Bool(b) => option.parse::<bool>().map(|o| o == *b).unwrap_or(false),
        Value::Number(n) => match (Size::of_number(n), Size::parse(option)) {
            (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
            _ => false,
        },
        _ => false,
    }
}

/// `eq`/`ne`: strings compare by text, everything else by size.
fn equals_param(value: &Value, param: &str) -> Result<bool, BadParam> {
    match value {
        Value::String(s) => Ok(s == param),
        Value::Bool(b) => param.parse::<bool>().map(|p| p == *b).map_err(|_| BadParam),
        _ => compare_size(value, param, Ordering::is_eq),
    }
}
