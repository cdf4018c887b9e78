//! # xvalidator
//!
//! Tag-based struct validation with runtime-registered custom tags and
//! translated, human-readable error messages.
//!
//! Every field carries a rule expression such as `"required,email"` or
//! `"required,len=12"`. Besides the built-in tags, a validator accepts
//! custom rules at construction: each [`RuleSpec`] binds a tag name to a
//! predicate *and* an error template, so a custom tag is usable in rule
//! expressions and renders a readable message when it fails.
//!
//! ## Example
//!
//! ```rust
//! use xvalidator::{tagged, RuleSpec, XValidator};
//!
//! struct Signup {
//!     email: String,
//!     inn: String,
//! }
//!
//! tagged!(Signup {
//!     email as "Email" => "required,email",
//!     inn as "INN" => "required,inn",
//! });
//!
//! let validator = XValidator::new([RuleSpec::new(
//!     "inn",
//!     "INN must be numeric and contain 12 digits",
//!     |f| f.as_str().map(|s| s.len() == 12 && s.bytes().all(|b| b.is_ascii_digit())).unwrap_or(false),
//! )])
//! .unwrap();
//!
//! let signup = Signup { email: String::new(), inn: "12345".into() };
//! let err = validator.validate_struct(&signup).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Email is a required field\nINN must be numeric and contain 12 digits"
//! );
//!
//! assert!(validator.validate_value("1111", "required,len=9").is_err());
//! assert!(validator.validate_value("1111", "required").is_ok());
//! ```
//!
//! ## Built-in tags
//!
//! - `required` - Value is not null, empty, zero or false. Options are
//!   unwrapped first, so `Some("")` and `Some(0)` fail `required` just like
//!   `""` and `0`; use `omitempty` for values that may be absent.
//! - `omitempty` - Skip the remaining rules when the value is empty
//! - `email`, `url`, `uuid` - Format checks
//! - `len`, `min`, `max`, `eq`, `ne`, `gt`, `gte`, `lt`, `lte` - Size and value bounds
//! - `oneof=a b c` - Value is one of a space-separated list
//! - `numeric`, `number`, `alpha`, `alphanum`, `lowercase`, `uppercase` - Character classes
//! - `contains`, `startswith`, `endswith` - Substring checks
//! - `eqfield`, `nefield` - Compare with another field of the same struct
//!
//! ## Errors
//!
//! Validation rejections come back as [`Error::Validation`] holding an
//! [`AggregatedError`]: one rendered [`FailureRecord`] per failed rule, in
//! field declaration order. Its `Display` joins the messages with the
//! configured separator; serialized, it uses the JSON envelope:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "Validation failed",
//!     "fields": [
//!       {"field": "INN", "tag": "inn", "kind": "custom", "message": "INN must be numeric and contain 12 digits"}
//!     ]
//!   }
//! }
//! ```

pub mod binder;
mod config;
pub mod engine;
mod error;
mod target;
pub mod translation;
mod validator;


pub use binder::{RuleSpec, RuleSpecBuilder};
pub use config::ValidatorConfig;
pub use engine::{FieldContext, Predicate, RuleEngine};
pub use error::{
    AggregatedError, ConfigurationError, Error, FailureRecord, FieldFailure, MalformedInputError,
    Result, RuleKind, TemplateBindError,
};
pub use target::{Tagged, TaggedField, VarInput, SKIP_FIELD};
pub use translation::{Locale, TranslationRegistry};
pub use validator::XValidator;

/// Prelude module for validation
pub mod prelude {
    pub use crate::binder::RuleSpec;
    pub use crate::config::ValidatorConfig;
    pub use crate::engine::{FieldContext, Predicate};
    pub use crate::error::{AggregatedError, Error, FailureRecord};
    pub use crate::tagged;
    pub use crate::target::{Tagged, TaggedField, VarInput};
    pub use crate::translation::Locale;
    pub use crate::validator::XValidator;
}
