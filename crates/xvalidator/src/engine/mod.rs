//! Tag-based rule engine.
//!
//! Holds the rule table (built-in tags plus registered predicates) and
//! evaluates targets against their rule expressions. Evaluation never
//! mutates the engine, so a shared `&RuleEngine` can be used from many
//! threads at once.

mod builtin;
mod context;
mod expression;

pub use builtin::Builtin;
pub use context::{FieldContext, Predicate};
pub use expression::{is_identifier, RuleCall, RuleExpression, OMITEMPTY};

use crate::error::{ConfigurationError, FieldFailure, MalformedInputError, RuleKind};
use crate::target::{FieldData, TaggedField, SKIP_FIELD};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Tag names that can never be registered.
pub const RESERVED_TAGS: &[&str] = &[OMITEMPTY];

enum Rule {
    Builtin(Builtin),
    Custom(Arc<dyn Predicate>),
}

/// The rule table and evaluator.
pub struct RuleEngine {
    custom: HashMap<String, Arc<dyn Predicate>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<_> = self.custom.keys().collect();
        custom.sort();
        f.debug_struct("RuleEngine")
            .field("builtin_tags", &Builtin::ALL.len())
            .field("custom_tags", &custom)
            .finish()
    }
}

impl RuleEngine {
    /// Create an engine that knows only the built-in tags.
    pub fn new() -> Self {
        Self {
            custom: HashMap::new(),
        }
    }

    /// Whether `tag` is a built-in or registered tag.
    pub fn is_registered(&self, tag: &str) -> bool {
        Builtin::from_tag(tag).is_some() || self.custom.contains_key(tag)
    }

    /// Check that `tag` could be registered, without registering it.
    pub fn check_tag_name(&self, tag: &str) -> Result<(), ConfigurationError> {
        if !is_identifier(tag) {
            return Err(ConfigurationError::InvalidTagName(tag.to_string()));
        }
        if RESERVED_TAGS.contains(&tag) {
            return Err(ConfigurationError::ReservedTagName(tag.to_string()));
        }
        if self.is_registered(tag) {
            return Err(ConfigurationError::DuplicateTag(tag.to_string()));
        }
        Ok(())
    }

    /// Register a named predicate.
    ///
    /// Fails if the name is not an identifier, is reserved, or is already
    /// taken by a built-in or custom tag. The table is left untouched on
    /// failure.
    pub fn register_predicate(
        &mut self,
        tag: &str,
        predicate: Arc<dyn Predicate>,
    ) -> Result<(), ConfigurationError> {
        self.check_tag_name(tag)?;
        self.custom.insert(tag.to_string(), predicate);
        tracing::debug!(tag, "registered custom validation tag");
        Ok(())
    }

    /// Registered custom tag names, sorted.
    pub fn custom_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn lookup(&self, field: &str, tag: &str) -> Result<Rule, MalformedInputError> {
        if let Some(builtin) = Builtin::from_tag(tag) {
            return Ok(Rule::Builtin(builtin));
        }
        self.custom
            .get(tag)
            .map(|p| Rule::Custom(Arc::clone(p)))
            .ok_or_else(|| MalformedInputError::UnknownTag {
                field: field.to_string(),
                tag: tag.to_string(),
            })
    }

    /// Evaluate every field of a struct in declaration order.
    ///
    /// Each field reports at most one failure, for the first rule of its
    /// expression that does not hold. Returns the failures of all fields;
    /// an empty vector means the target passed.
    pub fn evaluate_fields(
        &self,
        fields: &[TaggedField],
    ) -> Result<Vec<FieldFailure>, MalformedInputError> {
        let mut failures = Vec::new();
        self.walk(None, fields, &mut failures)?;
        Ok(failures)
    }

    /// Evaluate a single value against an explicit rule expression.
    pub fn evaluate_value(
        &self,
        name: &str,
        value: &Value,
        expression: &str,
    ) -> Result<Vec<FieldFailure>, MalformedInputError> {
        let mut failures = Vec::new();
        self.evaluate_one(name, value, expression, &[], &mut failures)?;
        Ok(failures)
    }

    fn walk(
        &self,
        prefix: Option<&str>,
        fields: &[TaggedField],
        failures: &mut Vec<FieldFailure>,
    ) -> Result<(), MalformedInputError> {
        // Identifiers are matched before message names.
        let values: Vec<(&TaggedField, &Value)> = fields
            .iter()
            .filter_map(|f| match &f.data {
                FieldData::Value(v) => Some((f, v)),
                FieldData::Nested(_) => None,
            })
            .collect();
        let siblings: Vec<(&str, &Value)> = values
            .iter()
            .map(|(f, v)| (f.ident(), *v))
            .chain(
                values
                    .iter()
                    .filter(|(f, _)| f.ident.is_some())
                    .map(|(f, v)| (f.name.as_str(), *v)),
            )
            .collect();

        for field in fields {
            let name = match prefix {
                Some(prefix) => format!("{prefix}.{}", field.name),
                None => field.name.clone(),
            };
            match &field.data {
                FieldData::Value(value) => {
                    self.evaluate_one(&name, value, &field.rules, &siblings, failures)?
                }
                FieldData::Nested(inner) => self.walk(Some(&name), inner, failures)?,
            }
        }
        Ok(())
    }

    fn evaluate_one(
        &self,
        name: &str,
        value: &Value,
        expression: &str,
        siblings: &[(&str, &Value)],
        failures: &mut Vec<FieldFailure>,
    ) -> Result<(), MalformedInputError> {
        if expression.trim() == SKIP_FIELD {
            return Ok(());
        }
        let expression = RuleExpression::parse(name, expression)?;

        // Resolve every tag first so an unknown tag is reported even when an
        // earlier rule would have been skipped.
        let mut rules = Vec::with_capacity(expression.calls().len());
        for call in expression.calls() {
            if call.tag == OMITEMPTY {
                rules.push((call, None));
            } else {
                rules.push((call, Some(self.lookup(name, &call.tag)?)));
            }
        }

        for (call, rule) in rules {
            let ctx = FieldContext::new(name, value, &call.param, siblings);
            let (passed, kind) = match rule {
                None if ctx.is_empty() => break,
                None => continue,
                Some(Rule::Builtin(builtin)) => {
                    let passed = builtin.check(&ctx).map_err(|_| MalformedInputError::BadParam {
                        field: name.to_string(),
                        tag: call.tag.clone(),
                        param: call.param.clone(),
                    })?;
                    (passed, RuleKind::BuiltIn)
                }
                Some(Rule::Custom(predicate)) => (predicate.check(&ctx), RuleKind::Custom),
            };
            if !passed {
                failures.push(FieldFailure::new(name, &call.tag, &call.param, kind));
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inn() -> Arc<dyn Predicate> {
        Arc::new(|f: &FieldContext| {
            f.as_str()
                .map(|s| s.len() == 12 && s.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false)
        })
    }

    #[test]
    fn register_rejects_builtin_and_duplicate_names() {
        let mut engine = RuleEngine::new();
        assert_eq!(
            engine.register_predicate("email", inn()),
            Err(ConfigurationError::DuplicateTag("email".into()))
        );
        engine.register_predicate("inn", inn()).unwrap();
        assert_eq!(
            engine.register_predicate("inn", inn()),
            Err(ConfigurationError::DuplicateTag("inn".into()))
        );
        assert_eq!(engine.custom_tags(), vec!["inn"]);
    }

    #[test]
    fn register_rejects_invalid_and_reserved_names() {
        let mut engine = RuleEngine::new();
        assert!(matches!(
            engine.register_predicate("", inn()),
            Err(ConfigurationError::InvalidTagName(_))
        ));
        assert!(matches!(
            engine.register_predicate("a,b", inn()),
            Err(ConfigurationError::InvalidTagName(_))
        ));
        assert!(matches!(
            engine.register_predicate("omitempty", inn()),
            Err(ConfigurationError::ReservedTagName(_))
        ));
        assert!(engine.custom_tags().is_empty());
    }

    #[test]
    fn first_failing_rule_ends_the_field() {
        let engine = RuleEngine::new();
        let failures = engine
            .evaluate_value("value", &json!(""), "required,len=9")
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tag, "required");

        let failures = engine
            .evaluate_value("value", &json!("1111"), "required,len=9")
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tag, "len");
        assert_eq!(failures[0].param, "9");
        assert_eq!(failures[0].kind, RuleKind::BuiltIn);
    }

    #[test]
    fn unknown_tag_is_malformed_input() {
        let engine = RuleEngine::new();
        let err = engine
            .evaluate_value("value", &json!("x"), "required,inn")
            .unwrap_err();
        assert_eq!(
            err,
            MalformedInputError::UnknownTag {
                field: "value".into(),
                tag: "inn".into()
            }
        );
    }

    #[test]
    fn omitempty_skips_remaining_rules_for_empty_values() {
        let engine = RuleEngine::new();
        assert!(engine
            .evaluate_value("age", &Value::Null, "omitempty,gte=18")
            .unwrap()
            .is_empty());
        assert_eq!(
            engine
                .evaluate_value("age", &json!(10), "omitempty,gte=18")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn custom_predicates_are_marked_custom() {
        let mut engine = RuleEngine::new();
        engine.register_predicate("inn", inn()).unwrap();
        let failures = engine
            .evaluate_value("INN", &json!("11111111111a"), "required,inn")
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tag, "inn");
        assert_eq!(failures[0].kind, RuleKind::Custom);
    }

    #[test]
    fn struct_fields_walk_nested_and_skip() {
        let engine = RuleEngine::new();
        let address = vec![TaggedField::new("city", "required", "")];
        let fields = vec![
            TaggedField::new("name", "required", ""),
            TaggedField::new("internal", "-", ""),
            TaggedField {
                name: "address".into(),
                ident: None,
                rules: String::new(),
                data: FieldData::Nested(address),
            },
        ];
        let failures = engine.evaluate_fields(&fields).unwrap();
        let names: Vec<_> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["name", "address.city"]);
    }

    #[test]
    fn eqfield_reads_siblings() {
        let engine = RuleEngine::new();
        let fields = vec![
            TaggedField::new("Password", "required", "secret"),
            TaggedField::new("Confirm", "eqfield=Password", "secreT"),
        ];
        let failures = engine.evaluate_fields(&fields).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tag, "eqfield");
        assert_eq!(failures[0].param, "Password");
    }

    #[test]
    fn eqfield_prefers_identifier_over_message_name() {
        let engine = RuleEngine::new();
        let fields = vec![
            TaggedField::new("Password", "required", "secret").with_ident("password"),
            TaggedField::new("Confirm", "eqfield=password", "secret").with_ident("confirm"),
            TaggedField::new("Repeat", "eqfield=Password", "secret").with_ident("repeat"),
        ];
        assert!(engine.evaluate_fields(&fields).unwrap().is_empty());
    }
}
