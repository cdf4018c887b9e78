//! Custom tag installation.
//!
//! A [`RuleSpec`] pairs a tag name with a predicate and an error template.
//! Installing it registers the predicate with the [`RuleEngine`] and binds
//! the template in the [`TranslationRegistry`] under the same name.

use crate::engine::{FieldContext, Predicate, RuleEngine};
use crate::error::ConfigurationError;
use crate::translation::TranslationRegistry;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A custom validation rule: tag name, error template and predicate.
#[derive(Clone)]
pub struct RuleSpec {
    tag: String,
    template: String,
    predicate: Arc<dyn Predicate>,
}

impl RuleSpec {
    /// Create a rule from a closure.
    ///
    /// The template may use `{0}` for the field name and `{1}` for the tag
    /// parameter. Literal braces must be written as `{{` and `}}`: a
    /// template with any other brace is rejected when installed, and the
    /// rule's failures then render with the generic description.
    ///
    /// ```rust
    /// use xvalidator::RuleSpec;
    ///
    /// let inn = RuleSpec::new("inn", "INN must be numeric and contain 12 digits", |f| {
    ///     f.as_str()
    ///         .map(|s| s.len() == 12 && s.chars().all(|c| c.is_ascii_digit()))
    ///         .unwrap_or(false)
    /// });
    /// assert_eq!(inn.tag(), "inn");
    ///
    /// let code = RuleSpec::new("code", "{0} must look like {{ABC-123}}", |f| {
    ///     f.as_str().map(|s| s.len() == 7).unwrap_or(false)
    /// });
    /// assert_eq!(code.template(), "{0} must look like {{ABC-123}}");
    /// ```
    pub fn new<F>(tag: impl Into<String>, template: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::with_predicate(tag, template, Arc::new(predicate))
    }

    /// Create a rule from any [`Predicate`] implementation.
    pub fn with_predicate(
        tag: impl Into<String>,
        template: impl Into<String>,
        predicate: Arc<dyn Predicate>,
    ) -> Self {
        Self {
            tag: tag.into(),
            template: template.into(),
            predicate,
        }
    }

    /// Assemble a rule step by step.
    pub fn builder(tag: impl Into<String>) -> RuleSpecBuilder {
        RuleSpecBuilder {
            tag: tag.into(),
            template: None,
            predicate: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSpec")
            .field("tag", &self.tag)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RuleSpec`].
#[derive(Default)]
pub struct RuleSpecBuilder {
    tag: String,
    template: Option<String>,
    predicate: Option<Arc<dyn Predicate>>,
}

impl RuleSpecBuilder {
    /// Set the error template.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the predicate.
    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Set the predicate from a shared implementation.
    pub fn predicate_arc(mut self, predicate: Arc<dyn Predicate>) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Build the rule. Both the predicate and a non-empty template are required.
    pub fn build(self) -> Result<RuleSpec, ConfigurationError> {
        let predicate = self
            .predicate
            .ok_or_else(|| ConfigurationError::MissingPredicate(self.tag.clone()))?;
        let template = self
            .template
            .ok_or_else(|| ConfigurationError::MissingTemplate(self.tag.clone()))?;
        Ok(RuleSpec::with_predicate(self.tag, template, predicate))
    }
}

/// Check a whole batch before anything is registered.
fn preflight(engine: &RuleEngine, specs: &[RuleSpec]) -> Result<(), ConfigurationError> {
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        engine.check_tag_name(&spec.tag)?;
        if !seen.insert(spec.tag.as_str()) {
            return Err(ConfigurationError::DuplicateTag(spec.tag.clone()));
        }
        if spec.template.trim().is_empty() {
            return Err(ConfigurationError::MissingTemplate(spec.tag.clone()));
        }
    }
    Ok(())
}

/// Install custom rules into an engine and its translation registry.
///
/// The batch is all-or-nothing: every spec is checked (tag names, duplicates
/// inside the batch and against already registered tags, empty templates)
/// before the first predicate is registered. A template the catalog rejects
/// does not fail the installation; the predicate stays active and its
/// failures render with the generic description.
///
/// Returns the number of installed rules.
pub fn install(
    engine: &mut RuleEngine,
    translations: &mut TranslationRegistry,
    specs: Vec<RuleSpec>,
) -> Result<usize, ConfigurationError> {
    preflight(engine, &specs)?;

    let count = specs.len();
    for spec in specs {
        engine.register_predicate(&spec.tag, spec.predicate)?;
        if let Err(e) = translations.bind_template(&spec.tag, &spec.template) {
            tracing::warn!(
                tag = %spec.tag,
                error = %e,
                "custom tag template rejected; failures will use the generic description"
            );
        }
    }
    tracing::debug!(count, "installed custom validation tags");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FieldFailure, RuleKind};
    use crate::translation::Locale;
    use serde_json::json;

    fn digits(len: usize) -> impl Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static {
        move |f| {
            f.as_str()
                .map(|s| s.len() == len && s.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false)
        }
    }

    fn setup() -> (RuleEngine, TranslationRegistry) {
        (
            RuleEngine::new(),
            TranslationRegistry::with_defaults(Locale::En),
        )
    }

    #[test]
    fn installs_predicate_and_template() {
        let (mut engine, mut translations) = setup();
        let count = install(
            &mut engine,
            &mut translations,
            vec![RuleSpec::new("inn", "INN must be numeric", digits(12))],
        )
        .unwrap();

        assert_eq!(count, 1);
        assert!(engine.is_registered("inn"));
        assert!(translations.has_template("inn"));
    }

    #[test]
    fn duplicate_inside_batch_installs_nothing() {
        let (mut engine, mut translations) = setup();
        let err = install(
            &mut engine,
            &mut translations,
            vec![
                RuleSpec::new("kpp", "KPP", digits(9)),
                RuleSpec::new("inn", "first", digits(12)),
                RuleSpec::new("inn", "second", digits(10)),
            ],
        )
        .unwrap_err();

        assert_eq!(err, ConfigurationError::DuplicateTag("inn".into()));
        assert!(engine.custom_tags().is_empty());
        assert!(!translations.has_template("kpp"));
    }

    #[test]
    fn collision_with_existing_tag_keeps_previous_tags_working() {
        let (mut engine, mut translations) = setup();
        install(
            &mut engine,
            &mut translations,
            vec![RuleSpec::new("inn", "INN must be numeric", digits(12))],
        )
        .unwrap();

        let err = install(
            &mut engine,
            &mut translations,
            vec![RuleSpec::new("inn", "other", digits(10))],
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateTag("inn".into()));

        let failures = engine
            .evaluate_value("INN", &json!("1234567890"), "inn")
            .unwrap();
        assert_eq!(failures.len(), 1);
        let rendered = translations.render(&failures[0]);
        assert_eq!(rendered, "INN must be numeric");
    }

    #[test]
    fn builtin_collision_is_rejected() {
        let (mut engine, mut translations) = setup();
        let err = install(
            &mut engine,
            &mut translations,
            vec![RuleSpec::new("email", "x", digits(1))],
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateTag("email".into()));
    }

    #[test]
    fn empty_template_is_a_configuration_error() {
        let (mut engine, mut translations) = setup();
        let err = install(
            &mut engine,
            &mut translations,
            vec![RuleSpec::new("inn", "  ", digits(12))],
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::MissingTemplate("inn".into()));
        assert!(!engine.is_registered("inn"));
    }

    #[test]
    fn rejected_template_keeps_predicate_active() {
        let (mut engine, mut translations) = setup();
        install(
            &mut engine,
            &mut translations,
            vec![RuleSpec::new("inn", "{0} has {bad} syntax", digits(12))],
        )
        .unwrap();

        assert!(engine.is_registered("inn"));
        assert!(!translations.has_template("inn"));
        let failure = FieldFailure::new("INN", "inn", "", RuleKind::Custom);
        assert_eq!(
            translations.render(&failure),
            "Field validation for 'INN' failed on the 'inn' tag"
        );
    }

    #[test]
    fn literal_braces_need_escaping() {
        let (mut engine, mut translations) = setup();
        install(
            &mut engine,
            &mut translations,
            vec![
                RuleSpec::new("code", "{0} must look like {{ABC-123}}", digits(7)),
                RuleSpec::new("raw_code", "{0} must look like {ABC-123}", digits(7)),
            ],
        )
        .unwrap();

        let escaped = FieldFailure::new("Code", "code", "", RuleKind::Custom);
        assert_eq!(translations.render(&escaped), "Code must look like {ABC-123}");
        let raw = FieldFailure::new("Code", "raw_code", "", RuleKind::Custom);
        assert_eq!(
            translations.render(&raw),
            "Field validation for 'Code' failed on the 'raw_code' tag"
        );
    }

    #[test]
    fn builder_requires_predicate_and_template() {
        assert_eq!(
            RuleSpec::builder("inn").template("x").build().unwrap_err(),
            ConfigurationError::MissingPredicate("inn".into())
        );
        assert_eq!(
            RuleSpec::builder("inn").predicate(digits(12)).build().unwrap_err(),
            ConfigurationError::MissingTemplate("inn".into())
        );
        let spec = RuleSpec::builder("inn")
            .template("INN")
            .predicate(digits(12))
            .build()
            .unwrap();
        assert_eq!(spec.template(), "INN");
    }
}
