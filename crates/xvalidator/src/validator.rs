//! The validation entry point.

use crate::binder::{self, RuleSpec};
use crate::config::ValidatorConfig;
use crate::engine::RuleEngine;
use crate::error::{AggregatedError, FailureRecord, FieldFailure, Result};
use crate::target::{capture, Tagged, VarInput};
use crate::translation::TranslationRegistry;
use serde::Serialize;

/// Validates tagged structs and bare values, reporting every failure as
/// translated text.
///
/// Custom tags are installed once, when the validator is built; the rule
/// table and the catalog are read-only afterwards, so a validator can be
/// shared between threads (`&XValidator` is all any call needs).
///
/// ## Example
///
/// ```rust
/// use xvalidator::{tagged, RuleSpec, XValidator};
///
/// struct Company {
///     name: String,
///     inn: String,
/// }
///
/// tagged!(Company {
///     name as "Name" => "required",
///     inn as "INN" => "required,inn",
/// });
///
/// let validator = XValidator::new([RuleSpec::new(
///     "inn",
///     "INN must be numeric and contain 12 digits",
///     |f| {
///         f.as_str()
///             .map(|s| s.len() == 12 && s.chars().all(|c| c.is_ascii_digit()))
///             .unwrap_or(false)
///     },
/// )])
/// .unwrap();
///
/// let company = Company { name: "Acme".into(), inn: "11111111111a".into() };
/// let err = validator.validate_struct(&company).unwrap_err();
/// assert_eq!(err.to_string(), "INN must be numeric and contain 12 digits");
/// ```
#[derive(Debug)]
pub struct XValidator {
    engine: RuleEngine,
    translations: TranslationRegistry,
    config: ValidatorConfig,
}

impl XValidator {
    /// Build a validator with the default configuration.
    pub fn new(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self> {
        Self::with_config(ValidatorConfig::default(), specs)
    }

    /// Build a validator, installing every custom rule.
    ///
    /// Fails with [`Error::Configuration`](crate::Error::Configuration) if any
    /// rule cannot be installed; no validator exists in that case.
    pub fn with_config(
        config: ValidatorConfig,
        specs: impl IntoIterator<Item = RuleSpec>,
    ) -> Result<Self> {
        let mut engine = RuleEngine::new();
        let mut translations = TranslationRegistry::with_defaults(config.locale);
        let specs: Vec<RuleSpec> = specs.into_iter().collect();
        if !specs.is_empty() {
            binder::install(&mut engine, &mut translations, specs)?;
        }

        Ok(Self {
            engine,
            translations,
            config,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Registered custom tag names, sorted.
    pub fn custom_tags(&self) -> Vec<&str> {
        self.engine.custom_tags()
    }

    /// Validate every tagged field of `target`.
    pub fn validate_struct<T: Tagged + ?Sized>(&self, target: &T) -> Result<()> {
        let fields = target.tagged_fields();
        let failures = self.engine.evaluate_fields(&fields)?;
        self.report(failures)
    }

    /// Validate a bare value against an explicit rule expression.
    pub fn validate_value<T: Serialize + ?Sized>(&self, value: &T, rules: &str) -> Result<()> {
        let failures =
            self.engine
                .evaluate_value(&self.config.value_name, &capture(value), rules)?;
        self.report(failures)
    }

    /// Validate several bare values, reporting all failures in input order.
    pub fn validate_vars(&self, vars: &[VarInput]) -> Result<()> {
        let mut failures = Vec::new();
        for var in vars {
            let name = var.name.as_deref().unwrap_or(&self.config.value_name);
            failures.extend(self.engine.evaluate_value(name, &var.value, &var.rules)?);
        }
        self.report(failures)
    }

    /// Render engine failures and fold them into one error.
    fn report(&self, failures: Vec<FieldFailure>) -> Result<()> {
        tracing::trace!(failures = failures.len(), "validation finished");
        let records = failures
            .into_iter()
            .map(|failure| {
                let message = self.translations.render(&failure);
                FailureRecord::new(failure, message)
            })
            .collect();

        match AggregatedError::from_failures(records, self.config.separator.clone()) {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, Error, MalformedInputError, RuleKind};
    use crate::target::TaggedField;
    use crate::translation::Locale;

    fn inn_spec() -> RuleSpec {
        RuleSpec::new("inn", "INN must be numeric and contain 12 digits", |f| {
            f.as_str()
                .map(|s| s.len() == 12 && s.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false)
        })
    }

    struct Company {
        name: String,
        inn: String,
    }

    impl Tagged for Company {
        fn tagged_fields(&self) -> Vec<TaggedField> {
            vec![
                TaggedField::new("Name", "required", &self.name),
                TaggedField::new("INN", "required,inn", &self.inn),
            ]
        }
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<XValidator>();
    }

    #[test]
    fn valid_struct_passes() {
        let validator = XValidator::new([inn_spec()]).unwrap();
        let company = Company {
            name: "Acme".into(),
            inn: "111111111111".into(),
        };
        assert!(validator.validate_struct(&company).is_ok());
    }

    #[test]
    fn failures_are_rendered_in_field_order() {
        let validator = XValidator::new([inn_spec()]).unwrap();
        let company = Company {
            name: String::new(),
            inn: "11111111111a".into(),
        };

        let err = validator.validate_struct(&company).unwrap_err();
        let aggregated = err.as_validation().unwrap();
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated.failures()[0].kind, RuleKind::BuiltIn);
        assert_eq!(aggregated.failures()[1].kind, RuleKind::Custom);
        assert_eq!(
            err.to_string(),
            "Name is a required field\nINN must be numeric and contain 12 digits"
        );
    }

    #[test]
    fn duplicate_specs_fail_construction() {
        let err = XValidator::new([inn_spec(), inn_spec()]).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::DuplicateTag(ref tag)) if tag == "inn"
        ));
    }

    #[test]
    fn unregistered_tag_is_malformed_input() {
        let validator = XValidator::new([]).unwrap();
        let company = Company {
            name: "Acme".into(),
            inn: "111111111111".into(),
        };
        let err = validator.validate_struct(&company).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput(MalformedInputError::UnknownTag { .. })
        ));
    }

    #[test]
    fn value_uses_configured_name() {
        let config = ValidatorConfig::new().value_name("Password");
        let validator = XValidator::with_config(config, []).unwrap();

        let err = validator.validate_value("1111", "required,len=9").unwrap_err();
        assert_eq!(err.to_string(), "Password must be 9 in length");
    }

    #[test]
    fn messages_are_joined_with_configured_separator() {
        let config = ValidatorConfig::new().separator(" | ");
        let validator = XValidator::with_config(config, [inn_spec()]).unwrap();
        let company = Company {
            name: String::new(),
            inn: String::new(),
        };

        let err = validator.validate_struct(&company).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Name is a required field | INN is a required field"
        );
    }

    #[test]
    fn vars_aggregate_in_input_order() {
        let validator = XValidator::new([]).unwrap();
        let vars = [
            VarInput::new("required,len=9", "1111").named("password"),
            VarInput::new("email", "1@1.ru"),
            VarInput::new("email", "nope"),
        ];

        let err = validator.validate_vars(&vars).unwrap_err();
        let fields: Vec<_> = err
            .as_validation()
            .unwrap()
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, vec!["password", "value"]);
    }

    #[test]
    fn required_unwraps_options() {
        let validator = XValidator::new([]).unwrap();
        assert!(validator.validate_value(&Some(""), "required").is_err());
        assert!(validator.validate_value(&Some(0), "required").is_err());
        assert!(validator.validate_value(&None::<String>, "required").is_err());
        assert!(validator.validate_value(&Some("x"), "required").is_ok());
        assert!(validator.validate_value(&None::<String>, "omitempty,email").is_ok());
    }

    #[test]
    fn russian_locale_renders_russian_messages() {
        let config = ValidatorConfig::new().locale(Locale::Ru);
        let validator = XValidator::with_config(config, []).unwrap();
        let err = validator.validate_value(&"", "required").unwrap_err();
        assert_eq!(err.to_string(), "value обязательное поле");
    }
}
