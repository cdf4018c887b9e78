//! Validator configuration.

use crate::error::AggregatedError;
use crate::translation::Locale;

/// Configuration for [`XValidator`](crate::XValidator).
///
/// ```rust
/// use xvalidator::{Locale, ValidatorConfig};
///
/// let config = ValidatorConfig::new()
///     .locale(Locale::Ru)        // Russian messages
///     .separator("; ")           // Join messages on one line
///     .value_name("Value");      // Name for bare values in messages
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Locale of the message catalog. Default: English.
    pub(crate) locale: Locale,

    /// Separator between rendered messages in the aggregated error text.
    /// Default: newline.
    pub(crate) separator: String,

    /// Field name used in messages for bare values. Default: "value".
    pub(crate) value_name: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            locale: Locale::default(),
            separator: AggregatedError::DEFAULT_SEPARATOR.to_string(),
            value_name: "value".to_string(),
        }
    }

    /// Set the message locale.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the separator used when joining messages.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the field name used for bare values.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    pub fn get_locale(&self) -> Locale {
        self.locale
    }

    pub fn get_separator(&self) -> &str {
        &self.separator
    }

    pub fn get_value_name(&self) -> &str {
        &self.value_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.get_locale(), Locale::En);
        assert_eq!(config.get_separator(), "\n");
        assert_eq!(config.get_value_name(), "value");
    }

    #[test]
    fn builder_overrides() {
        let config = ValidatorConfig::new()
            .locale(Locale::Ru)
            .separator("; ")
            .value_name("Значение");
        assert_eq!(config.get_locale(), Locale::Ru);
        assert_eq!(config.get_separator(), "; ");
        assert_eq!(config.get_value_name(), "Значение");
    }
}
