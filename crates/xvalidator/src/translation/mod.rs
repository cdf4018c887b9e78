//! Turns engine failures into human-readable messages.

mod catalog;
mod defaults;

pub use catalog::{Catalog, Locale, MissingTranslation, Template, MAX_PLACEHOLDER};

use crate::error::{FieldFailure, TemplateBindError};

/// Binds templates to tag names and renders failures.
#[derive(Debug, Clone)]
pub struct TranslationRegistry {
    catalog: Catalog,
}

impl TranslationRegistry {
    /// Create a registry seeded with the built-in tag templates for `locale`.
    pub fn with_defaults(locale: Locale) -> Self {
        let mut catalog = Catalog::new(locale);
        for &(tag, template) in defaults::templates(locale) {
            if let Err(e) = catalog.add(tag, template, false) {
                tracing::error!(tag, %locale, error = %e, "invalid default template");
            }
        }
        tracing::debug!(%locale, templates = catalog.len(), "translation catalog initialized");
        Self { catalog }
    }

    /// Create a registry with no templates at all; every failure renders
    /// with the generic description.
    pub fn empty(locale: Locale) -> Self {
        Self {
            catalog: Catalog::new(locale),
        }
    }

    pub fn locale(&self) -> Locale {
        self.catalog.locale()
    }

    /// Whether `tag` has a bound template.
    pub fn has_template(&self, tag: &str) -> bool {
        self.catalog.contains(tag)
    }

    /// Associate a template with a tag name.
    pub fn bind_template(&mut self, tag: &str, template: &str) -> Result<(), TemplateBindError> {
        self.catalog.add(tag, template, false)
    }

    /// Render a failure. Always returns non-empty text.
    pub fn render(&self, failure: &FieldFailure) -> String {
        match self
            .catalog
            .translate(&failure.tag, &[failure.field.as_str(), failure.param.as_str()])
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => generic_description(failure),
            Err(e) => {
                tracing::trace!(error = %e, "falling back to generic description");
                generic_description(failure)
            }
        }
    }
}

/// Text used when no template is bound for a failed tag.
pub fn generic_description(failure: &FieldFailure) -> String {
    format!(
        "Field validation for '{}' failed on the '{}' tag",
        failure.field, failure.tag
    )
}
