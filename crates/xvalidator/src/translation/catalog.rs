//! Locale-scoped message catalog with positional placeholders.
//!
//! Templates reference `{0}` (the field name) and `{1}` (the tag parameter).
//! `{{` and `}}` produce literal braces.

use crate::error::TemplateBindError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Highest placeholder index a template may use.
pub const MAX_PLACEHOLDER: usize = 1;

/// Supported catalog locales.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (default).
    #[default]
    En,
    /// Russian.
    Ru,
}

impl Locale {
    /// Returns the canonical locale label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }

    /// Parse a locale label, ignoring case and region tags (`en-US`, `ru_RU`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Arg(usize),
}

/// A parsed message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse and syntax-check a template registered under `key`.
    pub fn parse(key: &str, source: &str) -> Result<Self, TemplateBindError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateBindError::UnbalancedBrace {
                            key: key.to_string(),
                            position: pos,
                        });
                    }
                    let index = name
                        .parse::<usize>()
                        .ok()
                        .filter(|i| *i <= MAX_PLACEHOLDER)
                        .ok_or_else(|| TemplateBindError::UnknownPlaceholder {
                            key: key.to_string(),
                            placeholder: name.clone(),
                        })?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Arg(index));
                }
                '}' => {
                    return Err(TemplateBindError::UnbalancedBrace {
                        key: key.to_string(),
                        position: pos,
                    });
                }
                c => text.push(c),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { segments })
    }

    /// Substitute positional arguments. Missing arguments render as empty.
    pub fn render(&self, args: &[&str]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Arg(i) => out.push_str(args.get(*i).copied().unwrap_or("")),
            }
        }
        out
    }
}

/// Lookup failed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no translation for '{key}' in locale '{locale}'")]
pub struct MissingTranslation {
    pub key: String,
    pub locale: Locale,
}

/// Templates for one locale, keyed by identifier.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    templates: HashMap<String, Template>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            templates: HashMap::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Register a template. Existing keys are kept unless `overwrite` is set.
    pub fn add(&mut self, key: &str, source: &str, overwrite: bool) -> Result<(), TemplateBindError> {
        if !overwrite && self.templates.contains_key(key) {
            return Err(TemplateBindError::AlreadyBound(key.to_string()));
        }
        let template = Template::parse(key, source)?;
        self.templates.insert(key.to_string(), template);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render the template for `key`.
    pub fn translate(&self, key: &str, args: &[&str]) -> Result<String, MissingTranslation> {
        self.templates
            .get(key)
            .map(|t| t.render(args))
            .ok_or_else(|| MissingTranslation {
                key: key.to_string(),
                locale: self.locale,
            })
    }
}
