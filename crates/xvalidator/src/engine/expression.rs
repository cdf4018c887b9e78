//! Rule expression parsing.

use crate::error::MalformedInputError;

/// Tag that skips the remaining rules of an empty field.
pub const OMITEMPTY: &str = "omitempty";

/// One `tag` or `tag=param` entry of a rule expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCall {
    pub tag: String,
    pub param: String,
}

/// An ordered list of tags parsed from a string like `"required,len=9"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleExpression {
    calls: Vec<RuleCall>,
}

impl RuleExpression {
    /// Parse a rule expression attached to `field`.
    ///
    /// An empty (or all-whitespace) expression yields no rules.
    pub fn parse(field: &str, expression: &str) -> Result<Self, MalformedInputError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let syntax = || MalformedInputError::Syntax {
            field: field.to_string(),
            expression: expression.to_string(),
        };

        let mut calls = Vec::new();
        for segment in trimmed.split(',') {
            let segment = segment.trim();
            let (tag, param) = match segment.split_once('=') {
                Some((tag, param)) => (tag.trim(), param.trim()),
                None => (segment, ""),
            };
            if !is_identifier(tag) {
                return Err(syntax());
            }
            calls.push(RuleCall {
                tag: tag.to_string(),
                param: param.to_string(),
            });
        }

        Ok(Self { calls })
    }

    /// Parsed calls in declaration order.
    pub fn calls(&self) -> &[RuleCall] {
        &self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Tag names are ASCII identifiers: a letter or underscore followed by
/// letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
