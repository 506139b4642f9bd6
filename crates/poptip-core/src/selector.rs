//! CSS-like selector parsing for element queries.
//!
//! Supports:
//! - `"button"` - by tag name
//! - `"#submit-btn"` - by ID
//! - `".tippy-popper"` - by class
//! - `"[data-tooltipped]"` - by attribute presence
//! - `"[aria-label='foo']"` - by attribute value

use crate::dom::{Document, ElementId};
use thiserror::Error;

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match by tag name
    Tag(String),
    /// Match by ID (e.g., `#my-id`)
    Id(String),
    /// Match by class (e.g., `.my-class`)
    Class(String),
    /// Match by attribute, optionally with a value (e.g., `[aria-label='foo']`)
    Attribute {
        /// Attribute name
        name: String,
        /// Required value; `None` matches on presence alone
        value: Option<String>,
    },
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input.trim()).parse()
    }

    /// Shorthand for an attribute-presence selector.
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            value: None,
        }
    }

    /// Check if this selector matches an element.
    #[must_use]
    pub fn matches(&self, doc: &Document, el: ElementId) -> bool {
        match self {
            Self::Tag(tag) => doc.tag(el).is_some_and(|t| t.eq_ignore_ascii_case(tag)),
            Self::Id(id) => doc.get_attribute(el, "id") == Some(id.as_str()),
            Self::Class(class) => doc.has_class(el, class),
            Self::Attribute { name, value } => match (doc.get_attribute(el, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
        }
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or malformed.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        if self.input.is_empty() {
            return Err(SelectorError::Empty);
        }

        let selector = self.parse_selector()?;
        if let Some(c) = self.peek_char() {
            return Err(SelectorError::UnexpectedChar(c));
        }
        Ok(selector)
    }

    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        let first = self.peek_char().ok_or(SelectorError::Empty)?;

        match first {
            '#' => {
                self.advance();
                Ok(Selector::Id(self.read_identifier()?))
            }
            '.' => {
                self.advance();
                Ok(Selector::Class(self.read_identifier()?))
            }
            '[' => self.parse_attribute(),
            _ if first.is_alphabetic() => Ok(Selector::Tag(self.read_identifier()?)),
            _ => Err(SelectorError::UnexpectedChar(first)),
        }
    }

    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // '['

        let name = self.read_until_any(&['=', ']']);
        if name.is_empty() {
            return Err(SelectorError::InvalidAttribute);
        }

        let value = if self.peek_char() == Some('=') {
            self.advance();
            let quote = self.peek_char();
            if quote == Some('\'') || quote == Some('"') {
                self.advance();
            }
            let value = self.read_until_any(&['\'', '"', ']']);
            if self.peek_char() == Some('\'') || self.peek_char() == Some('"') {
                self.advance();
            }
            Some(value)
        } else {
            None
        };

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        Ok(Selector::Attribute { name, value })
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until_any(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stops.contains(&c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].trim().to_string()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            Selector::parse("button"),
            Ok(Selector::Tag("button".to_string()))
        );
    }

    #[test]
    fn test_parse_id_and_class() {
        assert_eq!(
            Selector::parse("#template-1"),
            Ok(Selector::Id("template-1".to_string()))
        );
        assert_eq!(
            Selector::parse(".tippy-popper"),
            Ok(Selector::Class("tippy-popper".to_string()))
        );
    }

    #[test]
    fn test_parse_attribute_presence() {
        assert_eq!(
            Selector::parse("[data-tooltipped]"),
            Ok(Selector::attribute("data-tooltipped"))
        );
    }

    #[test]
    fn test_parse_attribute_value() {
        assert_eq!(
            Selector::parse("[aria-label=\"Close\"]"),
            Ok(Selector::Attribute {
                name: "aria-label".to_string(),
                value: Some("Close".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("@x"), Err(SelectorError::UnexpectedChar('@')));
        assert_eq!(Selector::parse("#"), Err(SelectorError::ExpectedIdentifier));
        assert_eq!(Selector::parse("[]"), Err(SelectorError::InvalidAttribute));
        assert_eq!(
            Selector::parse("[title='x'"),
            Err(SelectorError::UnclosedAttribute)
        );
        assert_eq!(
            Selector::parse("a b"),
            Err(SelectorError::UnexpectedChar(' '))
        );
    }

    #[test]
    fn test_matches_document_elements() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.set_attribute(button, "id", "go");
        doc.add_class(button, "primary");
        doc.set_attribute(button, "data-tooltipped", "");

        assert!(Selector::parse("BUTTON").unwrap().matches(&doc, button));
        assert!(Selector::parse("#go").unwrap().matches(&doc, button));
        assert!(Selector::parse(".primary").unwrap().matches(&doc, button));
        assert!(Selector::parse("[data-tooltipped]")
            .unwrap()
            .matches(&doc, button));
        assert!(!Selector::parse("[data-tooltipped='x']")
            .unwrap()
            .matches(&doc, button));
    }

    #[test]
    fn test_selector_error_display() {
        assert_eq!(SelectorError::Empty.to_string(), "empty selector");
        assert_eq!(
            SelectorError::UnexpectedChar('@').to_string(),
            "unexpected character: '@'"
        );
    }
}
