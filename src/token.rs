//! Tokens passed from the lexer to the validator.

use std::fmt;

/// A classified unit of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name>`
    Open(String),
    /// `</name>`
    Close(String),
    /// Text between a leaf's open and close tags
    Value(String),
}

impl Token {
    /// Classifies a complete `<...>` tag. Returns `None` if `raw` is not
    /// bracketed.
    #[must_use]
    pub fn from_tag(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix('<')?.strip_suffix('>')?;
        Some(match inner.strip_prefix('/') {
            Some(name) => Token::Close(name.to_string()),
            None => Token::Open(inner.to_string()),
        })
    }

    /// The tag name, or `None` for values.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Token::Open(name) | Token::Close(name) => Some(name),
            Token::Value(_) => None,
        }
    }

    /// Returns `true` if this is the close tag matching `tag`.
    #[must_use]
    pub fn closes(&self, tag: &str) -> bool {
        matches!(self, Token::Close(name) if name == tag)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open(name) => write!(f, "<{name}>"),
            Token::Close(name) => write!(f, "</{name}>"),
            Token::Value(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Token::from_tag("<field>"), Some(Token::Open("field".into())));
        assert_eq!(Token::from_tag("</field>"), Some(Token::Close("field".into())));
        assert_eq!(Token::from_tag("field"), None);
        assert_eq!(Token::from_tag("<>"), Some(Token::Open(String::new())));
    }

    #[test]
    fn test_display_restores_markup() {
        assert_eq!(Token::Close("name".into()).to_string(), "</name>");
        assert!(Token::Close("name".into()).closes("name"));
        assert!(!Token::Open("name".into()).closes("name"));
        assert_eq!(Token::Value("x".into()).tag_name(), None);
    }
}
