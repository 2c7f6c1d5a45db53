//! Document Number Value Object
//!
//! A taxpayer/identity document (CPF-style) typed at the login prompt
//! instead of a user name. Punctuation is ignored: only digits are kept.

use derive_more::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// `None` when the input contains no digit at all
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            None
        } else {
            Some(Self(digits))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation() {
        let doc = DocumentNumber::parse("111.222.333-44").unwrap();
        assert_eq!(doc.as_str(), "11122233344");
        assert_eq!(doc.to_string(), "11122233344");
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(DocumentNumber::parse("student"), None);
        assert_eq!(DocumentNumber::parse(""), None);
    }
}
