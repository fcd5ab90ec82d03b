//! `Content-Type` header values.
//!
//! Only as much of RFC 2045 as is needed to find the multipart boundary:
//! `type/subtype` followed by `;`-separated `key=value` parameters, where a
//! value may be wrapped in double quotes.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Parsed content type with lowercase names and raw parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "mixed").
    pub sub_type: String,
    /// Parameters keyed by lowercase name.
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// # Errors
    ///
    /// Returns an error if the `type/subtype` pair is missing or empty.
    pub fn parse(s: &str) -> Result<Self> {
        let mut fields = s.split(';');

        let essence = fields.next().unwrap_or_default().trim();
        let (main_type, sub_type) = essence
            .split_once('/')
            .map(|(main, sub)| (main.trim(), sub.trim()))
            .filter(|(main, sub)| !main.is_empty() && !sub.is_empty())
            .ok_or_else(|| Error::InvalidContentType(essence.to_string()))?;

        let parameters = fields
            .filter_map(|param| param.split_once('='))
            .map(|(key, value)| {
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                (key.trim().to_ascii_lowercase(), value.to_string())
            })
            .collect();

        Ok(Self {
            main_type: main_type.to_ascii_lowercase(),
            sub_type: sub_type.to_ascii_lowercase(),
            parameters,
        })
    }

    /// Returns the boundary parameter if present and non-empty.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameters
            .get("boundary")
            .map(String::as_str)
            .filter(|b| !b.is_empty())
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type == "multipart"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_boundary() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"boundary\"").unwrap();
        assert_eq!(ct.main_type, "multipart");
        assert_eq!(ct.sub_type, "mixed");
        assert!(ct.is_multipart());
        assert_eq!(ct.boundary(), Some("boundary"));
    }

    #[test]
    fn test_parse_bare_boundary() {
        let ct = ContentType::parse("Multipart/Mixed; BOUNDARY=----=_Part_123").unwrap();
        assert_eq!(ct.main_type, "multipart");
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn test_parse_without_boundary() {
        let ct = ContentType::parse("text/plain; charset=\"utf-8\"").unwrap();
        assert!(!ct.is_multipart());
        assert_eq!(ct.boundary(), None);
        assert_eq!(ct.parameters.get("charset").map(String::as_str), Some("utf-8"));
    }

    #[test]
    fn test_parse_empty_boundary() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"\"").unwrap();
        assert_eq!(ct.boundary(), None);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ContentType::parse("").is_err());
        assert!(ContentType::parse("multipart").is_err());
        assert!(ContentType::parse("/mixed").is_err());
    }
}
