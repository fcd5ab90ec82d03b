//! Header field lookup over a raw header block.
//!
//! Lookup is an exact, case-sensitive match on `\n<Name>: `. The start of
//! the block counts as following a line break, so the first header line is
//! found as well. The value runs to the next CRLF (or the end of the block).
//! Only the first occurrence is used and folded values are not joined, with
//! the exception of [`unfolded_value`]. [`unfolded_value_ignore_case`] is the
//! looser lookup used for structural headers such as `Content-Type`.

use std::fmt;

/// Header fields copied into a [`MailboxItem`](crate::MailboxItem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// `Message-ID`.
    MessageId,
    /// `From`.
    From,
    /// `Date`.
    Date,
    /// `Subject`.
    Subject,
}

impl HeaderField {
    /// All extracted fields, in extraction order.
    pub const ALL: [Self; 4] = [Self::MessageId, Self::From, Self::Date, Self::Subject];

    /// Header name as it appears on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MessageId => "Message-ID",
            Self::From => "From",
            Self::Date => "Date",
            Self::Subject => "Subject",
        }
    }

    /// Placeholder used when the header is absent.
    #[must_use]
    pub const fn sentinel(self) -> &'static str {
        match self {
            Self::MessageId => "No UID",
            Self::From => "No From",
            Self::Date => "No Date",
            Self::Subject => "No Subject",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte offset just past `<name>: ` for the first occurrence of the header.
fn value_start(block: &str, name: &str) -> Option<usize> {
    let needle = format!("\n{name}: ");
    if block.starts_with(&needle[1..]) {
        return Some(needle.len() - 1);
    }
    block.find(&needle).map(|pos| pos + needle.len())
}

/// Finds the value of the first `name` header in `block`.
#[must_use]
pub fn find_field<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    let value = &block[value_start(block, name)?..];
    Some(value.find("\r\n").map_or(value, |end| &value[..end]))
}

/// Returns the value of `field`, or its sentinel when absent.
#[must_use]
pub fn extract_field(block: &str, field: HeaderField) -> String {
    find_field(block, field.name())
        .unwrap_or_else(|| field.sentinel())
        .to_string()
}

/// Like [`find_field`], but joins continuation lines (those starting with a
/// space or tab) onto the value, separated by a single space.
#[must_use]
pub fn unfolded_value(block: &str, name: &str) -> Option<String> {
    Some(unfold_from(&block[value_start(block, name)?..]))
}

/// Like [`unfolded_value`], but matches the header name ignoring ASCII
/// case and accepts any amount of blank space after the colon.
#[must_use]
pub fn unfolded_value_ignore_case(block: &str, name: &str) -> Option<String> {
    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        if let Some(prefix) = line.get(..name.len())
            && prefix.eq_ignore_ascii_case(name)
            && let Some(rest) = line[name.len()..].strip_prefix(':')
        {
            let value = rest.trim_start_matches([' ', '\t']);
            let start = offset + line.len() - value.len();
            return Some(unfold_from(&block[start..]));
        }
        offset += line.len();
    }
    None
}

/// First line of `text` with its continuation lines appended.
fn unfold_from(text: &str) -> String {
    let mut lines = text.split("\r\n");
    let mut value = lines.next().unwrap_or_default().to_string();

    for line in lines {
        if !line.starts_with([' ', '\t']) {
            break;
        }
        value.push(' ');
        value.push_str(line.trim());
    }

    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BLOCK: &str = concat!(
        "Return-Path: <alice@example.com>\r\n",
        "Message-ID: <1234@example.com>\r\n",
        "From: alice@example.com\r\n",
        "Date: Mon, 19 Oct 2026 10:00:00 +0000\r\n",
        "Subject: Quarterly figures\r\n",
        "Content-Type: multipart/mixed;\r\n",
        "\tboundary=\"xyz\"\r\n",
    );

    #[test]
    fn test_find_field() {
        assert_eq!(find_field(BLOCK, "Message-ID"), Some("<1234@example.com>"));
        assert_eq!(find_field(BLOCK, "From"), Some("alice@example.com"));
        assert_eq!(find_field(BLOCK, "Subject"), Some("Quarterly figures"));
        assert_eq!(find_field(BLOCK, "Cc"), None);
    }

    #[test]
    fn test_find_field_first_line() {
        assert_eq!(
            find_field(BLOCK, "Return-Path"),
            Some("<alice@example.com>")
        );
    }

    #[test]
    fn test_find_field_case_sensitive() {
        assert_eq!(find_field(BLOCK, "subject"), None);
        assert_eq!(find_field("x\r\nMessage-Id: <a>\r\n", "Message-ID"), None);
    }

    #[test]
    fn test_find_field_requires_space_after_colon() {
        assert_eq!(find_field("X: y\r\nSubject:tight\r\n", "Subject"), None);
    }

    #[test]
    fn test_find_field_first_occurrence() {
        let block = "X: y\r\nSubject: one\r\nSubject: two\r\n";
        assert_eq!(find_field(block, "Subject"), Some("one"));
    }

    #[test]
    fn test_find_field_runs_to_end_of_block() {
        assert_eq!(find_field("X: y\r\nSubject: last", "Subject"), Some("last"));
    }

    #[test]
    fn test_find_field_does_not_match_suffix() {
        // "X-From: " must not be mistaken for "From: ".
        assert_eq!(find_field("X: y\r\nX-From: bot\r\n", "From"), None);
    }

    #[test]
    fn test_extract_field_sentinels() {
        let block = "X-Mailer: test\r\n";
        assert_eq!(extract_field(block, HeaderField::MessageId), "No UID");
        assert_eq!(extract_field(block, HeaderField::From), "No From");
        assert_eq!(extract_field(block, HeaderField::Date), "No Date");
        assert_eq!(extract_field(block, HeaderField::Subject), "No Subject");
    }

    #[test]
    fn test_extract_field_present() {
        assert_eq!(
            extract_field(BLOCK, HeaderField::Date),
            "Mon, 19 Oct 2026 10:00:00 +0000"
        );
    }

    #[test]
    fn test_unfolded_value() {
        assert_eq!(
            unfolded_value(BLOCK, "Content-Type").unwrap(),
            "multipart/mixed; boundary=\"xyz\""
        );
        assert_eq!(
            unfolded_value(BLOCK, "From").unwrap(),
            "alice@example.com"
        );
        assert!(unfolded_value(BLOCK, "Cc").is_none());
    }

    #[test]
    fn test_unfolded_value_ignore_case() {
        let block = "X: y\r\ncontent-TYPE:  multipart/mixed;\r\n boundary=b\r\n";
        assert_eq!(
            unfolded_value_ignore_case(block, "Content-Type").unwrap(),
            "multipart/mixed; boundary=b"
        );
        assert_eq!(
            unfolded_value_ignore_case(BLOCK, "content-type").unwrap(),
            "multipart/mixed; boundary=\"xyz\""
        );
        assert!(unfolded_value_ignore_case("X-Content-Type: a/b\r\n", "Content-Type").is_none());
        assert!(unfolded_value_ignore_case(BLOCK, "Cc").is_none());
    }

    #[test]
    fn test_header_field_display() {
        assert_eq!(HeaderField::MessageId.to_string(), "Message-ID");
        assert_eq!(HeaderField::ALL.len(), 4);
    }
}
