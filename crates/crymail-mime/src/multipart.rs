//! Splitting a raw message into its header block and multipart parts.

use crate::content_type::ContentType;
use crate::header::unfolded_value_ignore_case;
use std::iter::FusedIterator;

/// Separator between a header block and the content that follows it.
pub(crate) const BLANK_LINE: &str = "\r\n\r\n";

/// A raw message split at its first blank line.
///
/// Both halves borrow from the input; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage<'a> {
    header: &'a str,
    body: &'a str,
}

impl<'a> RawMessage<'a> {
    /// Splits `raw` at the first `\r\n\r\n`.
    ///
    /// The header block keeps the CRLF that ends its last line. Returns
    /// `None` if the message has no blank line.
    #[must_use]
    pub fn parse(raw: &'a str) -> Option<Self> {
        let pos = raw.find(BLANK_LINE)?;
        Some(Self {
            header: &raw[..pos + 2],
            body: &raw[pos + BLANK_LINE.len()..],
        })
    }

    /// The header block.
    #[must_use]
    pub const fn header(&self) -> &'a str {
        self.header
    }

    /// Everything after the blank line.
    #[must_use]
    pub const fn body(&self) -> &'a str {
        self.body
    }

    /// Parses the top-level `Content-Type` header, if any.
    ///
    /// The header name is matched case-insensitively.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        let value = unfolded_value_ignore_case(self.header, "Content-Type")?;
        ContentType::parse(&value).ok()
    }

    /// The boundary token from the `Content-Type` header.
    #[must_use]
    pub fn boundary(&self) -> Option<String> {
        self.content_type()?.boundary().map(str::to_string)
    }

    /// Splits the body into parts, falling back to a single unstructured
    /// body when there is no boundary or the delimiter never occurs.
    ///
    /// A body whose only delimiter is the closing one is still multipart,
    /// just with no parts.
    #[must_use]
    pub fn split(&self) -> Structure<'a> {
        let Some(boundary) = self.boundary() else {
            tracing::debug!("No multipart boundary; treating body as plain text");
            return Structure::Unstructured(self.body);
        };

        let parts = Parts::new(self.body, &boundary);
        if !parts.delimiter_found() {
            tracing::debug!(boundary = %boundary, "Boundary delimiter not found in body");
            return Structure::Unstructured(self.body);
        }
        Structure::Multipart(parts)
    }
}

/// Result of [`RawMessage::split`].
#[derive(Debug, Clone)]
pub enum Structure<'a> {
    /// Boundary-delimited parts.
    Multipart(Parts<'a>),
    /// The whole post-header body.
    Unstructured(&'a str),
}

/// Lazy iterator over the raw parts of a multipart body.
///
/// Each `--boundary` occurrence starts a part that ends at the next
/// occurrence or at the end of input. A delimiter immediately followed by
/// `--` closes the body. Text before the first delimiter is skipped. Parts
/// are yielded as borrowed slices that still begin with the line break that
/// ends the delimiter line.
#[derive(Debug, Clone)]
pub struct Parts<'a> {
    rest: &'a str,
    delimiter: String,
    found: bool,
    done: bool,
}

impl<'a> Parts<'a> {
    /// Starts splitting `body` on `--<boundary>`.
    #[must_use]
    pub fn new(body: &'a str, boundary: &str) -> Self {
        let delimiter = format!("--{boundary}");
        match body.find(&delimiter) {
            Some(pos) => Self {
                rest: &body[pos + delimiter.len()..],
                delimiter,
                found: true,
                done: false,
            },
            None => Self {
                rest: "",
                delimiter,
                found: false,
                done: true,
            },
        }
    }

    /// True if the body contained the delimiter at all, closing or not.
    #[must_use]
    pub const fn delimiter_found(&self) -> bool {
        self.found
    }

    /// True if no further parts will be produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.done || self.rest.starts_with("--")
    }
}

impl<'a> Iterator for Parts<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            self.done = true;
            return None;
        }

        if let Some(end) = self.rest.find(&self.delimiter) {
            let part = &self.rest[..end];
            self.rest = &self.rest[end + self.delimiter.len()..];
            Some(part)
        } else {
            self.done = true;
            Some(std::mem::take(&mut self.rest))
        }
    }
}

impl FusedIterator for Parts<'_> {}
