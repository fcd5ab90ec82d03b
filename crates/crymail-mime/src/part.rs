//! Classification and cleanup of individual multipart parts.

use crate::encoding::decode_base64;
use crate::envelope::SIGNATURE_FILENAME;
use crate::error::Result;
use crate::multipart::BLANK_LINE;

const TEXT_PLAIN: &str = "Content-Type: text/plain";

/// What a part carries, judged from its header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// The plain-text body.
    Text,
    /// The detached `signature.bin` attachment.
    Signature,
    /// Anything else; ignored.
    Other,
}

/// One part of a multipart body, split into headers and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part<'a> {
    /// Part header block, including the line break left over from the
    /// delimiter line.
    pub header: &'a str,
    /// Everything after the part's blank line, up to the next delimiter.
    pub payload: &'a str,
}

impl<'a> Part<'a> {
    /// Splits a raw part at its first blank line.
    ///
    /// A part without a blank line is all header and has an empty payload.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.find(BLANK_LINE) {
            Some(pos) => Self {
                header: &raw[..pos + 2],
                payload: &raw[pos + BLANK_LINE.len()..],
            },
            None => Self {
                header: raw,
                payload: "",
            },
        }
    }

    /// Classifies the part by its `Content-Type` and `Content-Disposition`.
    #[must_use]
    pub fn kind(&self) -> PartKind {
        if is_text_plain(self.header) {
            PartKind::Text
        } else if self.header.contains(&signature_disposition()) {
            PartKind::Signature
        } else {
            PartKind::Other
        }
    }

    /// The payload with delimiter artifacts removed, see [`trim_body`].
    #[must_use]
    pub fn body_text(&self) -> &'a str {
        trim_body(self.payload)
    }

    /// Decodes the payload as a base64 signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn signature_bytes(&self) -> Result<Vec<u8>> {
        let encoded: String = trim_signature(self.payload)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        decode_base64(&encoded)
    }
}

/// `Content-Disposition` line that marks the signature attachment.
pub(crate) fn signature_disposition() -> String {
    format!("Content-Disposition: attachment; filename=\"{SIGNATURE_FILENAME}\"")
}

/// `Content-Type: text/plain` followed by parameters or the end of the line.
fn is_text_plain(header: &str) -> bool {
    header.match_indices(TEXT_PLAIN).any(|(pos, _)| {
        let rest = &header[pos + TEXT_PLAIN.len()..];
        rest.is_empty() || rest.starts_with(';') || rest.starts_with("\r\n")
    })
}

const fn is_body_delimiter(c: char) -> bool {
    matches!(c, '\n' | '\r' | '-')
}

const fn is_signature_delimiter(c: char) -> bool {
    matches!(c, '\n' | '\r' | '-' | ' ')
}

/// Strips leading and trailing runs of `\n`, `\r` and `-`.
///
/// Interior content is never touched, so `trim_body(trim_body(s))` equals
/// `trim_body(s)`.
#[must_use]
pub fn trim_body(text: &str) -> &str {
    text.trim_matches(is_body_delimiter)
}

/// Strips a trailing run of `\n`, `\r`, `-` and space.
#[must_use]
pub fn trim_signature(text: &str) -> &str {
    text.trim_end_matches(is_signature_delimiter)
}
