//! Structured view of one retrieved message.

use crate::header::{HeaderField, extract_field};
use crate::multipart::{RawMessage, Structure};
use crate::part::{Part, PartKind, trim_body};

/// Body placeholder when no body can be located.
pub const NO_BODY: &str = "No Body";

/// A parsed incoming message.
///
/// Built once from a raw buffer by [`MailboxItem::parse`] and never changed
/// afterwards. It owns copies of everything it holds, so the raw buffer can
/// be dropped straight away.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MailboxItem {
    identifier: String,
    sender: String,
    date: String,
    subject: String,
    body: String,
    signature_attached: bool,
    malformed_signature: bool,
    signature: Vec<u8>,
}

impl MailboxItem {
    /// Parses a raw message.
    ///
    /// Never fails: missing headers get their sentinel value, a message
    /// without multipart structure has its whole body used as text, and a
    /// missing or undecodable signature leaves `signature_attached` false.
    /// Invalid UTF-8 is replaced with U+FFFD.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);

        let Some(message) = RawMessage::parse(&text) else {
            tracing::debug!(len = raw.len(), "Message has no header/body separator");
            return Self::from_parts(&text, NO_BODY, None, false);
        };

        let mut body = None;
        let mut signature = None;
        let mut malformed = false;

        match message.split() {
            Structure::Unstructured(plain) => body = Some(trim_body(plain)),
            Structure::Multipart(parts) => {
                for part in parts.map(Part::parse) {
                    match part.kind() {
                        PartKind::Text if body.is_none() => body = Some(part.body_text()),
                        PartKind::Signature if signature.is_none() && !malformed => {
                            match part.signature_bytes() {
                                Ok(bytes) if !bytes.is_empty() => signature = Some(bytes),
                                Ok(_) => {
                                    tracing::warn!("Signature attachment is empty");
                                    malformed = true;
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "Signature attachment is not valid base64");
                                    malformed = true;
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        Self::from_parts(
            message.header(),
            body.unwrap_or(NO_BODY),
            signature,
            malformed,
        )
    }

    fn from_parts(
        header: &str,
        body: &str,
        signature: Option<Vec<u8>>,
        malformed_signature: bool,
    ) -> Self {
        let item = Self {
            identifier: extract_field(header, HeaderField::MessageId),
            sender: extract_field(header, HeaderField::From),
            date: extract_field(header, HeaderField::Date),
            subject: extract_field(header, HeaderField::Subject),
            body: body.to_string(),
            signature_attached: signature.is_some(),
            malformed_signature,
            signature: signature.unwrap_or_default(),
        };
        tracing::debug!(
            identifier = %item.identifier,
            signed = item.signature_attached,
            "Parsed mailbox item"
        );
        item
    }

    /// `Message-ID`, or `No UID`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `From`, or `No From`.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// `Date`, or `No Date`.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// `Subject`, or `No Subject`.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Trimmed plain-text body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// True when a non-empty `signature.bin` attachment was decoded.
    #[must_use]
    pub const fn signature_attached(&self) -> bool {
        self.signature_attached
    }

    /// True when a `signature.bin` attachment was present but unusable.
    #[must_use]
    pub const fn malformed_signature(&self) -> bool {
        self.malformed_signature
    }

    /// Decoded signature bytes; empty unless [`signature_attached`](Self::signature_attached).
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}
