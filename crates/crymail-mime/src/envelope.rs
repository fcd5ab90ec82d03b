//! Building outgoing multipart messages with a detached signature.

use crate::encoding::encode_base64;
use crate::error::{Error, Result};
use crate::part::signature_disposition;
use chrono::{DateTime, FixedOffset, Local};
use std::fmt::Write as _;

/// Boundary written when the caller does not choose one.
pub const DEFAULT_BOUNDARY: &str = "boundary";

/// File name of the signature attachment.
pub const SIGNATURE_FILENAME: &str = "signature.bin";

/// `strftime` format of the `Date` header.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// An outgoing message, optionally carrying a detached signature over its
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MailEnvelope {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body, written verbatim.
    pub body: String,
    /// Detached signature over `body`.
    pub signature: Option<Vec<u8>>,
    /// Multipart boundary token.
    pub boundary: String,
    /// `Date` header; the local time at build when unset.
    pub date: Option<DateTime<FixedOffset>>,
}

impl MailEnvelope {
    /// Creates an unsigned envelope with the default boundary.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            signature: None,
            boundary: DEFAULT_BOUNDARY.to_string(),
            date: None,
        }
    }

    /// Attaches a detached signature.
    #[must_use]
    pub fn signature(mut self, signature: impl Into<Vec<u8>>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Overrides the boundary token.
    #[must_use]
    pub fn boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = boundary.into();
        self
    }

    /// Fixes the `Date` header.
    #[must_use]
    pub fn date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Renders the complete message.
    ///
    /// The output is a `multipart/mixed` message holding the text part and,
    /// if a signature is set, a base64 `signature.bin` attachment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if a header value or the boundary
    /// contains a line break, or the boundary is empty or contains a quote.
    /// Returns [`Error::EmptySignature`] if an empty signature is attached.
    pub fn build(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let date = self
            .date
            .unwrap_or_else(|| Local::now().fixed_offset())
            .format(DATE_FORMAT);
        let boundary = &self.boundary;
        let mut message = String::with_capacity(self.estimated_len());

        let _ = write!(
            message,
            "Date: {date}\r\n\
             To: {}\r\n\
             From: {}\r\n\
             Subject: {}\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\
             \r\n",
            self.to, self.from, self.subject,
        );

        let _ = write!(
            message,
            "--{boundary}\r\n\
             Content-Type: text/plain; charset=\"utf-8\"\r\n\
             \r\n\
             {}\r\n",
            self.body,
        );

        if let Some(signature) = &self.signature {
            let _ = write!(
                message,
                "\r\n--{boundary}\r\n\
                 Content-Type: application/octet-stream\r\n\
                 Content-Transfer-Encoding: base64\r\n\
                 {}\r\n\
                 \r\n\
                 {}\r\n",
                signature_disposition(),
                encode_base64(signature),
            );
        }

        let _ = write!(message, "\r\n--{boundary}--\r\n");

        tracing::debug!(
            len = message.len(),
            signed = self.signature.is_some(),
            "Built envelope"
        );
        Ok(message.into_bytes())
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("From", &self.from),
            ("To", &self.to),
            ("Subject", &self.subject),
        ] {
            if value.contains(['\r', '\n']) {
                return Err(Error::InvalidHeader(format!("{name} contains a line break")));
            }
        }

        if self.boundary.is_empty() || self.boundary.contains(['\r', '\n', '"']) {
            return Err(Error::InvalidHeader(format!(
                "unusable boundary {:?}",
                self.boundary
            )));
        }

        if self.signature.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::EmptySignature);
        }

        Ok(())
    }

    fn estimated_len(&self) -> usize {
        let signature = self.signature.as_ref().map_or(0, |s| s.len().div_ceil(3) * 4);
        512 + self.from.len() + self.to.len() + self.subject.len() + self.body.len() + signature
    }
}
