//! Moving raw message bytes in and out.
//!
//! A transport only submits finished messages and hands back raw bytes by
//! retrieval index. All MIME work happens in `crymail_mime`.

mod spool;

pub use spool::{MESSAGE_EXTENSION, SpoolTransport};

use crate::error::Result;

/// Addressing information that travels next to the message bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeMetadata {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
}

impl EnvelopeMetadata {
    /// Creates envelope metadata.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A place messages are submitted to and retrieved from.
pub trait Transport {
    /// Delivers one complete message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed off.
    fn submit(&mut self, raw: &[u8], meta: &EnvelopeMetadata) -> Result<()>;

    /// Fetches the message at `index`, counting from 1 in retrieval order.
    ///
    /// Returns `Ok(None)` once `index` is past the end of the mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is invalid or the message exists but
    /// could not be read.
    fn retrieve(&mut self, index: u32) -> Result<Option<Vec<u8>>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn submit(&mut self, raw: &[u8], meta: &EnvelopeMetadata) -> Result<()> {
        (**self).submit(raw, meta)
    }

    fn retrieve(&mut self, index: u32) -> Result<Option<Vec<u8>>> {
        (**self).retrieve(index)
    }
}
