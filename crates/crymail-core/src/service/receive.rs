//! Retrieving and parsing the mailbox.

use crymail_mime::MailboxItem;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::transport::Transport;

/// One parsed message together with the index it was retrieved at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailboxEntry {
    /// Retrieval index, starting at 1.
    pub index: u32,
    /// The parsed message.
    pub item: MailboxItem,
}

/// Messages retrieved by one receive, in retrieval order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Mailbox {
    entries: Vec<MailboxEntry>,
}

impl Mailbox {
    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was retrieved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The message retrieved at `index`, if any.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&MailboxItem> {
        self.entries
            .iter()
            .find(|entry| entry.index == index)
            .map(|entry| &entry.item)
    }

    /// Iterates entries in retrieval order.
    pub fn iter(&self) -> std::slice::Iter<'_, MailboxEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Mailbox {
    type Item = &'a MailboxEntry;
    type IntoIter = std::slice::Iter<'a, MailboxEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Mailbox {
    type Item = MailboxEntry;
    type IntoIter = std::vec::IntoIter<MailboxEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Retrieves and parses messages `1..=config.receive.max_messages`.
///
/// Retrieval stops at the first index the transport reports as empty. A
/// failed retrieval is logged and skipped, and the next index is tried.
///
/// # Errors
///
/// Returns the last transport error if retrievals failed and none
/// succeeded.
pub fn receive_mail_list<T: Transport>(config: &Config, transport: &mut T) -> Result<Mailbox> {
    let mut mailbox = Mailbox::default();
    let mut last_error = None;

    for index in 1..=config.receive.max_messages {
        let raw = match transport.retrieve(index) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(index, "End of mailbox");
                break;
            }
            Err(e) => {
                warn!(index, error = %e, "Failed to retrieve message, skipping");
                last_error = Some(e);
                continue;
            }
        };

        let item = MailboxItem::parse(&raw);
        debug!(
            index,
            id = item.identifier(),
            signed = item.signature_attached(),
            "Parsed message"
        );
        mailbox.entries.push(MailboxEntry { index, item });
    }

    if mailbox.is_empty()
        && let Some(e) = last_error
    {
        return Err(e);
    }

    info!(count = mailbox.len(), "Received mailbox");
    Ok(mailbox)
}

/// Retrieves and parses the single message at `index`.
///
/// Unlike [`receive_mail_list`] this is not bounded by
/// `receive.max_messages`. Returns `Ok(None)` past the end of the mailbox.
///
/// # Errors
///
/// Returns an error if the transport fails to retrieve the message.
pub fn receive_item<T: Transport>(transport: &mut T, index: u32) -> Result<Option<MailboxItem>> {
    let Some(raw) = transport.retrieve(index)? else {
        debug!(index, "No message at index");
        return Ok(None);
    };

    let item = MailboxItem::parse(&raw);
    debug!(index, id = item.identifier(), "Parsed message");
    Ok(Some(item))
}
