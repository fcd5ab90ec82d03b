//! # crymail-mime
//!
//! MIME envelope codec for signed mail.
//!
//! Outgoing messages are `multipart/mixed` envelopes holding a plain text
//! part and, optionally, a detached signature as a base64 attachment named
//! `signature.bin`. Incoming messages are parsed back into a
//! [`MailboxItem`] holding the header fields, the text body and the decoded
//! signature bytes.
//!
//! ## Building
//!
//! ```
//! use crymail_mime::MailEnvelope;
//!
//! let raw = MailEnvelope::new("alice@example.com", "bob@example.com", "Hi", "hello")
//!     .signature(vec![0x01, 0x02, 0x03])
//!     .build()?;
//! # Ok::<(), crymail_mime::Error>(())
//! ```
//!
//! ## Parsing
//!
//! ```
//! use crymail_mime::{MailEnvelope, MailboxItem};
//!
//! let raw = MailEnvelope::new("alice@example.com", "bob@example.com", "Hi", "hello")
//!     .signature(vec![0x01, 0x02, 0x03])
//!     .build()?;
//!
//! let item = MailboxItem::parse(&raw);
//! assert_eq!(item.body(), "hello");
//! assert!(item.signature_attached());
//! assert_eq!(item.signature(), &[0x01, 0x02, 0x03]);
//! # Ok::<(), crymail_mime::Error>(())
//! ```
//!
//! Parsing never fails. Missing headers become sentinels such as
//! `No Subject`, a message without multipart structure has its whole body
//! used as text, and a missing signature leaves `signature_attached` false.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod envelope;
mod error;
mod mailbox;
mod multipart;
mod part;

pub mod encoding;
pub mod header;

pub use content_type::ContentType;
pub use envelope::{DATE_FORMAT, DEFAULT_BOUNDARY, MailEnvelope, SIGNATURE_FILENAME};
pub use error::{Error, Result};
pub use header::HeaderField;
pub use mailbox::{MailboxItem, NO_BODY};
pub use multipart::{Parts, RawMessage, Structure};
pub use part::{Part, PartKind, trim_body, trim_signature};
