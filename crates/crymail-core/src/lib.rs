//! # crymail-core
//!
//! Signing, configuration, transport and mail services for crymail.
//!
//! This crate provides:
//! - RSA key generation and detached signatures ([`signing`])
//! - TOML configuration with validation ([`config`])
//! - A transport abstraction with a local spool implementation ([`transport`])
//! - Send, receive and verify services ([`service`])
//!
//! MIME building and parsing live in `crymail_mime`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod service;
pub mod signing;
pub mod transport;

pub use config::{Config, ValidationError, load_config, load_config_from, save_config_to};
pub use error::{Error, Result};
pub use service::{
    Mailbox, MailboxEntry, Verification, receive_item, receive_mail_list, send_signed_mail,
    verify_item,
};
pub use signing::{SigningKey, VerifyingKey, generate_key_pair, sign_message, verify_signature};
pub use transport::{EnvelopeMetadata, SpoolTransport, Transport};

pub use crymail_mime::MailboxItem;
