//! Mail services.
//!
//! These tie configuration, signing, the MIME codec and a [`Transport`]
//! together. Every call takes the configuration explicitly.
//!
//! [`Transport`]: crate::transport::Transport

mod receive;
mod send;
mod verify;

pub use receive::{Mailbox, MailboxEntry, receive_item, receive_mail_list};
pub use send::send_signed_mail;
pub use verify::{Verification, verify_item};
