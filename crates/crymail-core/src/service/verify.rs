//! Checking the signature carried by a received message.

use std::fmt;
use std::path::Path;

use crymail_mime::MailboxItem;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::signing::VerifyingKey;

/// Outcome of verifying a received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    /// The signature matches the body.
    Valid,
    /// A signature is attached but does not match the body.
    Tampered,
    /// No signature attachment was found.
    Unsigned,
    /// A signature attachment was found but could not be decoded.
    Malformed,
}

impl Verification {
    /// Whether the message is signed and the signature checks out.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Valid => "signature valid",
            Self::Tampered => "signature mismatch: message may have been tampered with",
            Self::Unsigned => "no signature attached",
            Self::Malformed => "signature attachment could not be decoded",
        };
        f.write_str(text)
    }
}

/// Verifies `item` against the public key stored at `public_key_path`.
///
/// Unsigned and malformed messages are reported without touching the key.
///
/// # Errors
///
/// Returns an error if a signature needs checking and the key cannot be
/// loaded.
pub fn verify_item(item: &MailboxItem, public_key_path: &Path) -> Result<Verification> {
    if item.malformed_signature() {
        debug!(id = item.identifier(), "Signature attachment is malformed");
        return Ok(Verification::Malformed);
    }
    if !item.signature_attached() {
        debug!(id = item.identifier(), "Message is unsigned");
        return Ok(Verification::Unsigned);
    }

    let key = VerifyingKey::from_pem_file(public_key_path)?;
    if key.verify(item.body().as_bytes(), item.signature()) {
        debug!(id = item.identifier(), "Signature valid");
        Ok(Verification::Valid)
    } else {
        warn!(
            id = item.identifier(),
            from = item.sender(),
            "Signature mismatch"
        );
        Ok(Verification::Tampered)
    }
}
