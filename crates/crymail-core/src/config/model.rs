//! Configuration model types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Number of mailbox indices tried by a receive when not configured.
pub const DEFAULT_MAX_MESSAGES: u32 = 8;

/// Top-level configuration, passed explicitly to every service call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Who we send as.
    pub identity: IdentityConfig,
    /// Signing key locations.
    pub keys: KeyConfig,
    /// Spool directories used as the mail transport.
    pub spool: SpoolConfig,
    /// Receive behavior.
    pub receive: ReceiveConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Sender identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Address written to the `From` header.
    pub address: String,
}

/// PEM key file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Public key used to verify received mail.
    pub public_key: PathBuf,
    /// Private key used to sign outgoing mail.
    pub private_key: PathBuf,
}

/// Spool transport directories.
///
/// Pointing both at the same directory gives a loopback mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoolConfig {
    /// Where submitted messages are written.
    pub outbox: PathBuf,
    /// Where messages are retrieved from.
    pub mailbox: PathBuf,
}

/// Receive behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiveConfig {
    /// Highest retrieval index tried.
    pub max_messages: u32,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            public_key: PathBuf::from("public.pem"),
            private_key: PathBuf::from("private.pem"),
        }
    }
}

impl Default for SpoolConfig {
    fn default() -> Self {
        let root = data_dir();
        Self {
            outbox: root.join("outbox"),
            mailbox: root.join("mailbox"),
        }
    }
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }
}

/// Per-user data directory for crymail, falling back to `./crymail`.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crymail")
}
