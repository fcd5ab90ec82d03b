//! Composing, signing and submitting outgoing mail.

use crymail_mime::{MailEnvelope, trim_body};
use tracing::info;

use crate::config::{Config, validate_config};
use crate::error::{Error, Result};
use crate::signing::sign_message;
use crate::transport::{EnvelopeMetadata, Transport};

/// Signs `body`, wraps it in a MIME envelope and submits it.
///
/// The body is trimmed the same way the receiving side trims it, so the
/// signature covers exactly the text the recipient will recover. Returns
/// the submitted message bytes.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the recipient is
/// empty, the private key cannot be used, the envelope cannot be built or
/// the transport fails.
pub fn send_signed_mail<T: Transport>(
    config: &Config,
    transport: &mut T,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Vec<u8>> {
    validate_config(config).map_err(Error::Validation)?;

    let to = to.trim();
    if to.is_empty() {
        return Err(Error::InvalidAddress("No recipient specified".into()));
    }

    let body = trim_body(body);
    let signature = sign_message(body.as_bytes(), &config.keys.private_key)?;

    let from = config.identity.address.trim();
    let raw = MailEnvelope::new(from, to, subject, body)
        .signature(signature)
        .build()?;

    transport.submit(&raw, &EnvelopeMetadata::new(from, to))?;

    info!(to, subject, bytes = raw.len(), "Sent signed message");
    Ok(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use crymail_mime::MailboxItem;

    use super::*;
    use crate::signing::{default_key_paths, generate_key_pair, verify_signature};

    /// Transport that records submissions.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Vec<(Vec<u8>, EnvelopeMetadata)>,
    }

    impl Transport for RecordingTransport {
        fn submit(&mut self, raw: &[u8], meta: &EnvelopeMetadata) -> Result<()> {
            self.sent.push((raw.to_vec(), meta.clone()));
            Ok(())
        }

        fn retrieve(&mut self, _index: u32) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    fn config_in(dir: &Path) -> Config {
        let (public, private) = default_key_paths(dir);
        generate_key_pair(&public, &private).unwrap();

        let mut config = Config::default();
        config.identity.address = "alice@example.com".to_string();
        config.keys.public_key = public;
        config.keys.private_key = private;
        config
    }

    #[test]
    fn test_send_signs_and_submits() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut transport = RecordingTransport::default();

        let raw =
            send_signed_mail(&config, &mut transport, "bob@example.com", "Hi", "pay 100").unwrap();

        assert_eq!(transport.sent.len(), 1);
        let (submitted, meta) = &transport.sent[0];
        assert_eq!(submitted, &raw);
        assert_eq!(meta.from, "alice@example.com");
        assert_eq!(meta.to, "bob@example.com");

        let item = MailboxItem::parse(&raw);
        assert_eq!(item.body(), "pay 100");
        assert_eq!(item.sender(), "alice@example.com");
        assert!(item.signature_attached());
        assert!(
            verify_signature(b"pay 100", item.signature(), &config.keys.public_key).unwrap()
        );
    }

    #[test]
    fn test_send_signs_trimmed_body() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut transport = RecordingTransport::default();

        let raw = send_signed_mail(
            &config,
            &mut transport,
            "bob@example.com",
            "Hi",
            "pay 100\r\n\r\n",
        )
        .unwrap();

        let item = MailboxItem::parse(&raw);
        assert_eq!(item.body(), "pay 100");
        assert!(
            verify_signature(b"pay 100", item.signature(), &config.keys.public_key).unwrap()
        );
    }

    #[test]
    fn test_send_requires_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut transport = RecordingTransport::default();

        let err = send_signed_mail(&config, &mut transport, "  ", "Hi", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn test_send_rejects_invalid_config() {
        let mut transport = RecordingTransport::default();

        let err = send_signed_mail(
            &Config::default(),
            &mut transport,
            "bob@example.com",
            "Hi",
            "x",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn test_send_missing_private_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.keys.private_key = dir.path().join("missing.pem");
        let mut transport = RecordingTransport::default();

        let err =
            send_signed_mail(&config, &mut transport, "bob@example.com", "Hi", "x").unwrap_err();
        assert!(matches!(err, Error::KeyFile { .. }));
        assert!(transport.sent.is_empty());
    }
}
