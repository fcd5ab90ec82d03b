//! Detached message signatures.
//!
//! Keys are RSA-2048 stored as PEM files. A signature covers the SHA-256
//! digest of the message, signed with an RSA/SHA-256 signer, so the
//! signed input is the digest rather than the raw text. Signatures made by
//! other tools using the same scheme verify here and vice versa.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::Rsa;
use openssl::sign::{Signer, Verifier};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Modulus size of generated keys.
pub const RSA_BITS: u32 = 2048;

/// Generates a new key pair and writes both halves as PEM.
///
/// The public key is written as `SubjectPublicKeyInfo`, the private key as
/// unencrypted PKCS#8. On Unix the private key file is created with mode
/// `0600`. Existing files are overwritten.
///
/// # Errors
///
/// Returns an error if key generation fails or either file cannot be
/// written.
pub fn generate_key_pair(public_path: &Path, private_path: &Path) -> Result<()> {
    info!(bits = RSA_BITS, "Generating RSA key pair");
    let key = PKey::from_rsa(Rsa::generate(RSA_BITS)?)?;

    let private_pem = key.private_key_to_pem_pkcs8()?;
    let public_pem = key.public_key_to_pem()?;

    write_private(private_path, &private_pem).map_err(|source| Error::KeyFile {
        path: private_path.to_path_buf(),
        source,
    })?;
    fs::write(public_path, &public_pem).map_err(|source| Error::KeyFile {
        path: public_path.to_path_buf(),
        source,
    })?;

    info!(
        public = %public_path.display(),
        private = %private_path.display(),
        "Wrote key pair"
    );
    Ok(())
}

#[cfg(unix)]
fn write_private(path: &Path, pem: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(pem)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, pem: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(pem)?;
    file.sync_all()
}

fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::KeyFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Private half of a key pair, used to produce signatures.
pub struct SigningKey {
    key: PKey<Private>,
}

impl SigningKey {
    /// Loads a PEM private key (PKCS#8 or traditional RSA).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a
    /// private key.
    pub fn from_pem_file(path: &Path) -> Result<Self> {
        let pem = read_key_file(path)?;
        Self::from_pem(&pem)
    }

    /// Parses a PEM private key from memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a PEM private key.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        Ok(Self {
            key: PKey::private_key_from_pem(pem)?,
        })
    }

    /// Signs `message`, returning the raw signature bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing operation fails.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let digest = openssl::sha::sha256(message);
        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        let signature = signer.sign_oneshot_to_vec(&digest)?;
        debug!(
            message_len = message.len(),
            signature_len = signature.len(),
            "Signed message"
        );
        Ok(signature)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("bits", &self.key.bits())
            .finish_non_exhaustive()
    }
}

/// Public half of a key pair, used to check signatures.
pub struct VerifyingKey {
    key: PKey<Public>,
}

impl VerifyingKey {
    /// Loads a PEM public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a
    /// public key.
    pub fn from_pem_file(path: &Path) -> Result<Self> {
        let pem = read_key_file(path)?;
        Self::from_pem(&pem)
    }

    /// Parses a PEM public key from memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a PEM public key.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        Ok(Self {
            key: PKey::public_key_from_pem(pem)?,
        })
    }

    /// Checks `signature` against `message`.
    ///
    /// Anything other than a matching signature, including garbage bytes
    /// of the wrong length, yields `false`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let digest = openssl::sha::sha256(message);
        let outcome = Verifier::new(MessageDigest::sha256(), &self.key)
            .and_then(|mut verifier| verifier.verify_oneshot(signature, &digest));

        match outcome {
            Ok(valid) => {
                debug!(valid, "Checked signature");
                valid
            }
            Err(e) => {
                debug!(error = %e, "Signature rejected by verifier");
                false
            }
        }
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("bits", &self.key.bits())
            .finish_non_exhaustive()
    }
}

/// Signs `message` with the private key stored at `private_path`.
///
/// # Errors
///
/// Returns an error if the key cannot be loaded or signing fails.
pub fn sign_message(message: &[u8], private_path: &Path) -> Result<Vec<u8>> {
    SigningKey::from_pem_file(private_path)?.sign(message)
}

/// Checks `signature` over `message` with the public key at `public_path`.
///
/// # Errors
///
/// Returns an error only if the key cannot be loaded; a mismatch is
/// `Ok(false)`.
pub fn verify_signature(message: &[u8], signature: &[u8], public_path: &Path) -> Result<bool> {
    Ok(VerifyingKey::from_pem_file(public_path)?.verify(message, signature))
}

/// Paths of a key pair inside `dir`, using the default file names.
#[must_use]
pub fn default_key_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("public.pem"), dir.join("private.pem"))
}
