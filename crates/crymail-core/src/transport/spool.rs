//! Directory-backed transport.
//!
//! Submitted messages land in the outbox as `000001.eml`, `000002.eml`, ...
//! Retrieval reads `.eml` files from the mailbox directory in file name
//! order. Pointing outbox and mailbox at the same directory loops sent mail
//! straight back for reading.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{EnvelopeMetadata, Transport};
use crate::config::SpoolConfig;
use crate::error::{Error, Result};

/// File extension of spooled messages.
pub const MESSAGE_EXTENSION: &str = "eml";

/// Transport that reads and writes message files on the local filesystem.
#[derive(Debug, Clone)]
pub struct SpoolTransport {
    outbox: PathBuf,
    mailbox: PathBuf,
}

impl SpoolTransport {
    /// Creates a transport over the given directories.
    ///
    /// Directories are created lazily on first submit.
    #[must_use]
    pub fn new(outbox: impl Into<PathBuf>, mailbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: outbox.into(),
            mailbox: mailbox.into(),
        }
    }

    /// Creates a transport from the `[spool]` config section.
    #[must_use]
    pub fn from_config(config: &SpoolConfig) -> Self {
        Self::new(&config.outbox, &config.mailbox)
    }

    /// Outbox directory.
    #[must_use]
    pub fn outbox(&self) -> &Path {
        &self.outbox
    }

    /// Mailbox directory.
    #[must_use]
    pub fn mailbox(&self) -> &Path {
        &self.mailbox
    }

    /// Sorted `.eml` files in `dir`. A missing directory is empty.
    fn messages_in(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(MESSAGE_EXTENSION)
            {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// One past the highest numbered message in the outbox.
    fn next_sequence(&self) -> Result<u64> {
        let highest = Self::messages_in(&self.outbox)?
            .iter()
            .filter_map(|path| path.file_stem()?.to_str()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }
}

impl Transport for SpoolTransport {
    fn submit(&mut self, raw: &[u8], meta: &EnvelopeMetadata) -> Result<()> {
        fs::create_dir_all(&self.outbox)?;

        let seq = self.next_sequence()?;
        let path = self.outbox.join(format!("{seq:06}.{MESSAGE_EXTENSION}"));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(raw)?;
        file.sync_all()?;

        info!(
            path = %path.display(),
            from = %meta.from,
            to = %meta.to,
            bytes = raw.len(),
            "Spooled outgoing message"
        );
        Ok(())
    }

    fn retrieve(&mut self, index: u32) -> Result<Option<Vec<u8>>> {
        if index == 0 {
            return Err(Error::Transport("message indices start at 1".to_string()));
        }

        let files = Self::messages_in(&self.mailbox)?;
        let Some(path) = usize::try_from(index - 1)
            .ok()
            .and_then(|position| files.get(position))
        else {
            debug!(index, available = files.len(), "No message at index");
            return Ok(None);
        };

        let raw = fs::read(path)?;
        debug!(index, path = %path.display(), bytes = raw.len(), "Retrieved message");
        Ok(Some(raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn meta() -> EnvelopeMetadata {
        EnvelopeMetadata::new("alice@example.com", "bob@example.com")
    }

    #[test]
    fn test_submit_numbers_files_sequentially() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("out");
        let mut spool = SpoolTransport::new(&outbox, dir.path().join("in"));

        spool.submit(b"first", &meta()).unwrap();
        spool.submit(b"second", &meta()).unwrap();

        assert_eq!(fs::read(outbox.join("000001.eml")).unwrap(), b"first");
        assert_eq!(fs::read(outbox.join("000002.eml")).unwrap(), b"second");
    }

    #[test]
    fn test_submit_continues_after_highest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("000007.eml"), b"old").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let mut spool = SpoolTransport::new(dir.path(), dir.path());
        spool.submit(b"new", &meta()).unwrap();

        assert_eq!(fs::read(dir.path().join("000008.eml")).unwrap(), b"new");
    }

    #[test]
    fn test_retrieve_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.eml"), b"two").unwrap();
        fs::write(dir.path().join("a.eml"), b"one").unwrap();
        fs::write(dir.path().join("c.txt"), b"skip").unwrap();

        let mut spool = SpoolTransport::new(dir.path().join("out"), dir.path());
        assert_eq!(spool.retrieve(1).unwrap().unwrap(), b"one");
        assert_eq!(spool.retrieve(2).unwrap().unwrap(), b"two");
        assert!(spool.retrieve(3).unwrap().is_none());
    }

    #[test]
    fn test_retrieve_missing_mailbox_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut spool = SpoolTransport::new(dir.path(), dir.path().join("absent"));
        assert!(spool.retrieve(1).unwrap().is_none());
    }

    #[test]
    fn test_retrieve_index_zero_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut spool = SpoolTransport::new(dir.path(), dir.path());
        assert!(matches!(spool.retrieve(0), Err(Error::Transport(_))));
    }

    #[test]
    fn test_loopback() {
        let dir = tempfile::tempdir().unwrap();
        let mut spool = SpoolTransport::new(dir.path(), dir.path());

        spool.submit(b"hello", &meta()).unwrap();
        assert_eq!(spool.retrieve(1).unwrap().unwrap(), b"hello");
    }
}
