//! Content fingerprints.
//!
//! A [`Fingerprint`] is the digest of a file's full byte content. The digest
//! itself comes from a [`ContentHasher`], so the registry never cares which
//! algorithm produced it, only that identical bytes always give identical
//! fingerprints.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use clap::ValueEnum;
use log::trace;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    #[cfg(test)]
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Computes the fingerprint of a file by reading it in full.
///
/// Implementations are shared across hashing threads, hence `Send + Sync`.
pub trait ContentHasher: Send + Sync {
    fn fingerprint(&self, path: &Path) -> io::Result<Fingerprint>;
}

/// Feed every byte of `path` to `update`, returning the number of bytes read.
fn stream_file(path: &Path, mut update: impl FnMut(&[u8])) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0; READ_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        update(&buffer[..bytes_read]);
        total_bytes += bytes_read as u64;
    }

    Ok(total_bytes)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

impl ContentHasher for Blake3Hasher {
    fn fingerprint(&self, path: &Path) -> io::Result<Fingerprint> {
        let mut hasher = blake3::Hasher::new();
        let bytes = stream_file(path, |chunk| {
            hasher.update(chunk);
        })?;
        trace!("blake3 over {} bytes of '{}'", bytes, path.display());
        Ok(Fingerprint::from_bytes(hasher.finalize().as_bytes()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn fingerprint(&self, path: &Path) -> io::Result<Fingerprint> {
        let mut hasher = Sha256::new();
        let bytes = stream_file(path, |chunk| hasher.update(chunk))?;
        trace!("sha256 over {} bytes of '{}'", bytes, path.display());
        Ok(Fingerprint::from_bytes(&hasher.finalize()))
    }
}

/// Hash algorithms selectable from the command line or config file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    pub fn hasher(self) -> Box<dyn ContentHasher> {
        match self {
            Self::Blake3 => Box::new(Blake3Hasher),
            Self::Sha256 => Box::new(Sha256Hasher),
        }
    }
}
