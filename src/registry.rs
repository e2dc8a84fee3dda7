//! First-seen-wins fingerprint registry.
//!
//! The registry maps each fingerprint to the first path that produced it and
//! keeps every later collision as a [`DuplicateRecord`], in discovery order.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::error::ScanError;
use crate::fingerprint::{ContentHasher, Fingerprint};

/// A later-discovered file and the first file seen with the same content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub duplicate: PathBuf,
    pub original: PathBuf,
}

/// Result of registering one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First file with this fingerprint.
    New,
    /// Fingerprint was already taken by `original`.
    Duplicate { original: PathBuf },
}

#[derive(Debug, Default)]
struct RegistryState {
    originals: HashMap<Fingerprint, PathBuf>,
    duplicates: Vec<DuplicateRecord>,
}

/// Thread-safe fingerprint registry.
///
/// Both maps live behind one mutex, so the lookup, the insert and the
/// duplicate append for a fingerprint happen in a single critical section.
#[derive(Debug, Default)]
pub struct FingerprintRegistry {
    state: Mutex<RegistryState>,
}

impl FingerprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fingerprint `path` with `hasher` and register it.
    ///
    /// A file that cannot be read leaves the registry untouched.
    pub fn record(
        &self,
        path: &Path,
        hasher: &dyn ContentHasher,
    ) -> Result<(Fingerprint, Registration), ScanError> {
        let fingerprint = hasher
            .fingerprint(path)
            .map_err(|source| ScanError::Fingerprint {
                path: path.to_path_buf(),
                source,
            })?;
        let registration = self.register(fingerprint.clone(), path.to_path_buf());
        Ok((fingerprint, registration))
    }

    /// Atomic check-and-insert of an already computed fingerprint.
    pub fn register(&self, fingerprint: Fingerprint, path: PathBuf) -> Registration {
        let mut guard = self.lock();
        let state = &mut *guard;

        match state.originals.entry(fingerprint) {
            Entry::Occupied(entry) => {
                let original = entry.get().clone();
                state.duplicates.push(DuplicateRecord {
                    duplicate: path,
                    original: original.clone(),
                });
                Registration::Duplicate { original }
            }
            Entry::Vacant(entry) => {
                entry.insert(path);
                Registration::New
            }
        }
    }

    /// Number of distinct fingerprints registered.
    pub fn len(&self) -> usize {
        self.lock().originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn original(&self, fingerprint: &Fingerprint) -> Option<PathBuf> {
        self.lock().originals.get(fingerprint).cloned()
    }

    pub fn duplicates(&self) -> Vec<DuplicateRecord> {
        self.lock().duplicates.clone()
    }

    /// Consume the registry, yielding the distinct count and the duplicates.
    pub fn into_summary(self) -> (usize, Vec<DuplicateRecord>) {
        let state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        (state.originals.len(), state.duplicates)
    }
}
