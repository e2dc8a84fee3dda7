//! Depth-limited recursive directory walk.
//!
//! The [`Walker`] owns all per-run state: the set of directories already
//! processed, the fingerprint registry and the hasher. Each directory is
//! listed once, its files are fingerprinted, it is marked visited, and only
//! then are its subdirectories walked. Marking before descending means a
//! directory reachable again from below is skipped rather than rescanned.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rayon::ThreadPool;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{Depth, SearchConfig};
use crate::error::{ConfigError, ScanError};
use crate::fingerprint::{ContentHasher, Fingerprint};
use crate::registry::{FingerprintRegistry, Registration};
use crate::report::ScanReport;

/// Counters collected while walking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub directories_scanned: usize,
    pub revisits_skipped: usize,
    pub files_hashed: usize,
    pub errors: usize,
}

fn is_set(flag: Option<&Arc<AtomicBool>>) -> bool {
    flag.is_some_and(|f| f.load(Ordering::SeqCst))
}

/// One directory's entries, classified at listing time.
#[derive(Debug, Default)]
struct DirListing {
    entries: usize,
    files: Vec<PathBuf>,
    subdirs: Vec<PathBuf>,
}

pub struct Walker {
    config: SearchConfig,
    hasher: Box<dyn ContentHasher>,
    registry: FingerprintRegistry,
    visited: HashSet<PathBuf>,
    pool: Option<ThreadPool>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    stats: WalkStats,
}

impl Walker {
    /// Build a walker using the hash algorithm named in `config`.
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        let hasher = config.hash.hasher();
        Self::with_hasher(config, hasher)
    }

    pub fn with_hasher(
        config: SearchConfig,
        hasher: Box<dyn ContentHasher>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = if config.threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.threads)
                    .thread_name(|i| format!("hash-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            config,
            hasher,
            registry: FingerprintRegistry::new(),
            visited: HashSet::new(),
            pool,
            shutdown_flag: None,
            stats: WalkStats::default(),
        })
    }

    /// Stop walking once `flag` is set; whatever was found so far is kept.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    pub fn is_shutdown_requested(&self) -> bool {
        is_set(self.shutdown_flag.as_ref())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn registry(&self) -> &FingerprintRegistry {
        &self.registry
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    #[cfg(test)]
    fn has_visited(&self, dir: &Path) -> bool {
        fs::canonicalize(dir).is_ok_and(|canonical| self.visited.contains(&canonical))
    }

    /// Walk `root` and everything below it that `depth` allows.
    ///
    /// Failures inside the subtree are logged and counted, never returned.
    pub fn walk(&mut self, root: &Path, depth: Depth) {
        if self.is_shutdown_requested() {
            return;
        }

        let canonical = match fs::canonicalize(root) {
            Ok(path) => path,
            Err(source) => {
                self.report_error(ScanError::Resolve {
                    path: root.to_path_buf(),
                    source,
                });
                return;
            }
        };

        if self.visited.contains(&canonical) {
            info!("Already processed {}, skipping", canonical.display());
            self.stats.revisits_skipped += 1;
            return;
        }

        let listing = match self.list_directory(&canonical) {
            Ok(listing) => listing,
            Err(e) => {
                self.report_error(e);
                return;
            }
        };
        info!("Scanning {}: {} entries", canonical.display(), listing.entries);
        self.stats.directories_scanned += 1;

        let candidates: Vec<PathBuf> = listing
            .files
            .into_iter()
            .filter(|path| path.file_name().is_some_and(|name| self.config.admits(name)))
            .collect();
        self.record_files(candidates);

        self.visited.insert(canonical);

        let Some(child_depth) = depth.descend() else {
            if !listing.subdirs.is_empty() {
                debug!(
                    "Depth exhausted, not descending into {} subdirectories",
                    listing.subdirs.len()
                );
            }
            return;
        };
        for subdir in listing.subdirs {
            self.walk(&subdir, child_depth);
        }
    }

    /// List `dir` without recursing, sorted by file name so repeated runs over
    /// the same tree see the same order.
    fn list_directory(&mut self, dir: &Path) -> Result<DirListing, ScanError> {
        let mut listing = DirListing::default();
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() == 0 => {
                    return Err(ScanError::ListDirectory {
                        path: dir.to_path_buf(),
                        source,
                    });
                }
                Err(source) => {
                    listing.entries += 1;
                    self.report_error(ScanError::ReadEntry {
                        dir: dir.to_path_buf(),
                        source,
                    });
                    continue;
                }
            };

            listing.entries += 1;
            let file_type = entry.file_type();
            if file_type.is_file() {
                listing.files.push(entry.into_path());
            } else if file_type.is_dir() {
                listing.subdirs.push(entry.into_path());
            } else {
                debug!("Skipping non-regular entry '{}'", entry.path().display());
            }
        }

        Ok(listing)
    }

    /// Fingerprint and register one directory's candidate files.
    ///
    /// With a thread pool the hashing runs in parallel, but registration
    /// still happens here in listing order so the duplicates come out the
    /// same as a sequential run.
    fn record_files(&mut self, candidates: Vec<PathBuf>) {
        match &self.pool {
            None => {
                for path in candidates {
                    if self.is_shutdown_requested() {
                        return;
                    }
                    match self.registry.record(&path, self.hasher.as_ref()) {
                        Ok((fingerprint, registration)) => {
                            self.note_registration(&path, &fingerprint, &registration)
                        }
                        Err(e) => self.report_error(e),
                    }
                }
            }
            Some(pool) => {
                let hasher = self.hasher.as_ref();
                let shutdown_flag = self.shutdown_flag.as_ref();
                // Files left unhashed after a shutdown request come back as `None`.
                let hashed: Vec<(PathBuf, Option<Result<Fingerprint, ScanError>>)> =
                    pool.install(|| {
                        candidates
                            .into_par_iter()
                            .map(|path| {
                                if is_set(shutdown_flag) {
                                    return (path, None);
                                }
                                let result = hasher.fingerprint(&path).map_err(|source| {
                                    ScanError::Fingerprint {
                                        path: path.clone(),
                                        source,
                                    }
                                });
                                (path, Some(result))
                            })
                            .collect()
                    });

                for (path, result) in hashed {
                    let Some(result) = result else {
                        return;
                    };
                    if self.is_shutdown_requested() {
                        return;
                    }
                    match result {
                        Ok(fingerprint) => {
                            let registration =
                                self.registry.register(fingerprint.clone(), path.clone());
                            self.note_registration(&path, &fingerprint, &registration);
                        }
                        Err(e) => self.report_error(e),
                    }
                }
            }
        }
    }

    fn note_registration(
        &mut self,
        path: &Path,
        fingerprint: &Fingerprint,
        registration: &Registration,
    ) {
        self.stats.files_hashed += 1;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        debug!("\t{name}: {fingerprint}");
        if let Registration::Duplicate { original } = registration {
            debug!("'{}' duplicates '{}'", path.display(), original.display());
        }
    }

    fn report_error(&mut self, error: ScanError) {
        warn!("{error}");
        self.stats.errors += 1;
    }

    /// Finish the run and produce the report.
    pub fn into_report(self) -> ScanReport {
        let interrupted = self.is_shutdown_requested();
        let (files_scanned, duplicates) = self.registry.into_summary();
        ScanReport {
            files_scanned,
            duplicates,
            directories_scanned: self.stats.directories_scanned,
            revisits_skipped: self.stats.revisits_skipped,
            errors: self.stats.errors,
            interrupted,
        }
    }
}
