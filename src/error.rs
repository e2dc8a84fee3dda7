use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with the run configuration. These abort before any scanning starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("filter must be a '.' followed by at least one character, got '{0}'")]
    InvalidSuffix(String),

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("no valid directories to search")]
    NoValidRoots,

    #[error("failed to read config file '{}'", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file '{}'", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to build hashing thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Non-fatal failures during a scan. Each one is logged and counted, and the
/// scan carries on with the next directory or file.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to resolve directory '{}': {source}", path.display())]
    Resolve { path: PathBuf, source: io::Error },

    #[error("failed to list directory '{}': {source}", path.display())]
    ListDirectory {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to read entry in '{}': {source}", dir.display())]
    ReadEntry { dir: PathBuf, source: walkdir::Error },

    #[error("failed to fingerprint '{}': {source}", path.display())]
    Fingerprint { path: PathBuf, source: io::Error },
}
