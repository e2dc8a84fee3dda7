pub mod cli;
pub mod config;
pub mod error;
pub mod finder;
pub mod fingerprint;
pub mod logging;
pub mod registry;
pub mod report;
pub mod signal;
pub mod walker;

pub use cli::Cli;
pub use config::{Depth, FileConfig, SearchConfig, SuffixFilter};
pub use error::{ConfigError, ScanError};
pub use finder::find_duplicates;
pub use fingerprint::{Blake3Hasher, ContentHasher, Fingerprint, HashAlgorithm, Sha256Hasher};
pub use logging::init_logging;
pub use registry::{DuplicateRecord, FingerprintRegistry, Registration};
pub use report::ScanReport;
pub use walker::{WalkStats, Walker};
