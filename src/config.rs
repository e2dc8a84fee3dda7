use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fingerprint::HashAlgorithm;

/// How many directory levels below a root may still be listed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    #[default]
    Unbounded,
    Limited(u32),
}

impl Depth {
    /// Depth left for the children of a directory walked at `self`.
    ///
    /// `None` means the children are out of range and must not be listed.
    pub fn descend(self) -> Option<Depth> {
        match self {
            Depth::Unbounded => Some(Depth::Unbounded),
            Depth::Limited(0) => None,
            Depth::Limited(n) => Some(Depth::Limited(n - 1)),
        }
    }
}

impl From<Option<u32>> for Depth {
    fn from(levels: Option<u32>) -> Self {
        levels.map_or(Depth::Unbounded, Depth::Limited)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Unbounded => f.write_str("unbounded"),
            Depth::Limited(n) => write!(f, "{n}"),
        }
    }
}

/// Exact, case-sensitive file name suffix such as `.mp3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuffixFilter(String);

impl SuffixFilter {
    pub fn new(suffix: impl Into<String>) -> Result<Self, ConfigError> {
        let suffix = suffix.into();
        if suffix.starts_with('.') && suffix.len() > 1 {
            Ok(Self(suffix))
        } else {
            Err(ConfigError::InvalidSuffix(suffix))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, file_name: &OsStr) -> bool {
        file_name.as_encoded_bytes().ends_with(self.0.as_bytes())
    }
}

impl FromStr for SuffixFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SuffixFilter {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SuffixFilter> for String {
    fn from(filter: SuffixFilter) -> Self {
        filter.0
    }
}

/// Parameters of a single run. Built once, never mutated while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: Depth,
    pub suffix: Option<SuffixFilter>,
    pub verbose: bool,
    /// Hashing threads; 1 hashes on the walking thread.
    pub threads: usize,
    pub hash: HashAlgorithm,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: Depth::Unbounded,
            suffix: None,
            verbose: false,
            threads: 1,
            hash: HashAlgorithm::default(),
        }
    }
}

impl SearchConfig {
    /// Whether a file name passes the suffix filter. No filter admits everything.
    pub fn admits(&self, file_name: &OsStr) -> bool {
        self.suffix
            .as_ref()
            .is_none_or(|filter| filter.matches(file_name))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

/// Defaults read from a TOML config file. Command-line flags win over these.
///
/// ```toml
/// depth = 3
/// filter = ".mp3"
/// verbose = false
/// threads = 4
/// hash = "sha256"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub depth: Option<u32>,
    pub filter: Option<SuffixFilter>,
    pub verbose: Option<bool>,
    pub threads: Option<usize>,
    pub hash: Option<HashAlgorithm>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_descends_to_exhaustion() {
        assert_eq!(Depth::Limited(2).descend(), Some(Depth::Limited(1)));
        assert_eq!(Depth::Limited(1).descend(), Some(Depth::Limited(0)));
        assert_eq!(Depth::Limited(0).descend(), None);
        assert_eq!(Depth::Unbounded.descend(), Some(Depth::Unbounded));
        assert_eq!(Depth::from(None), Depth::Unbounded);
        assert_eq!(Depth::from(Some(4)), Depth::Limited(4));
    }

    #[test]
    fn suffix_must_be_dot_and_more() {
        assert!(SuffixFilter::new(".mp3").is_ok());
        assert!(SuffixFilter::new(".").is_err());
        assert!(SuffixFilter::new("mp3").is_err());
        assert!(SuffixFilter::new("").is_err());
    }

    #[test]
    fn suffix_match_is_exact_and_case_sensitive() {
        let filter = SuffixFilter::new(".txt").unwrap();
        assert!(filter.matches(OsStr::new("a.txt")));
        assert!(!filter.matches(OsStr::new("a.txtx")));
        assert!(!filter.matches(OsStr::new("b.md")));
        assert!(!filter.matches(OsStr::new("A.TXT")));
    }

    #[test]
    fn no_filter_admits_everything() {
        let config = SearchConfig::default();
        assert!(config.admits(OsStr::new("anything")));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = SearchConfig {
            threads: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroThreads)));
    }

    #[test]
    fn parses_config_file() {
        let config = FileConfig::parse(
            r#"
            depth = 2
            filter = ".jpg"
            threads = 4
            hash = "sha256"
            "#,
        )
        .unwrap();
        assert_eq!(config.depth, Some(2));
        assert_eq!(config.filter.unwrap().as_str(), ".jpg");
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.hash, Some(HashAlgorithm::Sha256));
        assert_eq!(config.verbose, None);
    }

    #[test]
    fn config_file_rejects_bad_filter_and_unknown_keys() {
        assert!(FileConfig::parse(r#"filter = "jpg""#).is_err());
        assert!(FileConfig::parse("colour = true").is_err());
    }
}
