use std::path::PathBuf;

use clap::Parser;
use log::warn;

use crate::config::{Depth, FileConfig, SearchConfig, SuffixFilter};
use crate::error::ConfigError;
use crate::fingerprint::HashAlgorithm;

#[derive(Parser, Debug)]
#[command(name = "dupe-finder", version)]
#[command(about = "Find files with identical content under one or more directories")]
pub struct Cli {
    /// Directories to search; arguments that are not directories are ignored
    #[arg(required = true, value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Maximum recursion depth (0 = only files directly in each directory)
    #[arg(short = 'r', long = "depth", value_name = "LEVELS")]
    pub depth: Option<u32>,

    /// Only consider files whose name ends with this suffix, e.g. .mp3
    #[arg(short = 'f', long = "filter", value_name = "SUFFIX")]
    pub filter: Option<SuffixFilter>,

    /// Print every file's fingerprint and debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of threads used for hashing (default: 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Fingerprint algorithm
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub hash: Option<HashAlgorithm>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// TOML file with default settings; flags given here take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge the flags over the optional config file into a run configuration.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(self.merge(file))
    }

    fn merge(&self, file: FileConfig) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            max_depth: Depth::from(self.depth.or(file.depth)),
            suffix: self.filter.clone().or(file.filter),
            verbose: self.verbose || file.verbose.unwrap_or(false),
            threads: self.threads.or(file.threads).unwrap_or(defaults.threads),
            hash: self.hash.or(file.hash).unwrap_or(defaults.hash),
        }
    }

    /// The positional arguments that are directories, in the order given.
    ///
    /// Anything else is dropped with a warning. Having nothing left is fatal.
    pub fn search_roots(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let roots: Vec<PathBuf> = self
            .paths
            .iter()
            .filter(|path| {
                let is_dir = path.is_dir();
                if !is_dir {
                    warn!("Ignoring '{}': not a directory", path.display());
                }
                is_dir
            })
            .cloned()
            .collect();

        if roots.is_empty() {
            return Err(ConfigError::NoValidRoots);
        }
        Ok(roots)
    }
}
