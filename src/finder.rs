use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::{debug, info};

use crate::config::SearchConfig;
use crate::error::ConfigError;
use crate::report::ScanReport;
use crate::walker::Walker;

/// Scan every root in order and report the duplicates found across all of them.
///
/// Roots that are not existing directories are skipped. Errors met while
/// scanning are logged and counted in the report; only a bad configuration
/// fails the call.
pub fn find_duplicates(
    roots: &[PathBuf],
    config: SearchConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> Result<ScanReport, ConfigError> {
    let mut walker = Walker::new(config)?;
    if let Some(flag) = shutdown_flag {
        walker = walker.with_shutdown_flag(flag);
    }

    let max_depth = walker.config().max_depth;
    for root in roots {
        if !root.is_dir() {
            debug!("'{}' is not a directory, skipping", root.display());
            continue;
        }
        if walker.is_shutdown_requested() {
            info!("Shutdown requested, stopping scan");
            break;
        }
        walker.walk(root, max_depth);
    }

    let stats = walker.stats();
    debug!(
        "Hashed {} files in {} directories ({} revisits skipped, {} errors)",
        stats.files_hashed, stats.directories_scanned, stats.revisits_skipped, stats.errors
    );

    Ok(walker.into_report())
}
