use std::io::{self, Write};

use colored::Colorize;
use indicatif::HumanCount;
use serde::Serialize;

use crate::registry::DuplicateRecord;

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Distinct fingerprints registered.
    pub files_scanned: usize,
    /// Duplicate pairs in discovery order.
    pub duplicates: Vec<DuplicateRecord>,
    pub directories_scanned: usize,
    pub revisits_skipped: usize,
    pub errors: usize,
    pub interrupted: bool,
}

impl ScanReport {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Human-readable summary, one duplicate pair per line.
    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        if self.interrupted {
            writeln!(out, "{}", "*** INTERRUPTED, results are partial ***".yellow().bold())?;
        } else {
            writeln!(out, "{}", "*** FINISHED ***".bold())?;
        }
        writeln!(
            out,
            "{} total files scanned in {} directories.",
            HumanCount(self.files_scanned as u64),
            HumanCount(self.directories_scanned as u64)
        )?;
        if self.errors > 0 {
            writeln!(
                out,
                "{}",
                format!("{} entries could not be read.", HumanCount(self.errors as u64)).red()
            )?;
        }

        if !self.has_duplicates() {
            writeln!(out, "{}", "No duplicate files found!".green())?;
            return Ok(());
        }

        writeln!(
            out,
            "{}",
            format!("{} duplicates found:", HumanCount(self.duplicates.len() as u64)).yellow()
        )?;
        for record in &self.duplicates {
            writeln!(
                out,
                "  '{}' == '{}'",
                record.duplicate.display(),
                record.original.display()
            )?;
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}
