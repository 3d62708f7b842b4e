//! `keyview fix`: rewrite findings in place.

use super::build_analyzer;
use crate::cli::CommonArgs;
use crate::output::print_fix_report;
use anyhow::Result;
use std::io::Write;

/// Runs the fix command. Returns the process exit code: 1 when a file could
/// not be processed or a fix was rejected, 0 otherwise.
///
/// # Errors
///
/// Returns an error if the analyzer cannot be set up or output fails.
pub fn run_fix<W: Write>(common: &CommonArgs, dry_run: bool, writer: &mut W) -> Result<i32> {
    let analyzer = build_analyzer(common)?;
    let report = analyzer.fix_paths(&common.paths, dry_run);

    if common.json {
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
    } else {
        print_fix_report(writer, &report, dry_run)?;
    }

    let clean = report.file_errors.is_empty() && report.files.iter().all(|f| f.failed.is_empty());
    Ok(i32::from(!clean))
}
