//! `keyview check`: report findings.

use super::build_analyzer;
use crate::cli::CommonArgs;
use crate::output::{print_exclusion_list, print_report};
use anyhow::Result;
use std::io::Write;

/// Runs the check command. Returns the process exit code: 1 when findings
/// exist, 0 otherwise.
///
/// # Errors
///
/// Returns an error if the analyzer cannot be set up or output fails.
pub fn run_check<W: Write>(common: &CommonArgs, writer: &mut W) -> Result<i32> {
    let analyzer = build_analyzer(common)?;
    let result = analyzer.analyze_paths(&common.paths);

    if common.json {
        serde_json::to_writer_pretty(&mut *writer, &result)?;
        writeln!(writer)?;
    } else {
        if common.verbose {
            print_exclusion_list(writer, &analyzer.exclude_folders)?;
        }
        print_report(writer, &result)?;
    }

    Ok(i32::from(!result.findings.is_empty()))
}
