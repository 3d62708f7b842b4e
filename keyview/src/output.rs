//! Human-readable reports for `check` and `fix`.

use crate::analyzer::{AnalysisResult, AnalysisSummary, FileError, FixReport};
use crate::rules::Finding;
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

/// Print which folders are skipped while walking.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_exclusion_list(writer: &mut impl Write, folders: &[String]) -> std::io::Result<()> {
    let mut builtin: Vec<&str> = crate::constants::DEFAULT_EXCLUDE_FOLDERS()
        .iter()
        .copied()
        .collect();
    builtin.sort_unstable();
    writeln!(
        writer,
        "{} {}",
        "Always skipped:".dimmed(),
        builtin.join(", ").dimmed()
    )?;
    if !folders.is_empty() {
        writeln!(writer, "{} {}", "Excluding:".yellow().bold(), folders.join(", "))?;
    }
    Ok(())
}

/// Print the report banner.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "╔════════════════════════════════════════╗".cyan())?;
    writeln!(writer, "{}", "║  Dictionary View Analysis Results      ║".cyan().bold())?;
    writeln!(writer, "{}", "╚════════════════════════════════════════╝".cyan())?;
    writeln!(writer)?;
    Ok(())
}

/// Print how much source was scanned.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_analysis_stats(
    writer: &mut impl Write,
    summary: &AnalysisSummary,
) -> std::io::Result<()> {
    let scanned = format!(
        "Scanned {} C# files, {} lines",
        summary.total_files, summary.total_lines_analyzed
    );
    writeln!(writer, "{}", scanned.dimmed())?;
    if summary.skipped_generated > 0 {
        let skipped = format!("Skipped {} generated files", summary.skipped_generated);
        writeln!(writer, "{}", skipped.dimmed())?;
    }
    writeln!(writer)?;
    Ok(())
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

fn severity_color(severity: &str) -> Color {
    match severity {
        "HIGH" => Color::Red,
        "MEDIUM" => Color::Yellow,
        "LOW" => Color::Blue,
        _ => Color::White,
    }
}

fn location(finding: &Finding) -> String {
    format!(
        "{}:{}:{}",
        normalize_display_path(&finding.file),
        finding.line,
        finding.col
    )
}

/// Print findings as a table, one row per projection.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_findings(
    writer: &mut impl Write,
    title: &str,
    findings: &[Finding],
) -> std::io::Result<()> {
    if findings.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", title.bold().underline())?;
    let mut table = styled_table(&["Location", "Rule", "Suggestion", "Severity"]);
    for finding in findings {
        table.add_row(vec![
            Cell::new(location(finding)).add_attribute(Attribute::Bold),
            Cell::new(&finding.rule_id).add_attribute(Attribute::Dim),
            Cell::new(&finding.message),
            Cell::new(&finding.severity).fg(severity_color(&finding.severity)),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print files that could not be read or parsed.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_errors(writer: &mut impl Write, errors: &[FileError]) -> std::io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    writeln!(writer, "\n{}", "Unreadable Files".bold().underline().red())?;
    let mut table = styled_table(&["File", "Reason"]);
    for error in errors {
        table.add_row(vec![
            Cell::new(normalize_display_path(&error.file)),
            Cell::new(&error.error).fg(Color::Red),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the full `check` report.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    print_header(writer)?;
    print_analysis_stats(writer, &result.analysis_summary)?;

    if result.findings.is_empty() && result.file_errors.is_empty() {
        writeln!(writer, "{}", "[OK] No issues found.".green().bold())?;
        return Ok(());
    }

    print_findings(writer, "Dictionary Views", &result.findings)?;
    print_file_errors(writer, &result.file_errors)?;
    writeln!(writer)?;
    let total = format!("Found {} issue(s).", result.findings.len());
    writeln!(writer, "{}", total.yellow().bold())?;
    Ok(())
}

/// Print the `fix` report.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_fix_report(
    writer: &mut impl Write,
    report: &FixReport,
    dry_run: bool,
) -> std::io::Result<()> {
    if dry_run {
        let banner = format!("[DRY-RUN] {}:", report.title);
        writeln!(writer, "\n{}", banner.yellow())?;
    } else {
        writeln!(writer, "\n{}", format!("{}...", report.title).cyan())?;
    }

    if report.files.is_empty() {
        writeln!(writer, "  Nothing to fix in {} file(s).", report.total_files)?;
    } else {
        let mut table = styled_table(&["File", "Fixes", "Rejected"]);
        for file in &report.files {
            let rejected = if file.failed.is_empty() {
                Color::White
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new(normalize_display_path(&file.file)).add_attribute(Attribute::Bold),
                Cell::new(file.fixes_applied).fg(Color::Green),
                Cell::new(file.failed.len()).fg(rejected),
            ]);
        }
        writeln!(writer, "{table}")?;

        for failed in report.files.iter().flat_map(|f| &f.failed) {
            writeln!(
                writer,
                "  {} {}: {}",
                "rejected".red(),
                location(&failed.finding),
                failed.error
            )?;
        }
    }
    print_file_errors(writer, &report.file_errors)?;

    let verb = if dry_run { "Would apply" } else { "Applied" };
    let touched = report.files.iter().filter(|f| f.fixes_applied > 0).count();
    let total = format!("{verb} {} fix(es) in {touched} file(s).", report.total_fixes);
    writeln!(writer, "\n{}", total.green().bold())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FileFixResult;
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let result = AnalysisResult::default();
        let text = render(|w| print_report(w, &result));
        assert!(text.contains("[OK] No issues found."));
        assert!(text.contains("Scanned 0 C# files"));
    }

    #[test]
    fn test_fix_report_counts_touched_files() {
        let report = FixReport {
            title: "Use built-in dictionary iterators",
            files: vec![FileFixResult {
                file: PathBuf::from("src/C.cs"),
                fixes_applied: 3,
                failed: Vec::new(),
                written: false,
            }],
            file_errors: Vec::new(),
            total_files: 4,
            total_fixes: 3,
        };
        let text = render(|w| print_fix_report(w, &report, true));
        assert!(text.contains("[DRY-RUN] Use built-in dictionary iterators:"));
        assert!(text.contains("Would apply 3 fix(es) in 1 file(s)."));
    }

    #[test]
    fn test_file_errors_listed() {
        let errors = vec![FileError {
            file: PathBuf::from("Broken.cs"),
            error: "stream did not contain valid UTF-8".to_owned(),
        }];
        let text = render(|w| print_file_errors(w, &errors));
        assert!(text.contains("Unreadable Files"));
        assert!(text.contains("Broken.cs"));
    }
}
