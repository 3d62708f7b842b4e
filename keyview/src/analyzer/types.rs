//! Type definitions for analysis and fix results.

use crate::rules::Finding;
use serde::Serialize;
use std::path::PathBuf;

/// A file that could not be read or parsed.
#[derive(Debug, Serialize, Clone)]
pub struct FileError {
    /// The file where the error occurred.
    pub file: PathBuf,
    /// The error message.
    pub error: String,
}

/// Holds the results of the analysis.
/// This struct is serialized to JSON if requested.
#[derive(Debug, Serialize, Default)]
pub struct AnalysisResult {
    /// Findings, ordered by file and position.
    pub findings: Vec<Finding>,
    /// Files that could not be analyzed.
    pub file_errors: Vec<FileError>,
    /// Summary statistics of the analysis.
    pub analysis_summary: AnalysisSummary,
}

/// Summary statistics for the analysis result.
#[derive(Debug, Serialize, Default, Clone, Copy)]
pub struct AnalysisSummary {
    /// Total number of files scanned.
    pub total_files: usize,
    /// Generated files skipped because `analyze_generated` is off.
    pub skipped_generated: usize,
    /// Total number of findings.
    pub findings_count: usize,
    /// Total number of files that failed to load.
    pub file_errors_count: usize,
    /// Total number of lines analyzed.
    pub total_lines_analyzed: usize,
}

/// A finding whose fix was rejected by the fixer.
#[derive(Debug, Serialize, Clone)]
pub struct FailedFix {
    /// The finding that could not be fixed.
    pub finding: Finding,
    /// Why the fixer rejected it.
    pub error: String,
}

/// Result of fixing a single source text.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// The rewritten source.
    pub source: String,
    /// Findings that were fixed, in application order.
    pub applied: Vec<Finding>,
    /// Findings the fixer rejected.
    pub failed: Vec<FailedFix>,
}

impl FixOutcome {
    /// Whether the source changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Per-file result of the fix command.
#[derive(Debug, Serialize, Clone)]
pub struct FileFixResult {
    /// File that was fixed.
    pub file: PathBuf,
    /// Number of rewrites applied.
    pub fixes_applied: usize,
    /// Fixes that were rejected.
    pub failed: Vec<FailedFix>,
    /// Whether the file was written back.
    pub written: bool,
}

/// Result of fixing a set of paths.
#[derive(Debug, Serialize, Default)]
pub struct FixReport {
    /// Title of the code action that was applied.
    pub title: &'static str,
    /// Files with at least one applied or failed fix.
    pub files: Vec<FileFixResult>,
    /// Files that could not be read, parsed or written.
    pub file_errors: Vec<FileError>,
    /// Total number of files scanned.
    pub total_files: usize,
    /// Total number of rewrites applied.
    pub total_fixes: usize,
}
