//! Processing methods for the analyzer: file discovery and parallel
//! `check`/`fix` over many files.

use super::{
    AnalysisResult, AnalysisSummary, Analyzer, FailedFix, FileError, FileFixResult, FixReport,
};
use crate::fix::DictionaryViewFixer;
use crate::rules::Finding;
use crate::syntax::CSharpParser;
use crate::utils::{collect_source_files, is_generated};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of files to process per chunk in parallel processing.
/// Bounds the number of sources and trees held in memory at once.
const CHUNK_SIZE: usize = 500;

enum FileOutcome<T> {
    Done { value: T, lines: usize },
    SkippedGenerated,
    Failed(FileError),
}

impl Analyzer {
    /// Collects the source files under `paths` (the current directory when
    /// empty), honoring exclusions. Duplicates are removed.
    #[must_use]
    pub fn collect_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let default_root = [PathBuf::from(".")];
        let roots = if paths.is_empty() { &default_root[..] } else { paths };
        let mut files: Vec<PathBuf> = roots
            .iter()
            .flat_map(|root| collect_source_files(root, &self.exclude_folders))
            .collect();
        files.sort();
        files.dedup();
        files
    }

    /// Runs the analysis on multiple paths (files or directories).
    #[must_use]
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> AnalysisResult {
        let files = self.collect_files(paths);
        tracing::debug!(files = files.len(), "analyzing");

        let mut result = AnalysisResult::default();
        let mut summary = AnalysisSummary {
            total_files: files.len(),
            ..AnalysisSummary::default()
        };

        for chunk in files.chunks(CHUNK_SIZE) {
            let outcomes: Vec<FileOutcome<Vec<Finding>>> = chunk
                .par_iter()
                .map_init(CSharpParser::new, |parser, file| match parser {
                    Ok(parser) => self.process_single_file(parser, file),
                    Err(e) => FileOutcome::Failed(FileError {
                        file: file.clone(),
                        error: e.to_string(),
                    }),
                })
                .collect();

            for outcome in outcomes {
                match outcome {
                    FileOutcome::Done { value, lines } => {
                        summary.total_lines_analyzed += lines;
                        result.findings.extend(value);
                    }
                    FileOutcome::SkippedGenerated => summary.skipped_generated += 1,
                    FileOutcome::Failed(error) => result.file_errors.push(error),
                }
            }
        }

        summary.findings_count = result.findings.len();
        summary.file_errors_count = result.file_errors.len();
        result.analysis_summary = summary;
        result
    }

    /// Fixes every file under `paths`. Files are written back unless
    /// `dry_run` is set.
    #[must_use]
    pub fn fix_paths(&self, paths: &[PathBuf], dry_run: bool) -> FixReport {
        let files = self.collect_files(paths);
        tracing::debug!(files = files.len(), dry_run, "fixing");

        let mut report = FixReport {
            title: DictionaryViewFixer::TITLE,
            total_files: files.len(),
            ..FixReport::default()
        };

        for chunk in files.chunks(CHUNK_SIZE) {
            let outcomes: Vec<FileOutcome<Option<FileFixResult>>> = chunk
                .par_iter()
                .map_init(CSharpParser::new, |parser, file| match parser {
                    Ok(parser) => self.fix_single_file(parser, file, dry_run),
                    Err(e) => FileOutcome::Failed(FileError {
                        file: file.clone(),
                        error: e.to_string(),
                    }),
                })
                .collect();

            for outcome in outcomes {
                match outcome {
                    FileOutcome::Done {
                        value: Some(fixed), ..
                    } => {
                        report.total_fixes += fixed.fixes_applied;
                        report.files.push(fixed);
                    }
                    FileOutcome::Done { value: None, .. } | FileOutcome::SkippedGenerated => {}
                    FileOutcome::Failed(error) => report.file_errors.push(error),
                }
            }
        }
        report
    }

    /// Reads a file, applying the generated-code policy.
    fn load_source(&self, file: &Path) -> FileOutcome<String> {
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(file = %file.display(), "failed to read: {e}");
                return FileOutcome::Failed(FileError {
                    file: file.to_path_buf(),
                    error: e.to_string(),
                });
            }
        };
        if !self.config.keyview.analyze_generated() && is_generated(file, &source) {
            tracing::debug!(file = %file.display(), "skipping generated file");
            return FileOutcome::SkippedGenerated;
        }
        let lines = source.lines().count();
        FileOutcome::Done {
            value: source,
            lines,
        }
    }

    fn process_single_file(&self, parser: &mut CSharpParser, file: &Path) -> FileOutcome<Vec<Finding>> {
        let (source, lines) = match self.load_source(file) {
            FileOutcome::Done { value, lines } => (value, lines),
            FileOutcome::SkippedGenerated => return FileOutcome::SkippedGenerated,
            FileOutcome::Failed(error) => return FileOutcome::Failed(error),
        };
        tracing::debug!(file = %file.display(), "analyzing file");

        match self.analyze_source(parser, &source, file) {
            Ok(findings) => FileOutcome::Done {
                value: findings,
                lines,
            },
            Err(e) => FileOutcome::Failed(FileError {
                file: file.to_path_buf(),
                error: e.to_string(),
            }),
        }
    }

    fn fix_single_file(
        &self,
        parser: &mut CSharpParser,
        file: &Path,
        dry_run: bool,
    ) -> FileOutcome<Option<FileFixResult>> {
        let (source, lines) = match self.load_source(file) {
            FileOutcome::Done { value, lines } => (value, lines),
            FileOutcome::SkippedGenerated => return FileOutcome::SkippedGenerated,
            FileOutcome::Failed(error) => return FileOutcome::Failed(error),
        };

        let outcome = match self.fix_source(parser, &source, file) {
            Ok(outcome) => outcome,
            Err(e) => {
                return FileOutcome::Failed(FileError {
                    file: file.to_path_buf(),
                    error: e.to_string(),
                })
            }
        };
        if !outcome.is_changed() && outcome.failed.is_empty() {
            return FileOutcome::Done { value: None, lines };
        }

        let mut written = false;
        if outcome.is_changed() && !dry_run {
            if let Err(e) = fs::write(file, &outcome.source) {
                tracing::warn!(file = %file.display(), "failed to write: {e}");
                return FileOutcome::Failed(FileError {
                    file: file.to_path_buf(),
                    error: e.to_string(),
                });
            }
            written = true;
            tracing::debug!(file = %file.display(), fixes = outcome.applied.len(), "wrote file");
        }

        let failed: Vec<FailedFix> = outcome.failed;
        FileOutcome::Done {
            value: Some(FileFixResult {
                file: file.to_path_buf(),
                fixes_applied: outcome.applied.len(),
                failed,
                written,
            }),
            lines,
        }
    }
}
