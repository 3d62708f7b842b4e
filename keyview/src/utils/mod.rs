//! Utilities module for keyview.
//!
//! Line/column mapping for findings and the source-file helpers used by the
//! command layer.

mod paths;

pub use paths::{collect_source_files, is_excluded, normalize_display_path};

use crate::constants::{AUTO_GENERATED_HEADER_RE, GENERATED_FILE_RE};
use std::path::Path;

/// Number of leading lines searched for an `<auto-generated>` marker.
const GENERATED_HEADER_LINES: usize = 20;

/// A utility struct to convert byte offsets to line numbers.
///
/// The parser reports byte offsets, but findings are reported with 1-indexed
/// lines and columns.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        // '\n' is always a single byte in UTF-8
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a byte offset to a 1-indexed column (in bytes).
    #[must_use]
    pub fn column_index(&self, offset: usize) -> usize {
        let line = self.line_index(offset);
        let start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        offset.saturating_sub(start) + 1
    }
}

/// Whether a source file is generated code, by file name or by an
/// `<auto-generated>` comment near the top of the file.
#[must_use]
pub fn is_generated(path: &Path, source: &str) -> bool {
    if GENERATED_FILE_RE().is_match(&path.to_string_lossy()) {
        return true;
    }
    let header_end = source
        .match_indices('\n')
        .nth(GENERATED_HEADER_LINES - 1)
        .map_or(source.len(), |(i, _)| i);
    AUTO_GENERATED_HEADER_RE().is_match(&source[..header_end])
}
