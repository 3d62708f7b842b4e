//! Path utilities: display normalization and gitignore-aware source discovery.

use crate::constants::{DEFAULT_EXCLUDE_FOLDERS, SOURCE_EXTENSION};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use keyview::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\src\\Program.cs")), "src/Program.cs");
/// assert_eq!(normalize_display_path(Path::new("./src/Program.cs")), "src/Program.cs");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    // Strip Windows extended path prefix if present
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|exclude| match exclude.strip_prefix('*') {
        Some(suffix) if suffix.starts_with('.') => name.ends_with(suffix),
        _ => name == exclude,
    })
}

/// Collects C# source files under `root` with gitignore support.
///
/// `root` may be a single file, which is returned as-is when it has the C#
/// extension. Directories named in `exclude` or in the default exclusion list
/// (`bin`, `obj`, `.git`, ...) are not descended into. Walk errors are logged
/// at debug level and skipped. The result is sorted.
#[must_use]
pub fn collect_source_files(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    if root.is_file() {
        return if has_source_extension(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let excludes: Vec<String> = exclude
        .iter()
        .cloned()
        .chain(DEFAULT_EXCLUDE_FOLDERS().iter().map(|&s| s.to_owned()))
        .collect();
    let root_for_filter = root.to_path_buf();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            if entry.path() == root_for_filter {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_excluded(name, &excludes))
        })
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("walk error: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| has_source_extension(path))
        .collect();
    files.sort();
    files
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}
