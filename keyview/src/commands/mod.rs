//! Commands module - CLI subcommand implementations.

mod check;
mod fix;

pub use check::run_check;
pub use fix::run_fix;

use crate::analyzer::Analyzer;
use crate::cli::CommonArgs;
use crate::config::Config;
use anyhow::{Context as _, Result};
use std::path::Path;

/// Builds the analyzer for a subcommand: configuration discovered from the
/// first path, model from `--model` or the configuration, exclusions merged.
pub(crate) fn build_analyzer(common: &CommonArgs) -> Result<Analyzer> {
    let config_path = common
        .paths
        .first()
        .map_or(Path::new("."), std::path::PathBuf::as_path);
    let config = Config::load_from_path(config_path);
    if let Some(path) = &config.config_file_path {
        tracing::debug!(path = %path.display(), "using configuration");
    }

    let analyzer = Analyzer::from_config(config, common.model.as_deref())
        .context("failed to set up the analyzer")?
        .with_exclude_folders(common.exclude_folders.iter().cloned());
    tracing::debug!(
        threads = rayon::current_num_threads(),
        excludes = ?analyzer.exclude_folders,
        "analyzer ready"
    );
    Ok(analyzer)
}
