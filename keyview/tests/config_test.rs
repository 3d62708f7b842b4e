//! Tests for configuration and model loading.
#![allow(clippy::unwrap_used)]

use keyview::analyzer::Analyzer;
use keyview::config::Config;
use keyview::syntax::parse;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MODEL: &str = r#"
[[symbols]]
expr = "lookup"
kind = "local"
type = "System.Collections.Generic.Dictionary<int, string>"
"#;

#[test]
fn test_model_path_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".keyview.toml"),
        "[keyview]\nmodel = \"model/keyview.toml\"\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("model")).unwrap();
    fs::write(dir.path().join("model/keyview.toml"), MODEL).unwrap();

    let config = Config::load_from_path(dir.path());
    let analyzer = Analyzer::from_config(config, None).unwrap();

    let tree = parse("class C { void M() { var ids = lookup.Select(p => p.Key); } }").unwrap();
    assert_eq!(analyzer.detect(&tree, Path::new("C.cs")).len(), 1);
}

#[test]
fn test_explicit_model_overrides_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".keyview.toml"),
        "[keyview]\nmodel = \"missing.toml\"\n",
    )
    .unwrap();
    let explicit = dir.path().join("explicit.toml");
    fs::write(&explicit, MODEL).unwrap();

    let config = Config::load_from_path(dir.path());
    assert!(Analyzer::from_config(config.clone(), None).is_err());
    assert!(Analyzer::from_config(config, Some(&explicit)).is_ok());
}

#[test]
fn test_invalid_model_reports_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[[symbols]]\nexpr = \"x\"\nkind = \"banana\"\n").unwrap();

    let err = Analyzer::from_config(Config::default(), Some(&path))
        .err()
        .unwrap();
    assert!(format!("{err:#}").contains("bad.toml"));
}

#[test]
fn test_generated_files_are_analyzed_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keyview.model.toml"), MODEL).unwrap();
    fs::write(
        dir.path().join("Views.g.cs"),
        "class G { void M() { var ids = lookup.Select(p => p.Key); } }",
    )
    .unwrap();
    let model = dir.path().join("keyview.model.toml");

    let analyzer = Analyzer::from_config(Config::default(), Some(&model)).unwrap();
    let result = analyzer.analyze_paths(&[dir.path().to_path_buf()]);
    assert_eq!(result.findings.len(), 1);

    fs::write(
        dir.path().join(".keyview.toml"),
        "[keyview]\nanalyze_generated = false\n",
    )
    .unwrap();
    let config = Config::load_from_path(dir.path());
    let analyzer = Analyzer::from_config(config, Some(&model)).unwrap();
    let result = analyzer.analyze_paths(&[dir.path().to_path_buf()]);
    assert!(result.findings.is_empty());
    assert_eq!(result.analysis_summary.skipped_generated, 1);
}

#[test]
fn test_exclude_folders_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keyview.model.toml"), MODEL).unwrap();
    fs::write(
        dir.path().join(".keyview.toml"),
        "[keyview]\nmodel = \"keyview.model.toml\"\nexclude_folders = [\"Legacy\"]\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("Legacy")).unwrap();
    fs::write(
        dir.path().join("Legacy/Old.cs"),
        "class O { void M() { var ids = lookup.Select(p => p.Key); } }",
    )
    .unwrap();

    let config = Config::load_from_path(dir.path());
    let analyzer = Analyzer::from_config(config, None).unwrap();
    let result = analyzer.analyze_paths(&[dir.path().to_path_buf()]);
    assert_eq!(result.analysis_summary.total_files, 0);
}
