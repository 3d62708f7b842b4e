//! keyview analyzer module.
//!
//! This module contains the analysis engine, broken down into:
//! - `types`: Result types (`AnalysisResult`, `FixReport`, ...)
//! - `processing`: Parallel file processing for `check` and `fix`
//! - Core `Analyzer` struct: detection and fixing of a single tree

mod processing;
/// Result types and analysis summaries.
pub mod types;

pub use types::{
    AnalysisResult, AnalysisSummary, FailedFix, FileError, FileFixResult, FixOutcome, FixReport,
};

use crate::config::Config;
use crate::constants::MAX_FIXES_PER_FILE;
use crate::fix::DictionaryViewFixer;
use crate::linter::LinterVisitor;
use crate::rules::dictionary_view::ViewKind;
use crate::rules::{get_rules, Context, Finding, Rule};
use crate::semantic::{SemanticModel, TableModel};
use crate::syntax::{CSharpParser, ParseError, SyntaxNode, SyntaxTree, TextSpan};
use crate::utils::LineIndex;
use anyhow::Result;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// The main analyzer: rules, the semantic model they consult, and the
/// configuration that selected them.
pub struct Analyzer {
    /// Configuration object.
    pub config: Config,
    /// Folders to exclude from analysis, on top of the defaults.
    pub exclude_folders: Vec<String>,
    rules: Vec<Box<dyn Rule>>,
    model: Box<dyn SemanticModel>,
}

impl Analyzer {
    /// Analyzer with the rules of `config` and the given semantic model.
    #[must_use]
    pub fn new(config: Config, model: Box<dyn SemanticModel>) -> Self {
        let rules = get_rules(&config);
        let exclude_folders = config.keyview.exclude_folders.clone().unwrap_or_default();
        Self {
            config,
            exclude_folders,
            rules,
            model,
        }
    }

    /// Analyzer whose model is loaded from `model_path`, or from the config's
    /// `model` entry, or the built-in prelude when neither is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be read or parsed.
    pub fn from_config(config: Config, model_path: Option<&Path>) -> Result<Self> {
        let path: Option<PathBuf> = model_path
            .map(Path::to_path_buf)
            .or_else(|| config.model_path());
        let model = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading semantic model");
                TableModel::load(&path)?
            }
            None => TableModel::with_prelude(),
        };
        Ok(Self::new(config, Box::new(model)))
    }

    /// Adds folders to exclude.
    #[must_use]
    pub fn with_exclude_folders(mut self, folders: impl IntoIterator<Item = String>) -> Self {
        self.exclude_folders.extend(folders);
        self
    }

    /// The semantic model rules consult.
    #[must_use]
    pub fn model(&self) -> &dyn SemanticModel {
        self.model.as_ref()
    }

    /// Runs every rule over `tree`, in pre-order.
    #[must_use]
    pub fn detect(&self, tree: &SyntaxTree, file: &Path) -> Vec<Finding> {
        let text = tree.text();
        let line_index = LineIndex::new(&text);
        let mut linter = LinterVisitor::new(&self.rules, file, &line_index, self.model());
        linter.visit_tree(tree);
        linter.findings
    }

    /// Same as [`Self::detect`], checking the nodes of the tree in parallel.
    #[must_use]
    pub fn detect_parallel(&self, tree: &SyntaxTree, file: &Path) -> Vec<Finding> {
        let text = tree.text();
        let line_index = LineIndex::new(&text);
        let context = Context {
            filename: file,
            line_index: &line_index,
            model: self.model(),
        };
        let nodes: Vec<&SyntaxNode> = tree.nodes().collect();
        nodes
            .par_iter()
            .flat_map_iter(|node| {
                let context = &context;
                self.rules
                    .iter()
                    .filter_map(move |rule| rule.visit_node(node, context))
            })
            .collect()
    }

    /// Parses and analyzes one source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed at all.
    pub fn analyze_source(
        &self,
        parser: &mut CSharpParser,
        source: &str,
        file: &Path,
    ) -> Result<Vec<Finding>, ParseError> {
        let tree = parser.parse(source)?;
        if tree.has_errors() {
            tracing::debug!(file = %file.display(), "source has syntax errors");
        }
        Ok(self.detect(&tree, file))
    }

    /// Applies fixes one at a time, re-detecting after each, until no
    /// fixable finding is left.
    ///
    /// Findings are fixed from the end of the file backwards so that the
    /// spans of the remaining ones stay valid. A finding the fixer rejects
    /// is logged and skipped.
    #[must_use]
    pub fn fix_tree(
        &self,
        mut tree: SyntaxTree,
        file: &Path,
    ) -> (SyntaxTree, Vec<Finding>, Vec<FailedFix>) {
        let mut applied = Vec::new();
        let mut failed = Vec::new();
        let mut rejected: FxHashSet<(TextSpan, ViewKind)> = FxHashSet::default();

        for _ in 0..MAX_FIXES_PER_FILE {
            let Some(finding) = self
                .detect(&tree, file)
                .into_iter()
                .filter(|f| !rejected.contains(&(f.span, f.view)))
                .max_by_key(|f| f.span.start)
            else {
                break;
            };

            match DictionaryViewFixer::fix(&tree, &finding) {
                Ok(fixed) => {
                    let (old_end, new_end) = (tree.root().span().end, fixed.root().span().end);
                    rejected = rejected
                        .into_iter()
                        .map(|(span, view)| {
                            (shift_after(span, finding.span.end, old_end, new_end), view)
                        })
                        .collect();
                    tracing::debug!(file = %file.display(), line = finding.line, view = %finding.view, "applied fix");
                    tree = fixed;
                    applied.push(finding);
                }
                Err(error) => {
                    tracing::warn!(file = %file.display(), line = finding.line, "skipping fix: {error}");
                    rejected.insert((finding.span, finding.view));
                    failed.push(FailedFix {
                        finding,
                        error: error.to_string(),
                    });
                }
            }
        }
        (tree, applied, failed)
    }

    /// Parses `source` and applies every available fix.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed at all.
    pub fn fix_source(
        &self,
        parser: &mut CSharpParser,
        source: &str,
        file: &Path,
    ) -> Result<FixOutcome, ParseError> {
        let tree = parser.parse(source)?;
        let (tree, applied, failed) = self.fix_tree(tree, file);
        Ok(FixOutcome {
            source: tree.text(),
            applied,
            failed,
        })
    }
}

/// Moves the parts of `span` at or after `edit_end` by the change in text
/// length from `old_len` to `new_len`.
fn shift_after(span: TextSpan, edit_end: usize, old_len: usize, new_len: usize) -> TextSpan {
    let shift = |offset: usize| {
        if offset >= edit_end {
            (offset + new_len).saturating_sub(old_len)
        } else {
            offset
        }
    };
    TextSpan::new(shift(span.start), shift(span.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{QualifiedName, Symbol};

    fn analyzer() -> Analyzer {
        let mut model = TableModel::with_prelude();
        for name in ["a", "b"] {
            model.bind(
                name,
                Symbol::Local {
                    name: name.into(),
                    ty: QualifiedName::parse("System.Collections.Generic.Dictionary"),
                },
            );
        }
        Analyzer::new(Config::default(), Box::new(model))
    }

    #[test]
    fn test_fix_source_applies_all_fixes() {
        let source = "class C {\n  void M() {\n    var k = a.Select(kv => kv.Key);\n    var v = b.Select(kv => kv.Value);\n  }\n}\n";
        let mut parser = CSharpParser::new().unwrap();
        let outcome = analyzer()
            .fix_source(&mut parser, source, Path::new("C.cs"))
            .unwrap();

        assert_eq!(
            outcome.source,
            "class C {\n  void M() {\n    var k = a.Keys;\n    var v = b.Values;\n  }\n}\n"
        );
        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.applied[0].line, 4);
        assert!(outcome.failed.is_empty());
        assert!(outcome.is_changed());
    }

    #[test]
    fn test_parallel_detection_matches_sequential() {
        let source = "class C { void M() { var k = a.Select(kv => kv.Key); var v = b.Select(kv => kv.Value); var n = c.Select(kv => kv.Key); } }";
        let mut parser = CSharpParser::new().unwrap();
        let tree = parser.parse(source).unwrap();
        let analyzer = analyzer();
        let sequential = analyzer.detect(&tree, Path::new("C.cs"));
        assert_eq!(sequential.len(), 2);
        assert_eq!(analyzer.detect_parallel(&tree, Path::new("C.cs")), sequential);
    }

    #[test]
    fn test_shift_after() {
        let span = TextSpan::new(10, 20);
        assert_eq!(shift_after(span, 5, 100, 97), TextSpan::new(7, 17));
        assert_eq!(shift_after(span, 15, 100, 97), TextSpan::new(10, 17));
        assert_eq!(shift_after(span, 25, 100, 97), span);
    }
}
