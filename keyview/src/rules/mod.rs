use crate::config::Config;
use crate::semantic::SemanticModel;
use crate::syntax::{SyntaxNode, TextSpan};
use crate::utils::LineIndex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use self::dictionary_view::{DictionaryViewRule, ViewKind};

/// Key under which a serialized finding carries its dictionary view.
pub const PAYLOAD_KEY: &str = "dictionaryView";

/// Context passed to rules during analysis.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Path to the file being analyzed.
    pub filename: &'a std::path::Path,
    /// Line index for accurate line/column mapping.
    pub line_index: &'a LineIndex,
    /// Semantic facts about the compilation the file belongs to.
    pub model: &'a dyn SemanticModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single issue found by a rule.
pub struct Finding {
    /// ID of the rule that triggered the finding.
    pub rule_id: String,
    /// Diagnostic name of the rule (`DictionarySelectKeyValue`).
    #[serde(default)]
    pub rule_name: String,
    /// Category of the rule.
    pub category: String,
    /// Severity level (e.g., "LOW", "MEDIUM").
    pub severity: String,
    /// Description of the issue.
    pub message: String,
    /// File where the issue was found.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
    /// Span of the flagged node; the fixer re-locates the node through it.
    pub span: TextSpan,
    /// View the fixer rewrites the flagged invocation to.
    #[serde(rename = "dictionaryView")]
    pub view: ViewKind,
    /// Arguments substituted into the message (the selected component).
    #[serde(default)]
    pub message_args: Vec<String>,
}

impl Finding {
    /// Parse a finding serialized by [`serde_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a field is missing.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
/// Metadata associated with a rule.
pub struct RuleMetadata {
    /// Unique code/ID of the rule.
    pub id: &'static str,
    /// Diagnostic name of the rule, stable across releases.
    pub name: &'static str,
    /// Category of the rule.
    pub category: &'static str,
}

/// Trait defining a linting rule.
///
/// Rules are shared between threads and never mutate what they inspect.
pub trait Rule: Send + Sync {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str {
        self.metadata().name
    }
    /// Returns the unique code/ID of the rule.
    fn code(&self) -> &'static str {
        self.metadata().id
    }
    /// Returns the category/functional group of the rule.
    fn category(&self) -> &'static str {
        self.metadata().category
    }
    /// Returns the full metadata for the rule.
    fn metadata(&self) -> RuleMetadata;
    /// Called for every node of the tree, in pre-order.
    fn visit_node(&self, node: &SyntaxNode, context: &Context<'_>) -> Option<Finding>;
}

/// Rules enabled for the given configuration.
#[must_use]
pub fn get_rules(config: &Config) -> Vec<Box<dyn Rule>> {
    vec![Box::new(DictionaryViewRule::from_config(config))]
}

/// Dictionary `Select` projections that have a built-in view.
pub mod dictionary_view;
mod finding;
/// Module containing rule ID constants.
pub mod ids;
