use crate::rules::{Context, Finding, Rule};
use crate::semantic::SemanticModel;
use crate::syntax::{SyntaxNode, SyntaxTree};
use crate::utils::LineIndex;
use std::path::Path;

/// Visitor for traversing the syntax tree and applying linter rules.
pub struct LinterVisitor<'a> {
    rules: &'a [Box<dyn Rule>],
    context: Context<'a>,
    /// List of findings collected during the traversal.
    pub findings: Vec<Finding>,
}

impl<'a> LinterVisitor<'a> {
    /// Creates a new `LinterVisitor` with the given rules and context.
    #[must_use]
    pub fn new(
        rules: &'a [Box<dyn Rule>],
        filename: &'a Path,
        line_index: &'a LineIndex,
        model: &'a dyn SemanticModel,
    ) -> Self {
        Self {
            rules,
            context: Context {
                filename,
                line_index,
                model,
            },
            findings: Vec::new(),
        }
    }

    /// Visits every node of `tree` in pre-order.
    pub fn visit_tree(&mut self, tree: &SyntaxTree) {
        for node in tree.nodes() {
            self.visit_node(node);
        }
    }

    /// Applies every rule to a single node. Children are not visited.
    pub fn visit_node(&mut self, node: &SyntaxNode) {
        for rule in self.rules {
            if let Some(finding) = rule.visit_node(node, &self.context) {
                self.findings.push(finding);
            }
        }
    }
}
