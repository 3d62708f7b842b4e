//! Immutable syntax nodes and trees.
//!
//! Nodes are shared through `Arc` and never mutated. Leaves keep their token
//! text together with the trivia that precedes them, so any tree renders back
//! to exact source text. Rewrites build a new tree with [`SyntaxTree::replace`];
//! the original stays valid for every holder of it.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Byte range of a node in its tree's text, leading trivia excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl TextSpan {
    /// Create a new span
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this span
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    leading: CompactString,
    text: CompactString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Child {
    field: Option<&'static str>,
    node: Arc<SyntaxNode>,
}

/// A node of a C# syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: &'static str,
    named: bool,
    span: TextSpan,
    token: Option<Token>,
    children: Vec<Child>,
}

impl SyntaxNode {
    /// Create a leaf node holding `text`, preceded by `leading` trivia.
    #[must_use]
    pub fn token(
        kind: &'static str,
        named: bool,
        span: TextSpan,
        leading: &str,
        text: &str,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            named,
            span,
            token: Some(Token {
                leading: leading.into(),
                text: text.into(),
            }),
            children: Vec::new(),
        })
    }

    /// Create an interior node. Its span runs from the first to the last child.
    #[must_use]
    pub fn branch(
        kind: &'static str,
        children: impl IntoIterator<Item = (Option<&'static str>, Arc<SyntaxNode>)>,
    ) -> Arc<Self> {
        Self::interior(kind, true, children)
    }

    pub(super) fn interior(
        kind: &'static str,
        named: bool,
        children: impl IntoIterator<Item = (Option<&'static str>, Arc<SyntaxNode>)>,
    ) -> Arc<Self> {
        let children: Vec<Child> = children
            .into_iter()
            .map(|(field, node)| Child { field, node })
            .collect();
        let span = span_of(&children).unwrap_or_default();
        Arc::new(Self {
            kind,
            named,
            span,
            token: None,
            children,
        })
    }

    /// Node kind, using tree-sitter C# grammar names (see [`super::kinds`]).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Whether this is a named node (vs anonymous like punctuation)
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.named
    }

    /// Source span, leading trivia excluded
    #[must_use]
    pub fn span(&self) -> TextSpan {
        self.span
    }

    /// Text of a leaf token, `None` for interior nodes
    #[must_use]
    pub fn token_text(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.text.as_str())
    }

    /// Child nodes in source order
    pub fn children(&self) -> impl Iterator<Item = &Arc<SyntaxNode>> + '_ {
        self.children.iter().map(|c| &c.node)
    }

    /// Named children, comments excluded
    pub fn significant_children(&self) -> impl Iterator<Item = &Arc<SyntaxNode>> + '_ {
        self.children()
            .filter(|c| c.named && c.kind != super::kinds::COMMENT)
    }

    /// First child filling the given grammar field
    #[must_use]
    pub fn child_by_field(&self, field: &str) -> Option<&Arc<SyntaxNode>> {
        self.children
            .iter()
            .find(|c| c.field == Some(field))
            .map(|c| &c.node)
    }

    /// Identifier text of a simple name: `Select` for both `Select` and
    /// `Select<A, B>`. `None` for any other kind of node.
    #[must_use]
    pub fn simple_name(&self) -> Option<String> {
        match self.kind {
            super::kinds::IDENTIFIER => Some(self.text()),
            super::kinds::GENERIC_NAME => self
                .children()
                .find(|c| c.kind == super::kinds::IDENTIFIER)
                .map(|c| c.text()),
            _ => None,
        }
    }

    /// Source text of this node, without its leading trivia.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.span.len());
        self.write_text(&mut out, false);
        out
    }

    fn write_text(&self, out: &mut String, with_leading: bool) {
        if let Some(token) = &self.token {
            if with_leading {
                out.push_str(&token.leading);
            }
            out.push_str(&token.text);
            return;
        }
        for (i, child) in self.children.iter().enumerate() {
            child.node.write_text(out, with_leading || i > 0);
        }
    }

    /// Pre-order traversal of this node and all of its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Rebuild this subtree starting at `offset`, recomputing spans.
    ///
    /// The subtree identical to `old` (by pointer) is swapped for `new`.
    fn rebuild(
        node: &Arc<SyntaxNode>,
        old: &Arc<SyntaxNode>,
        new: &Arc<SyntaxNode>,
        offset: &mut usize,
        replaced: &mut bool,
    ) -> Arc<SyntaxNode> {
        let source = if !*replaced && Arc::ptr_eq(node, old) {
            *replaced = true;
            new
        } else {
            node
        };

        if let Some(token) = &source.token {
            let start = *offset + token.leading.len();
            let end = start + token.text.len();
            *offset = end;
            if source.span == TextSpan::new(start, end) {
                return Arc::clone(source);
            }
            return Arc::new(Self {
                span: TextSpan::new(start, end),
                ..(**source).clone()
            });
        }

        let children: Vec<Child> = source
            .children
            .iter()
            .map(|c| Child {
                field: c.field,
                node: Self::rebuild(&c.node, old, new, offset, replaced),
            })
            .collect();
        let span = span_of(&children).unwrap_or(TextSpan::new(*offset, *offset));
        Arc::new(Self {
            kind: source.kind,
            named: source.named,
            span,
            token: None,
            children,
        })
    }
}

fn span_of(children: &[Child]) -> Option<TextSpan> {
    let first = children.first()?;
    let last = children.last()?;
    Some(TextSpan::new(first.node.span.start, last.node.span.end))
}

/// Iterator returned by [`SyntaxNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| c.node.as_ref()));
        Some(node)
    }
}

/// A complete syntax tree: a root node plus the trivia after the last token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: Arc<SyntaxNode>,
    trailing: CompactString,
    has_errors: bool,
}

impl SyntaxTree {
    /// Assemble a tree from its parts.
    #[must_use]
    pub fn new(root: Arc<SyntaxNode>, trailing: &str, has_errors: bool) -> Self {
        Self {
            root,
            trailing: trailing.into(),
            has_errors,
        }
    }

    /// Root node
    #[must_use]
    pub fn root(&self) -> &Arc<SyntaxNode> {
        &self.root
    }

    /// Whether the parser recovered from syntax errors while building this tree
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Full source text of the tree, trivia included.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.root.span.end + self.trailing.len());
        self.root.write_text(&mut out, true);
        out.push_str(&self.trailing);
        out
    }

    /// Pre-order traversal of every node in the tree.
    pub fn nodes(&self) -> Descendants<'_> {
        self.root.descendants()
    }

    /// Locate the outermost node whose span equals `span`.
    ///
    /// `None` when no node matches exactly, including spans that only
    /// partially overlap a node or lie outside the tree.
    #[must_use]
    pub fn find_node(&self, span: TextSpan) -> Option<&Arc<SyntaxNode>> {
        let mut current = &self.root;
        if !current.span.contains(span) {
            return None;
        }
        loop {
            if current.span == span {
                return Some(current);
            }
            current = current.children().find(|c| c.span.contains(span))?;
        }
    }

    /// Build a new tree in which `old` (a node of this tree, compared by
    /// identity) is replaced by `new`. Spans of the new tree are recomputed;
    /// `self` is left untouched. Returns `None` if `old` is not part of this tree.
    #[must_use]
    pub fn replace(&self, old: &Arc<SyntaxNode>, new: Arc<SyntaxNode>) -> Option<Self> {
        let mut offset = 0;
        let mut replaced = false;
        let root = SyntaxNode::rebuild(&self.root, old, &new, &mut offset, &mut replaced);
        replaced.then(|| Self {
            root,
            trailing: self.trailing.clone(),
            has_errors: self.has_errors,
        })
    }
}
