//! Tree-sitter based parser for C# source code.
//!
//! Converts the tree-sitter CST into an owned [`SyntaxTree`] that keeps every
//! token and the trivia between tokens, so rewritten trees print back with
//! their original formatting.

use super::node::{SyntaxNode, SyntaxTree, TextSpan};
use std::sync::Arc;
use thiserror::Error;
use tree_sitter::{Parser, TreeCursor};

/// Error during parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to create parser
    #[error("failed to create C# parser: {0}")]
    ParserCreation(String),
    /// Tree-sitter gave up on the source
    #[error("failed to parse source as C#")]
    ParseFailed,
}

/// Tree-sitter C# parser
pub struct CSharpParser {
    parser: Parser,
}

impl CSharpParser {
    /// Create a new parser for C#
    ///
    /// # Errors
    /// Returns error if the grammar cannot be loaded
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| ParseError::ParserCreation(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse source code into a syntax tree.
    ///
    /// Syntax errors do not fail the parse; they are recorded in
    /// [`SyntaxTree::has_errors`].
    ///
    /// # Errors
    /// Returns error if tree-sitter produces no tree
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;
        let has_errors = tree.root_node().has_error();

        let mut converter = Converter { source, offset: 0 };
        let mut cursor = tree.walk();
        let root = converter.convert(&mut cursor);
        let trailing = source.get(converter.offset..).unwrap_or_default();

        Ok(SyntaxTree::new(root, trailing, has_errors))
    }
}

/// Parse `source` with a fresh parser.
///
/// # Errors
/// Returns error if the parser cannot be created or produces no tree
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    CSharpParser::new()?.parse(source)
}

struct Converter<'s> {
    source: &'s str,
    /// End of the last token emitted so far
    offset: usize,
}

impl Converter<'_> {
    fn convert(&mut self, cursor: &mut TreeCursor<'_>) -> Arc<SyntaxNode> {
        let node = cursor.node();

        if node.child_count() == 0 {
            let start = node.start_byte().max(self.offset);
            let end = node.end_byte().max(start);
            let leading = self.source.get(self.offset..start).unwrap_or_default();
            let text = self.source.get(start..end).unwrap_or_default();
            self.offset = end;
            return SyntaxNode::token(
                node.kind(),
                node.is_named(),
                TextSpan::new(start, end),
                leading,
                text,
            );
        }

        let mut children = Vec::new();
        if cursor.goto_first_child() {
            loop {
                let field = cursor.field_name();
                children.push((field, self.convert(cursor)));
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
        SyntaxNode::interior(node.kind(), node.is_named(), children)
    }
}
