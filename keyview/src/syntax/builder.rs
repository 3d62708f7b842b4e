//! Construction of synthesized nodes for rewrites.

use super::kinds::{DOT, FIELD_EXPRESSION, FIELD_NAME, IDENTIFIER, MEMBER_ACCESS_EXPRESSION};
use super::node::{SyntaxNode, TextSpan};
use std::sync::Arc;

impl SyntaxNode {
    /// Build `receiver.member`.
    ///
    /// `receiver` is reused as-is, leading trivia included; the new tokens carry
    /// no trivia. Spans of the new tokens are placeholders until the node is
    /// placed into a tree with [`super::SyntaxTree::replace`].
    #[must_use]
    pub fn member_access(receiver: Arc<SyntaxNode>, member: &str) -> Arc<SyntaxNode> {
        let end = receiver.span().end;
        let dot = SyntaxNode::token(DOT, false, TextSpan::new(end, end + 1), "", DOT);
        let name = SyntaxNode::token(
            IDENTIFIER,
            true,
            TextSpan::new(end + 1, end + 1 + member.len()),
            "",
            member,
        );
        SyntaxNode::branch(
            MEMBER_ACCESS_EXPRESSION,
            [
                (Some(FIELD_EXPRESSION), receiver),
                (None, dot),
                (Some(FIELD_NAME), name),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_access_renders_receiver_and_member() {
        let receiver = SyntaxNode::token(IDENTIFIER, true, TextSpan::new(4, 8), "    ", "dict");
        let node = SyntaxNode::member_access(Arc::clone(&receiver), "Keys");

        assert_eq!(node.kind(), MEMBER_ACCESS_EXPRESSION);
        assert_eq!(node.text(), "dict.Keys");
        assert!(Arc::ptr_eq(
            node.child_by_field(FIELD_EXPRESSION).unwrap(),
            &receiver
        ));
        assert_eq!(
            node.child_by_field(FIELD_NAME).and_then(|n| n.token_text()),
            Some("Keys")
        );
    }
}
