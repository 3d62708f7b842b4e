use super::FixError;
use crate::rules::dictionary_view::ViewKind;
use crate::rules::{Finding, PAYLOAD_KEY};
use crate::syntax::kinds::{
    FIELD_EXPRESSION, FIELD_FUNCTION, INVOCATION_EXPRESSION, MEMBER_ACCESS_EXPRESSION,
};
use crate::syntax::{SyntaxNode, SyntaxTree, TextSpan};
use serde_json::Value;
use std::sync::Arc;

/// Rewrites `receiver.Select(kv => kv.Key)` to `receiver.Keys`.
pub struct DictionaryViewFixer;

impl DictionaryViewFixer {
    /// Title of the code action.
    pub const TITLE: &'static str = "Use built-in dictionary iterators";

    /// Apply the fix for `finding` to `tree`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixError`] when the finding does not point at a rewritable
    /// invocation of `tree`.
    pub fn fix(tree: &SyntaxTree, finding: &Finding) -> Result<SyntaxTree, FixError> {
        Self::fix_at(tree, finding.span, finding.view)
    }

    /// Replace the invocation at `span` with `receiver.<view>`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixError`] when no invocation with a member-access callee
    /// spans exactly `span`. A drifted span is rejected, never widened to an
    /// enclosing call.
    pub fn fix_at(tree: &SyntaxTree, span: TextSpan, view: ViewKind) -> Result<SyntaxTree, FixError> {
        let located = tree.find_node(span).ok_or(FixError::NodeNotFound { span })?;
        let invocation = if located.kind() == INVOCATION_EXPRESSION {
            located
        } else {
            // An `argument` shares the span of the invocation it wraps.
            located
                .children()
                .find(|c| c.kind() == INVOCATION_EXPRESSION && c.span() == span)
                .ok_or_else(|| FixError::NotAnInvocation {
                    span,
                    kind: located.kind().to_owned(),
                })?
        };

        let receiver = invocation
            .child_by_field(FIELD_FUNCTION)
            .filter(|c| c.kind() == MEMBER_ACCESS_EXPRESSION)
            .and_then(|callee| callee.child_by_field(FIELD_EXPRESSION))
            .ok_or(FixError::MissingReceiver { span })?;

        let replacement = SyntaxNode::member_access(Arc::clone(receiver), view.member_name());
        tree.replace(invocation, replacement)
            .ok_or(FixError::NodeNotFound { span })
    }

    /// Apply the fix described by a JSON-serialized finding.
    ///
    /// Only the `span` and `dictionaryView` fields are read.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::MalformedPayload`] when the JSON lacks either field
    /// or names an unknown view, and any error of [`Self::fix_at`].
    pub fn fix_serialized(tree: &SyntaxTree, json: &str) -> Result<SyntaxTree, FixError> {
        let payload: Value =
            serde_json::from_str(json).map_err(|e| FixError::MalformedPayload(e.to_string()))?;
        let span = payload
            .get("span")
            .cloned()
            .ok_or_else(|| FixError::MalformedPayload("missing `span`".to_owned()))
            .and_then(|v| {
                serde_json::from_value::<TextSpan>(v)
                    .map_err(|e| FixError::MalformedPayload(format!("invalid `span`: {e}")))
            })?;
        let view = payload
            .get(PAYLOAD_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| FixError::MalformedPayload(format!("missing `{PAYLOAD_KEY}`")))?
            .parse::<ViewKind>()
            .map_err(|e| FixError::MalformedPayload(e.to_string()))?;
        Self::fix_at(tree, span, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    const SOURCE: &str = "class C { void M() { var k = Use(a.Select(kv => kv.Key)); } }";

    fn select_span(source: &str) -> TextSpan {
        let start = source.find("a.Select").unwrap();
        let end = source.find("kv.Key)").unwrap() + "kv.Key)".len();
        TextSpan::new(start, end)
    }

    #[test]
    fn test_fix_at_rewrites_invocation() {
        let tree = parse(SOURCE).unwrap();
        let fixed = DictionaryViewFixer::fix_at(&tree, select_span(SOURCE), ViewKind::Keys).unwrap();
        assert_eq!(
            fixed.text(),
            "class C { void M() { var k = Use(a.Keys); } }"
        );
        assert_eq!(tree.text(), SOURCE);
    }

    #[test]
    fn test_span_of_wrapping_argument_reaches_invocation() {
        let tree = parse(SOURCE).unwrap();
        let located = tree.find_node(select_span(SOURCE)).unwrap();
        assert_eq!(located.kind(), "argument");
        let fixed = DictionaryViewFixer::fix_at(&tree, select_span(SOURCE), ViewKind::Values).unwrap();
        assert!(fixed.text().contains("Use(a.Values)"));
    }

    #[test]
    fn test_partial_span_is_not_found() {
        let tree = parse(SOURCE).unwrap();
        let span = select_span(SOURCE);
        let inner = TextSpan::new(span.start + 2, span.end);
        assert_eq!(
            DictionaryViewFixer::fix_at(&tree, inner, ViewKind::Keys).unwrap_err(),
            FixError::NodeNotFound { span: inner }
        );
    }

    #[test]
    fn test_non_invocation_span() {
        let tree = parse(SOURCE).unwrap();
        let start = SOURCE.find("class").unwrap();
        let err = DictionaryViewFixer::fix_at(&tree, TextSpan::new(start, start + 5), ViewKind::Keys)
            .unwrap_err();
        assert!(matches!(err, FixError::NotAnInvocation { .. }));
    }

    #[test]
    fn test_invocation_without_member_access() {
        let tree = parse(SOURCE).unwrap();
        let start = SOURCE.find("Use(").unwrap();
        let end = SOURCE.find("));").unwrap() + 2;
        let err = DictionaryViewFixer::fix_at(&tree, TextSpan::new(start, end), ViewKind::Keys)
            .unwrap_err();
        assert!(matches!(err, FixError::MissingReceiver { .. }));
    }

    #[test]
    fn test_fix_serialized_requires_view() {
        let tree = parse(SOURCE).unwrap();
        let span = select_span(SOURCE);
        let json = format!(r#"{{"span": {{"start": {}, "end": {}}}}}"#, span.start, span.end);
        assert_eq!(
            DictionaryViewFixer::fix_serialized(&tree, &json).unwrap_err(),
            FixError::MalformedPayload("missing `dictionaryView`".to_owned())
        );

        let json = format!(
            r#"{{"span": {{"start": {}, "end": {}}}, "dictionaryView": "Keys"}}"#,
            span.start, span.end
        );
        let fixed = DictionaryViewFixer::fix_serialized(&tree, &json).unwrap();
        assert!(fixed.text().contains("Use(a.Keys)"));
    }
}
