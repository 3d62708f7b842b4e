use crate::rules::dictionary_view::ViewKind;
use crate::rules::{Context, Finding, RuleMetadata};
use crate::syntax::TextSpan;

/// Create a Finding with accurate line/column mapping from a node span.
pub(super) fn create_finding(
    msg: &str,
    metadata: RuleMetadata,
    context: &Context<'_>,
    span: TextSpan,
    severity: &str,
    view: ViewKind,
    message_args: Vec<String>,
) -> Finding {
    let line = context.line_index.line_index(span.start);
    let col = context.line_index.column_index(span.start);
    Finding {
        message: msg.to_owned(),
        rule_id: metadata.id.to_owned(),
        rule_name: metadata.name.to_owned(),
        category: metadata.category.to_owned(),
        file: context.filename.to_path_buf(),
        line,
        col,
        severity: severity.to_owned(),
        span,
        view,
        message_args,
    }
}
