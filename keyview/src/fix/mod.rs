//! Automatic remediation of findings.
//!
//! Fixers never edit text directly: they re-locate the flagged node in the
//! current tree and build a new tree around a synthesized replacement, so the
//! untouched parts of the file keep their exact formatting.

mod dictionary_view;

pub use dictionary_view::DictionaryViewFixer;

use crate::syntax::TextSpan;
use thiserror::Error;

/// Why a fix could not be applied. The input tree is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    /// No node of the tree covers the finding's span
    #[error("no node at {span}")]
    NodeNotFound {
        /// Span the finding pointed at
        span: TextSpan,
    },
    /// The node at the span is not an invocation and has no invocation child
    #[error("node at {span} is a `{kind}`, not an invocation")]
    NotAnInvocation {
        /// Span the finding pointed at
        span: TextSpan,
        /// Kind of the node found there
        kind: String,
    },
    /// The invocation is not called through a member access
    #[error("invocation at {span} has no member-access receiver")]
    MissingReceiver {
        /// Span of the invocation
        span: TextSpan,
    },
    /// A serialized finding lacks a usable span or view
    #[error("malformed finding payload: {0}")]
    MalformedPayload(String),
}
