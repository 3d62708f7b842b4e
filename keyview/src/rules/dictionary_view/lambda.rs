//! Classification of anonymous function arguments: lambdas and
//! `delegate (...) { ... }` methods.

use crate::syntax::kinds::{
    ANONYMOUS_METHOD_EXPRESSION, BLOCK, FIELD_BODY, FIELD_NAME, FIELD_PARAMETERS, IDENTIFIER,
    IMPLICIT_PARAMETER, LAMBDA_EXPRESSION, PARAMETER, PARAMETER_LIST, RETURN_STATEMENT,
};
use crate::syntax::SyntaxNode;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::sync::Arc;

/// Whether `node` is a lambda or an anonymous method.
#[must_use]
pub fn is_anonymous_function(node: &SyntaxNode) -> bool {
    matches!(node.kind(), LAMBDA_EXPRESSION | ANONYMOUS_METHOD_EXPRESSION)
}

/// Parameter shape of an anonymous function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaShape {
    /// `kv => ...`
    Simple(CompactString),
    /// `(kv) => ...`, `(a, b) => ...`, `(KeyValuePair<K, V> kv) => ...` or
    /// `delegate (KeyValuePair<K, V> kv) { ... }`
    Parenthesized(SmallVec<[CompactString; 2]>),
}

impl LambdaShape {
    /// Shape of a lambda or anonymous method; `None` for any other node, for
    /// `delegate { ... }` without a parameter list and for parameter lists
    /// this module does not understand.
    #[must_use]
    pub fn classify(lambda: &SyntaxNode) -> Option<Self> {
        if lambda.kind() == ANONYMOUS_METHOD_EXPRESSION {
            let parameters = lambda
                .child_by_field(FIELD_PARAMETERS)
                .filter(|p| p.kind() == PARAMETER_LIST)?;
            return Self::from_parameter_list(parameters);
        }
        if lambda.kind() != LAMBDA_EXPRESSION {
            return None;
        }
        let parameters = lambda.child_by_field(FIELD_PARAMETERS).or_else(|| {
            lambda
                .significant_children()
                .find(|c| matches!(c.kind(), PARAMETER_LIST | IMPLICIT_PARAMETER | IDENTIFIER))
        })?;

        match parameters.kind() {
            IMPLICIT_PARAMETER | IDENTIFIER => Some(Self::Simple(parameters.text().into())),
            PARAMETER_LIST => Self::from_parameter_list(parameters),
            _ => None,
        }
    }

    fn from_parameter_list(list: &SyntaxNode) -> Option<Self> {
        list.significant_children()
            .filter(|c| c.kind() == PARAMETER)
            .map(|p| {
                p.child_by_field(FIELD_NAME)
                    .filter(|n| n.kind() == IDENTIFIER)
                    .map(|n| CompactString::from(n.text()))
            })
            .collect::<Option<SmallVec<_>>>()
            .map(Self::Parenthesized)
    }

    /// The parameter name when the lambda takes exactly one parameter.
    #[must_use]
    pub fn single_parameter(&self) -> Option<&str> {
        match self {
            Self::Simple(name) => Some(name.as_str()),
            Self::Parenthesized(names) if names.len() == 1 => names.first().map(CompactString::as_str),
            Self::Parenthesized(_) => None,
        }
    }
}

/// The expression an anonymous function returns: its expression body, or the
/// operand of the only statement of a block body when that statement is
/// `return expr;`.
#[must_use]
pub fn return_expression(lambda: &SyntaxNode) -> Option<&Arc<SyntaxNode>> {
    let body = lambda
        .child_by_field(FIELD_BODY)
        .or_else(|| lambda.significant_children().last())?;
    if body.kind() != BLOCK {
        return Some(body);
    }

    let mut statements = body.significant_children();
    let statement = statements.next()?;
    if statements.next().is_some() || statement.kind() != RETURN_STATEMENT {
        return None;
    }
    let mut operands = statement.significant_children();
    let operand = operands.next()?;
    operands.next().is_none().then_some(operand)
}
