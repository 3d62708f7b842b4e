//! Node kinds and field names of the tree-sitter C# grammar used by the rules.

pub const INVOCATION_EXPRESSION: &str = "invocation_expression";
pub const MEMBER_ACCESS_EXPRESSION: &str = "member_access_expression";
pub const ARGUMENT: &str = "argument";
pub const LAMBDA_EXPRESSION: &str = "lambda_expression";
pub const ANONYMOUS_METHOD_EXPRESSION: &str = "anonymous_method_expression";
pub const PARAMETER_LIST: &str = "parameter_list";
pub const PARAMETER: &str = "parameter";
/// Older grammar releases expose a bare lambda parameter as `identifier`.
pub const IMPLICIT_PARAMETER: &str = "implicit_parameter";
pub const IDENTIFIER: &str = "identifier";
pub const GENERIC_NAME: &str = "generic_name";
pub const BLOCK: &str = "block";
pub const RETURN_STATEMENT: &str = "return_statement";
pub const COMMENT: &str = "comment";
pub const DOT: &str = ".";

pub const FIELD_FUNCTION: &str = "function";
pub const FIELD_ARGUMENTS: &str = "arguments";
pub const FIELD_EXPRESSION: &str = "expression";
pub const FIELD_NAME: &str = "name";
pub const FIELD_PARAMETERS: &str = "parameters";
pub const FIELD_BODY: &str = "body";
