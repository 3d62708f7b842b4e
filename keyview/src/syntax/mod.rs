//! C# syntax trees: parsing, navigation and copy-on-write rewriting.

mod builder;
#[allow(missing_docs)]
pub mod kinds;
mod node;
mod parser;

pub use node::{Descendants, SyntaxNode, SyntaxTree, TextSpan};
pub use parser::{parse, CSharpParser, ParseError};
