//! Semantic facts the rules need but syntax cannot prove.
//!
//! A [`SemanticModel`] answers what an expression denotes ([`Symbol`]) and
//! which interfaces a type implements. The rules only read from it, so one
//! model can serve any number of threads.

use crate::syntax::SyntaxNode;
use compact_str::CompactString;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

mod table;

pub use table::TableModel;

/// A namespace-qualified type or member-container name.
///
/// Generic arguments and arity markers are dropped: `IDictionary<TKey, TValue>`
/// and ``IDictionary`2`` both name `IDictionary`. Array and nullable suffixes
/// are kept, so `Dictionary<K, V>[]` names `Dictionary[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    namespace: CompactString,
    name: CompactString,
}

impl QualifiedName {
    /// Create a name from its namespace and simple name.
    #[must_use]
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.into(),
            name: CompactString::from(strip_generics(name).as_ref()),
        }
    }

    /// Parse a dotted name such as `System.Collections.Generic.Dictionary<string, int>`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = strip_generics(text.trim());
        match text.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", &text),
        }
    }

    /// Namespace, empty for the global namespace
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Simple name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

fn strip_generics(text: &str) -> Cow<'_, str> {
    let Some(start) = text.find(['<', '`']) else {
        return Cow::Borrowed(text);
    };
    let head = text[..start].trim_end();
    let rest = &text[start..];

    let suffix = if rest.starts_with('`') {
        rest[1..].trim_start_matches(|c: char| c.is_ascii_digit())
    } else {
        let mut depth = 0usize;
        let close = rest.char_indices().find_map(|(i, c)| {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            None
        });
        // Unbalanced brackets: keep the head only.
        close.map_or("", |i| &rest[i + 1..])
    };

    let suffix = suffix.trim();
    if suffix.is_empty() {
        Cow::Borrowed(head)
    } else {
        Cow::Owned(format!("{head}{suffix}"))
    }
}

/// A method as resolved by the semantic model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    /// Method name
    pub name: CompactString,
    /// Type declaring the method
    pub containing_type: QualifiedName,
    /// Return type, when known
    pub return_type: Option<QualifiedName>,
}

/// What an expression denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A local variable
    Local {
        /// Variable name
        name: CompactString,
        /// Declared type
        ty: QualifiedName,
    },
    /// A field
    Field {
        /// Field name
        name: CompactString,
        /// Declared type
        ty: QualifiedName,
    },
    /// A property
    Property {
        /// Property name
        name: CompactString,
        /// Declared type
        ty: QualifiedName,
    },
    /// A method or lambda parameter
    Parameter {
        /// Parameter name
        name: CompactString,
        /// Declared type
        ty: QualifiedName,
    },
    /// A method; an invocation resolves to the method it calls
    Method(MethodSymbol),
    /// A type used as an expression (static member access)
    NamedType(QualifiedName),
    /// A namespace
    Namespace(CompactString),
}

impl Symbol {
    /// Type of the value this symbol produces: the declared type of variables,
    /// fields, properties and parameters, or a method's return type.
    /// `None` for types, namespaces and methods with an unknown return type.
    #[must_use]
    pub fn declared_type(&self) -> Option<&QualifiedName> {
        match self {
            Self::Local { ty, .. }
            | Self::Field { ty, .. }
            | Self::Property { ty, .. }
            | Self::Parameter { ty, .. } => Some(ty),
            Self::Method(method) => method.return_type.as_ref(),
            Self::NamedType(_) | Self::Namespace(_) => None,
        }
    }

    /// The method this symbol denotes, if any
    #[must_use]
    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            Self::Method(method) => Some(method),
            _ => None,
        }
    }
}

/// Read-only semantic queries over one compilation.
pub trait SemanticModel: Send + Sync {
    /// Symbol denoted by an expression node, or `None` when it cannot be resolved.
    fn symbol_of(&self, expr: &SyntaxNode) -> Option<Symbol>;

    /// All interfaces `ty` implements, directly or transitively. The type
    /// itself is not included.
    fn all_interfaces(&self, ty: &QualifiedName) -> Vec<QualifiedName>;

    /// Whether `ty` is, or implements, any of `capabilities`.
    fn implements_any(&self, ty: &QualifiedName, capabilities: &[QualifiedName]) -> bool {
        capabilities.contains(ty)
            || self
                .all_interfaces(ty)
                .iter()
                .any(|interface| capabilities.contains(interface))
    }
}
