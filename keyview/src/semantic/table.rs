//! Table-driven semantic model.
//!
//! Bindings map expression text to symbols; type declarations map a type to
//! the interfaces it directly implements. A prelude declares the BCL
//! collection types and the LINQ `Select` extension so that a model file only
//! has to bind the project's own expressions.
//!
//! ```toml
//! [[types]]
//! name = "App.Settings"
//! interfaces = ["System.Collections.Generic.IReadOnlyDictionary"]
//!
//! [[symbols]]
//! expr = "settings"
//! kind = "field"
//! type = "App.Settings"
//!
//! [[symbols]]
//! expr = "ctx.GetDictionary()"
//! kind = "method"
//! container = "App.Context"
//! returns = "System.Collections.Generic.IDictionary<string, string>"
//! ```

use super::{MethodSymbol, QualifiedName, SemanticModel, Symbol};
use crate::syntax::kinds::{FIELD_NAME, MEMBER_ACCESS_EXPRESSION};
use crate::syntax::SyntaxNode;
use anyhow::{bail, Context as _, Result};
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const GENERIC: &str = "System.Collections.Generic";
const CONCURRENT: &str = "System.Collections.Concurrent";
const IMMUTABLE: &str = "System.Collections.Immutable";
const OBJECT_MODEL: &str = "System.Collections.ObjectModel";

/// Semantic model backed by explicit tables.
#[derive(Debug, Default, Clone)]
pub struct TableModel {
    bindings: FxHashMap<CompactString, Symbol>,
    types: FxHashMap<QualifiedName, Vec<QualifiedName>>,
    extension_methods: FxHashMap<CompactString, MethodSymbol>,
}

impl TableModel {
    /// An empty model that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A model preloaded with the BCL collection types and `Enumerable.Select`.
    #[must_use]
    pub fn with_prelude() -> Self {
        let mut model = Self::new();
        let generic = |name: &str| QualifiedName::new(GENERIC, name);

        model.declare_type(generic("IEnumerable"), []);
        model.declare_type(generic("ICollection"), [generic("IEnumerable")]);
        model.declare_type(generic("IReadOnlyCollection"), [generic("IEnumerable")]);
        model.declare_type(
            generic("IList"),
            [generic("ICollection"), generic("IEnumerable")],
        );
        model.declare_type(
            generic("IReadOnlyList"),
            [generic("IReadOnlyCollection"), generic("IEnumerable")],
        );
        model.declare_type(
            generic("IDictionary"),
            [generic("ICollection"), generic("IEnumerable")],
        );
        model.declare_type(
            generic("IReadOnlyDictionary"),
            [generic("IReadOnlyCollection"), generic("IEnumerable")],
        );
        model.declare_type(
            QualifiedName::new(IMMUTABLE, "IImmutableDictionary"),
            [generic("IReadOnlyDictionary")],
        );

        let dictionaries = [
            generic("Dictionary"),
            generic("SortedDictionary"),
            generic("SortedList"),
            QualifiedName::new(CONCURRENT, "ConcurrentDictionary"),
            QualifiedName::new(OBJECT_MODEL, "ReadOnlyDictionary"),
        ];
        for dictionary in dictionaries {
            model.declare_type(
                dictionary,
                [generic("IDictionary"), generic("IReadOnlyDictionary")],
            );
        }
        for immutable in ["ImmutableDictionary", "ImmutableSortedDictionary"] {
            model.declare_type(
                QualifiedName::new(IMMUTABLE, immutable),
                [
                    QualifiedName::new(IMMUTABLE, "IImmutableDictionary"),
                    generic("IDictionary"),
                ],
            );
        }
        model.declare_type(
            generic("List"),
            [generic("IList"), generic("IReadOnlyList")],
        );
        model.declare_type(
            generic("HashSet"),
            [generic("ICollection"), generic("IReadOnlyCollection")],
        );

        model.register_extension_method(MethodSymbol {
            name: "Select".into(),
            containing_type: QualifiedName::new("System.Linq", "Enumerable"),
            return_type: Some(generic("IEnumerable")),
        });
        model
    }

    /// Bind an expression's text to a symbol. Whitespace is not significant.
    pub fn bind(&mut self, expr: &str, symbol: Symbol) -> &mut Self {
        self.bindings.insert(normalize_expr(expr), symbol);
        self
    }

    /// Declare a type and the interfaces it directly implements.
    pub fn declare_type(
        &mut self,
        ty: QualifiedName,
        interfaces: impl IntoIterator<Item = QualifiedName>,
    ) -> &mut Self {
        self.types
            .entry(ty)
            .or_default()
            .extend(interfaces);
        self
    }

    /// Register an extension method. A member access naming it resolves to it
    /// unless the member access has an explicit binding.
    pub fn register_extension_method(&mut self, method: MethodSymbol) -> &mut Self {
        self.extension_methods.insert(method.name.clone(), method);
        self
    }

    /// Parse a TOML model on top of the prelude.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ModelFile = toml::from_str(content).context("invalid model file")?;
        let mut model = Self::with_prelude();

        for ty in file.types {
            model.declare_type(
                QualifiedName::parse(&ty.name),
                ty.interfaces.iter().map(|i| QualifiedName::parse(i)),
            );
        }
        for method in file.extension_methods {
            model.register_extension_method(MethodSymbol {
                name: method.name.into(),
                containing_type: QualifiedName::parse(&method.container),
                return_type: method.returns.as_deref().map(QualifiedName::parse),
            });
        }
        for spec in file.symbols {
            let symbol = spec.to_symbol()?;
            model.bind(&spec.expr, symbol);
        }
        Ok(model)
    }

    /// Load a TOML model file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read model file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to load model file {}", path.display()))
    }
}

impl SemanticModel for TableModel {
    fn symbol_of(&self, expr: &SyntaxNode) -> Option<Symbol> {
        if let Some(symbol) = self.bindings.get(&normalize_expr(&expr.text())) {
            return Some(symbol.clone());
        }
        if expr.kind() != MEMBER_ACCESS_EXPRESSION {
            return None;
        }
        let name = expr.child_by_field(FIELD_NAME)?.simple_name()?;
        self.extension_methods
            .get(name.as_str())
            .map(|method| Symbol::Method(method.clone()))
    }

    fn all_interfaces(&self, ty: &QualifiedName) -> Vec<QualifiedName> {
        let mut seen = FxHashSet::default();
        let mut pending: Vec<&QualifiedName> = self
            .types
            .get(ty)
            .map(|direct| direct.iter().collect())
            .unwrap_or_default();
        let mut result = Vec::new();

        while let Some(interface) = pending.pop() {
            if interface == ty || !seen.insert(interface) {
                continue;
            }
            result.push(interface.clone());
            if let Some(inherited) = self.types.get(interface) {
                pending.extend(inherited);
            }
        }
        result
    }
}

fn normalize_expr(text: &str) -> CompactString {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    #[serde(default)]
    types: Vec<TypeSpec>,
    #[serde(default)]
    symbols: Vec<SymbolSpec>,
    #[serde(default)]
    extension_methods: Vec<ExtensionMethodSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeSpec {
    name: String,
    #[serde(default)]
    interfaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExtensionMethodSpec {
    name: String,
    container: String,
    returns: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SymbolKindSpec {
    Local,
    Field,
    Property,
    Parameter,
    Method,
    Type,
    Namespace,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SymbolSpec {
    expr: String,
    kind: SymbolKindSpec,
    name: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    container: Option<String>,
    returns: Option<String>,
}

impl SymbolSpec {
    fn to_symbol(&self) -> Result<Symbol> {
        let name = CompactString::from(self.name.as_deref().unwrap_or_else(|| self.default_name()));
        let symbol = match self.kind {
            SymbolKindSpec::Local => Symbol::Local { name, ty: self.declared_type()? },
            SymbolKindSpec::Field => Symbol::Field { name, ty: self.declared_type()? },
            SymbolKindSpec::Property => Symbol::Property { name, ty: self.declared_type()? },
            SymbolKindSpec::Parameter => Symbol::Parameter { name, ty: self.declared_type()? },
            SymbolKindSpec::Method => {
                let Some(container) = &self.container else {
                    bail!("method symbol `{}` needs a `container`", self.expr);
                };
                Symbol::Method(MethodSymbol {
                    name,
                    containing_type: QualifiedName::parse(container),
                    return_type: self.returns.as_deref().map(QualifiedName::parse),
                })
            }
            SymbolKindSpec::Type => Symbol::NamedType(self.declared_type()?),
            SymbolKindSpec::Namespace => Symbol::Namespace(name),
        };
        Ok(symbol)
    }

    fn declared_type(&self) -> Result<QualifiedName> {
        match &self.ty {
            Some(ty) => Ok(QualifiedName::parse(ty)),
            None => bail!("symbol `{}` needs a `type`", self.expr),
        }
    }

    /// Last identifier of the expression: `GetDictionary` for `c.GetDictionary()`.
    fn default_name(&self) -> &str {
        let expr = self.expr.trim().trim_end_matches("()");
        let expr = expr.split('(').next().unwrap_or(expr);
        expr.rsplit('.').next().unwrap_or(expr).trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{kinds, parse};

    fn dictionary() -> QualifiedName {
        QualifiedName::new(GENERIC, "Dictionary")
    }

    #[test]
    fn test_prelude_dictionary_implements_idictionary_transitively() {
        let model = TableModel::with_prelude();
        let interfaces = model.all_interfaces(&dictionary());
        assert!(interfaces.contains(&QualifiedName::new(GENERIC, "IDictionary")));
        assert!(interfaces.contains(&QualifiedName::new(GENERIC, "IEnumerable")));
        assert!(!interfaces.contains(&dictionary()));
    }

    #[test]
    fn test_interface_cycles_terminate() {
        let mut model = TableModel::new();
        let a = QualifiedName::parse("App.IA");
        let b = QualifiedName::parse("App.IB");
        model.declare_type(a.clone(), [b.clone()]);
        model.declare_type(b.clone(), [a.clone()]);
        assert_eq!(model.all_interfaces(&a), vec![b]);
    }

    #[test]
    fn test_unknown_type_has_no_interfaces() {
        let model = TableModel::with_prelude();
        assert!(model.all_interfaces(&QualifiedName::parse("App.KV[]")).is_empty());
    }

    #[test]
    fn test_binding_ignores_whitespace() {
        let source = "class C { void M() { var x = c . Dictionary; } }";
        let tree = parse(source).unwrap();
        let mut model = TableModel::new();
        model.bind(
            "c.Dictionary",
            Symbol::Property {
                name: "Dictionary".into(),
                ty: dictionary(),
            },
        );
        let access = tree
            .nodes()
            .find(|n| n.kind() == kinds::MEMBER_ACCESS_EXPRESSION)
            .unwrap();
        assert_eq!(
            model.symbol_of(access).and_then(|s| s.declared_type().cloned()),
            Some(dictionary())
        );
    }

    #[test]
    fn test_extension_method_fallback() {
        let source = "class C { void M() { var x = items.Select(i => i); } }";
        let tree = parse(source).unwrap();
        let model = TableModel::with_prelude();
        let access = tree
            .nodes()
            .find(|n| n.kind() == kinds::MEMBER_ACCESS_EXPRESSION)
            .unwrap();
        let symbol = model.symbol_of(access).unwrap();
        let method = symbol.as_method().unwrap();
        assert_eq!(method.name, "Select");
        assert_eq!(method.containing_type.to_string(), "System.Linq.Enumerable");
    }

    #[test]
    fn test_model_file_symbols() {
        let model = TableModel::from_toml_str(
            r#"
[[types]]
name = "App.Settings"
interfaces = ["System.Collections.Generic.IReadOnlyDictionary<string, string>"]

[[symbols]]
expr = "settings"
kind = "field"
type = "App.Settings"

[[symbols]]
expr = "ctx.GetDictionary()"
kind = "method"
container = "App.Context"
returns = "System.Collections.Generic.IDictionary<string, string>"
"#,
        )
        .unwrap();

        let settings = QualifiedName::parse("App.Settings");
        assert!(model.implements_any(
            &settings,
            &[QualifiedName::new(GENERIC, "IReadOnlyDictionary")]
        ));

        let tree = parse("class C { void M() { var d = ctx.GetDictionary(); } }").unwrap();
        let call = tree
            .nodes()
            .find(|n| n.kind() == kinds::INVOCATION_EXPRESSION)
            .unwrap();
        let symbol = model.symbol_of(call).unwrap();
        assert_eq!(symbol.as_method().unwrap().name, "GetDictionary");
        assert_eq!(
            symbol.declared_type(),
            Some(&QualifiedName::new(GENERIC, "IDictionary"))
        );
    }

    #[test]
    fn test_model_file_rejects_variable_without_type() {
        let err = TableModel::from_toml_str(
            r#"
[[symbols]]
expr = "a"
kind = "local"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("needs a `type`"));
    }
}
