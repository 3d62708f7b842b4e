//! `DictionarySelectKeyValue`: `dict.Select(kv => kv.Key)` should be `dict.Keys`.
//!
//! Projecting every entry of a dictionary onto its key (or value) through
//! `Enumerable.Select` allocates an iterator and a delegate call per entry,
//! while the dictionary already exposes the same sequence as a view.
//!
//! The rule only fires when every step below holds:
//!
//! 1. the node is an invocation of a member access that resolves to a
//!    configured transform method (`System.Linq.Enumerable.Select`);
//! 2. the receiver resolves to a local, field, property, parameter or method
//!    whose type is, or implements, a key/value capability;
//! 3. the first argument is a lambda or `delegate` with exactly one parameter;
//! 4. the lambda returns `param.Key` or `param.Value`, with nothing around it;
//! 5. that component maps to a view.

mod lambda;
mod view;

pub use lambda::{is_anonymous_function, return_expression, LambdaShape};
pub use view::{PairComponents, UnknownView, ViewKind};

use crate::config::Config;
use crate::rules::finding::create_finding;
use crate::rules::ids::RULE_ID_DICTIONARY_VIEW;
use crate::rules::{Context, Finding, Rule, RuleMetadata};
use crate::semantic::{MethodSymbol, QualifiedName, SemanticModel};
use crate::syntax::kinds::{
    ARGUMENT, FIELD_ARGUMENTS, FIELD_EXPRESSION, FIELD_FUNCTION, FIELD_NAME, IDENTIFIER,
    INVOCATION_EXPRESSION, MEMBER_ACCESS_EXPRESSION,
};
use crate::syntax::SyntaxNode;
use compact_str::CompactString;

/// Diagnostic name of the rule.
pub const RULE_NAME: &str = "DictionarySelectKeyValue";

const META: RuleMetadata = RuleMetadata {
    id: RULE_ID_DICTIONARY_VIEW,
    name: RULE_NAME,
    category: "Performance",
};

const SEVERITY: &str = "MEDIUM";

/// A transform combinator: a method identified by its container and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformMethod {
    container: QualifiedName,
    name: CompactString,
}

impl TransformMethod {
    /// Parse `Namespace.Container.Method`. `None` without a container.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (container, name) = text.trim().rsplit_once('.')?;
        if container.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            container: QualifiedName::parse(container),
            name: name.into(),
        })
    }

    /// Whether `method` is this combinator.
    #[must_use]
    pub fn matches(&self, method: &MethodSymbol) -> bool {
        method.name == self.name && method.containing_type == self.container
    }
}

/// What the rule looks for.
#[derive(Debug, Clone)]
pub struct DictionaryViewSettings {
    /// Transform combinators whose projections are inspected.
    pub transforms: Vec<TransformMethod>,
    /// Interfaces marking a receiver as a dictionary.
    pub capabilities: Vec<QualifiedName>,
    /// Member names of a key/value pair.
    pub components: PairComponents,
}

impl Default for DictionaryViewSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DictionaryViewSettings {
    /// Settings from the `[keyview]` section, defaults filled in.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let keyview = &config.keyview;
        let transforms = keyview
            .transform_methods()
            .iter()
            .filter_map(|text| {
                let method = TransformMethod::parse(text);
                if method.is_none() {
                    tracing::warn!(method = %text, "ignoring transform method without a container");
                }
                method
            })
            .collect();
        let capabilities = keyview
            .capabilities()
            .iter()
            .map(|c| QualifiedName::parse(c))
            .collect();
        Self {
            transforms,
            capabilities,
            components: PairComponents::new(keyview.key_component(), keyview.value_component()),
        }
    }
}

/// A successful match: the view to use and the component that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMatch<'a> {
    /// View replacing the projection.
    pub view: ViewKind,
    /// Component the lambda selected, as written.
    pub component: &'a str,
}

/// Detects `Select` projections of a dictionary onto its keys or values.
#[derive(Debug, Clone, Default)]
pub struct DictionaryViewRule {
    settings: DictionaryViewSettings,
}

impl DictionaryViewRule {
    /// Rule with explicit settings.
    #[must_use]
    pub fn new(settings: DictionaryViewSettings) -> Self {
        Self { settings }
    }

    /// Rule configured from the `[keyview]` section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(DictionaryViewSettings::from_config(config))
    }

    /// Match `node` against the pattern. Every failed step is a silent `None`.
    #[must_use]
    pub fn match_node(&self, node: &SyntaxNode, model: &dyn SemanticModel) -> Option<ViewMatch<'_>> {
        if node.kind() != INVOCATION_EXPRESSION {
            return None;
        }

        // 1. `receiver.Select(...)` bound to a configured transform
        let callee = node
            .child_by_field(FIELD_FUNCTION)
            .filter(|c| c.kind() == MEMBER_ACCESS_EXPRESSION)?;
        let symbol = model.symbol_of(callee)?;
        let method = symbol.as_method()?;
        if !self.settings.transforms.iter().any(|t| t.matches(method)) {
            return None;
        }

        // 2. receiver typed as a dictionary
        let receiver = callee.child_by_field(FIELD_EXPRESSION)?;
        let receiver_symbol = model.symbol_of(receiver)?;
        let receiver_type = receiver_symbol.declared_type()?;
        if !model.implements_any(receiver_type, &self.settings.capabilities) {
            return None;
        }

        // 3. single-parameter lambda or anonymous method as first argument
        let argument = node
            .child_by_field(FIELD_ARGUMENTS)?
            .significant_children()
            .next()
            .filter(|a| a.kind() == ARGUMENT)?;
        let lambda = argument
            .significant_children()
            .last()
            .filter(|e| is_anonymous_function(e))?;
        let shape = LambdaShape::classify(lambda)?;
        let parameter = shape.single_parameter()?;

        // 4. returns `parameter.Component`
        let projection =
            return_expression(lambda).filter(|e| e.kind() == MEMBER_ACCESS_EXPRESSION)?;
        let target = projection
            .child_by_field(FIELD_EXPRESSION)
            .filter(|t| t.kind() == IDENTIFIER)?;
        if target.text() != parameter {
            return None;
        }
        let member = projection
            .child_by_field(FIELD_NAME)
            .filter(|n| n.kind() == IDENTIFIER)?
            .text();

        // 5. component to view
        let view = self.settings.components.view_for(&member)?;
        Some(ViewMatch {
            view,
            component: self.settings.components.component(view),
        })
    }
}

impl Rule for DictionaryViewRule {
    fn metadata(&self) -> RuleMetadata {
        META
    }

    fn visit_node(&self, node: &SyntaxNode, context: &Context<'_>) -> Option<Finding> {
        let ViewMatch { view, component } = self.match_node(node, context.model)?;
        Some(create_finding(
            &format!(
                "Prefer the `.{}` view instead of selecting `.{component}`",
                view.member_name()
            ),
            META,
            context,
            node.span(),
            SEVERITY,
            view,
            vec![component.to_owned()],
        ))
    }
}
