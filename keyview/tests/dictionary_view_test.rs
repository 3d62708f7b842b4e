//! Tests for the dictionary view rule on real C# sources.
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use keyview::analyzer::Analyzer;
use keyview::config::Config;
use keyview::rules::dictionary_view::ViewKind;
use keyview::rules::Finding;
use keyview::semantic::TableModel;
use keyview::syntax::parse;
use std::path::Path;

const MODEL: &str = r#"
[[types]]
name = "App.Settings"
interfaces = ["System.Collections.Generic.IReadOnlyDictionary<string, string>"]

[[types]]
name = "App.KV"

[[symbols]]
expr = "a"
kind = "local"
type = "System.Collections.Generic.Dictionary<string, string>"

[[symbols]]
expr = "b"
kind = "local"
type = "App.KV[]"

[[symbols]]
expr = "maps"
kind = "local"
type = "System.Collections.Generic.Dictionary<string, string>[]"

[[symbols]]
expr = "d"
kind = "parameter"
type = "System.Collections.Generic.IDictionary<string, string>"

[[symbols]]
expr = "_cache"
kind = "field"
type = "System.Collections.Concurrent.ConcurrentDictionary<int, string>"

[[symbols]]
expr = "this.Settings"
kind = "property"
type = "App.Settings"

[[symbols]]
expr = "c.DictionaryContext.GetDictionary()"
kind = "method"
container = "App.DictionaryContext"
returns = "System.Collections.Generic.IDictionary<string, string>"

[[symbols]]
expr = "q"
kind = "local"
type = "System.Collections.Generic.Dictionary<string, string>"

[[symbols]]
expr = "q.Select"
kind = "method"
container = "App.QueryExtensions"
returns = "System.Collections.Generic.IEnumerable"

[[symbols]]
expr = "System"
kind = "namespace"
"#;

fn analyzer() -> Analyzer {
    let model = TableModel::from_toml_str(MODEL).expect("model should load");
    Analyzer::new(Config::default(), Box::new(model))
}

fn check(body: &str) -> (String, Vec<Finding>) {
    let source = format!(
        "using System.Linq;\n\nclass C\n{{\n    void M(IDictionary<string, string> d, Context c)\n    {{\n        {body}\n    }}\n}}\n"
    );
    let tree = parse(&source).expect("source should parse");
    let findings = analyzer().detect(&tree, Path::new("C.cs"));
    (source, findings)
}

fn flagged_text<'a>(source: &'a str, finding: &Finding) -> &'a str {
    &source[finding.span.start..finding.span.end]
}

#[test]
fn test_local_dictionary_key_projection() {
    let (source, findings) = check("var keys = a.Select(kv => kv.Key);");
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.rule_id, "KV-P001");
    assert_eq!(finding.rule_name, "DictionarySelectKeyValue");
    assert_eq!(finding.category, "Performance");
    assert_eq!(finding.severity, "MEDIUM");
    assert_eq!(finding.view, ViewKind::Keys);
    assert_eq!(finding.message_args, vec!["Key".to_owned()]);
    assert_eq!(flagged_text(&source, finding), "a.Select(kv => kv.Key)");
    assert_eq!(finding.line, 7);
    assert_eq!(finding.col, 20);
    assert_eq!(finding.file, Path::new("C.cs"));
}

#[test]
fn test_parameter_block_body_value_projection() {
    let (source, findings) = check("var values = d.Select(kv => { return kv.Value; });");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].view, ViewKind::Values);
    assert_eq!(
        flagged_text(&source, &findings[0]),
        "d.Select(kv => { return kv.Value; })"
    );
}

#[test]
fn test_parenthesized_single_parameter() {
    let (_, findings) = check("var values = a.Select((kv) => kv.Value);");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].view, ViewKind::Values);
}

#[test]
fn test_method_return_value_receiver() {
    let (source, findings) =
        check("var keys = c.DictionaryContext.GetDictionary().Select(e => e.Key);");
    assert_eq!(findings.len(), 1);
    assert_eq!(
        flagged_text(&source, &findings[0]),
        "c.DictionaryContext.GetDictionary().Select(e => e.Key)"
    );
}

#[test]
fn test_field_and_property_receivers() {
    let (_, findings) = check(
        "var ids = _cache.Select(e => e.Key);\n        var names = this.Settings.Select(e => e.Value);",
    );
    let views: Vec<ViewKind> = findings.iter().map(|f| f.view).collect();
    assert_eq!(views, vec![ViewKind::Keys, ViewKind::Values]);
}

#[test]
fn test_anonymous_method_projection() {
    let (source, findings) = check(
        "var keys = a.Select(delegate (KeyValuePair<string, string> kv) { return kv.Key; });",
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].view, ViewKind::Keys);
    assert_eq!(
        flagged_text(&source, &findings[0]),
        "a.Select(delegate (KeyValuePair<string, string> kv) { return kv.Key; })"
    );

    let tree = parse(&source).unwrap();
    let fixed = keyview::fix::DictionaryViewFixer::fix(&tree, &findings[0]).unwrap();
    assert!(fixed.text().contains("var keys = a.Keys;"));
}

#[test]
fn test_parameterless_anonymous_method_is_not_flagged() {
    let (_, findings) = check("var keys = a.Select(delegate { return 1; });");
    assert!(findings.is_empty());
}

#[test]
fn test_compound_body_is_not_flagged() {
    let (_, findings) = check("var both = a.Select(kv => kv.Key + kv.Value);");
    assert!(findings.is_empty());
}

#[test]
fn test_array_of_pairs_is_not_flagged() {
    let (_, findings) = check("var keys = b.Select(kv => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_array_of_dictionaries_is_not_flagged() {
    let (_, findings) = check("var keys = maps.Select(kv => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_two_parameter_lambda_is_not_flagged() {
    let (_, findings) = check("var keys = a.Select((kv, i) => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_multi_statement_block_is_not_flagged() {
    let (_, findings) =
        check("var keys = a.Select(kv => { var k = kv.Key; return k; });");
    assert!(findings.is_empty());
}

#[test]
fn test_select_not_declared_by_enumerable_is_not_flagged() {
    let (_, findings) = check("var keys = q.Select(kv => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_unresolvable_receiver_is_not_flagged() {
    let (_, findings) = check("var keys = unknown.Select(kv => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_namespace_receiver_is_not_flagged() {
    let (_, findings) = check("var keys = System.Select(kv => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_other_member_is_not_flagged() {
    let (_, findings) = check("var lengths = a.Select(kv => kv.Key.Length);");
    assert!(findings.is_empty());
}

#[test]
fn test_other_combinator_is_not_flagged() {
    let (_, findings) = check("var keys = a.Where(kv => kv.Key);");
    assert!(findings.is_empty());
}

#[test]
fn test_nested_projection_inside_chain() {
    let (source, findings) = check("var first = a.Select(kv => kv.Key).OrderBy(k => k).First();");
    assert_eq!(findings.len(), 1);
    assert_eq!(flagged_text(&source, &findings[0]), "a.Select(kv => kv.Key)");
}

#[test]
fn test_finding_round_trips_through_json() {
    let (_, findings) = check("var keys = a.Select(kv => kv.Key);");
    let json = serde_json::to_string(&findings[0]).unwrap();
    assert!(json.contains(r#""dictionaryView":"Keys""#));
    assert_eq!(Finding::from_json(&json).unwrap(), findings[0]);
}

#[test]
fn test_custom_capability_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".keyview.toml"),
        "[keyview]\ncapabilities = [\"App.IStore\"]\n",
    )
    .unwrap();
    let config = Config::load_from_path(dir.path());

    let mut model = TableModel::from_toml_str(MODEL).unwrap();
    model.declare_type(
        keyview::semantic::QualifiedName::parse("App.Store"),
        [keyview::semantic::QualifiedName::parse("App.IStore")],
    );
    model.bind(
        "store",
        keyview::semantic::Symbol::Local {
            name: "store".into(),
            ty: keyview::semantic::QualifiedName::parse("App.Store"),
        },
    );
    let analyzer = Analyzer::new(config, Box::new(model));

    let source = "class C { void M() { var k = store.Select(e => e.Key); var v = a.Select(e => e.Key); } }";
    let tree = parse(source).unwrap();
    let findings = analyzer.detect(&tree, Path::new("C.cs"));
    assert_eq!(findings.len(), 1);
    assert_eq!(
        &source[findings[0].span.start..findings[0].span.end],
        "store.Select(e => e.Key)"
    );
}
