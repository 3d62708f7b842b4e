use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the project configuration file.
pub const CONFIG_FILENAME: &str = ".keyview.toml";

/// Extension of the source files the analyzer picks up.
pub const SOURCE_EXTENSION: &str = "cs";

/// Transform combinators recognized by default, as `Namespace.Container.Method`.
pub const DEFAULT_TRANSFORM_METHODS: &[&str] = &["System.Linq.Enumerable.Select"];

/// Key/value capabilities recognized by default.
pub const DEFAULT_CAPABILITIES: &[&str] = &[
    "System.Collections.Generic.IDictionary",
    "System.Collections.Generic.IReadOnlyDictionary",
];

/// Pair member naming the key of an entry.
pub const DEFAULT_KEY_COMPONENT: &str = "Key";
/// Pair member naming the value of an entry.
pub const DEFAULT_VALUE_COMPONENT: &str = "Value";

/// Upper bound on fixes applied to a single file in one run.
pub const MAX_FIXES_PER_FILE: usize = 10_000;

/// Regex for identifying generated source files by name.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_generated_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(?i)\.(?:g|g\.i|designer|generated)\.cs$")
            .expect("Invalid generated file regex pattern")
    })
}

/// Regex for the `<auto-generated>` marker comment at the top of generated files.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_auto_generated_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*//\s*<auto-?generated")
            .expect("Invalid auto-generated header regex pattern")
    })
}

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert(".git");
        s.insert(".vs");
        s.insert("bin");
        s.insert("obj");
        s.insert("node_modules");
        s.insert("packages");
        s
    })
}

pub use get_auto_generated_header_re as AUTO_GENERATED_HEADER_RE;
pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_generated_file_re as GENERATED_FILE_RE;
