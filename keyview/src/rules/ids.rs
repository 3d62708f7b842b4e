//! Centralized Rule IDs for keyview.

/// Performance: `Select` over a dictionary projecting only keys or only values
pub const RULE_ID_DICTIONARY_VIEW: &str = "KV-P001";
