//! Core library for keyview.
//!
//! keyview finds C# code that projects a dictionary onto its keys or values
//! through LINQ (`dict.Select(kv => kv.Key)`) and rewrites it to the
//! dictionary's own view (`dict.Keys`).
//!
//! The pipeline is:
//! - [`syntax`]: tree-sitter parsing into immutable, rewritable trees
//! - [`semantic`]: symbol and interface facts the rules consult
//! - [`rules`]: the detector, producing [`rules::Finding`]s
//! - [`fix`]: the fixer, turning a finding into a new tree

#![allow(clippy::too_many_arguments, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the core analyzer logic.
/// Runs rules over trees and files, sequentially or in parallel.
pub mod analyzer;

/// Module for loading configuration.
pub mod config;

/// Module containing the implementation of the analysis rules.
pub mod rules;

/// Module containing the fixers that rewrite findings.
pub mod fix;

/// Module for the semantic model rules query.
pub mod semantic;

/// Module for C# syntax trees.
pub mod syntax;

/// Module containing utility functions.
pub mod utils;

/// Module defining the entry point logic shared by the binary and tests.
pub mod entry_point;

/// Module containing shared constants and regex patterns.
pub mod constants;
/// Module containing the linter logic and visitor.
pub mod linter;

/// Module for rich CLI output formatting with colored text and tables.
pub mod output;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;
