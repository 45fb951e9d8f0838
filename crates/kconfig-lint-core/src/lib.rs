//! # kconfig-lint-core
//!
//! Core framework for checking and fixing the style of Kconfig files.
//!
//! This crate provides the parsing pipeline and the rule engine:
//!
//! - [`tokenize`] splits text into logical lines, keeping every byte
//! - [`parse`] builds a [`SyntaxTree`] of entries with nesting depth
//! - [`EntryRule`], [`SiblingRule`] and [`LineRule`] for defining rules
//! - [`Linter`] for running rules and driving fix mode
//! - [`apply_fixes`] for splicing fixes into a buffer
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use kconfig_lint_core::{Linter, StyleProfile};
//!
//! let linter = Linter::from_profile(&registry, &profile)?;
//! for violation in linter.check(&text) {
//!     println!("{violation}");
//! }
//! let outcome = linter.fix(&text);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod fixer;
mod lexer;
mod linter;
mod parser;
mod registry;
mod rule;
mod syntax;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use config::{Config, ConfigError, FilesConfig, RuleConfig, StyleProfile};
pub use context::FileContext;
pub use fixer::{apply_fixes, FixConflict, FixError};
pub use lexer::{
    is_indent_char, lex_line, tokenize, visual_width, Keyword, LineEnding, PhysicalLine,
    PropertyKind, SourceLine, Token, TokenKind, TAB_WIDTH,
};
pub use linter::{
    FixOutcome, Linter, LinterBuilder, BUILTIN_CHECKS, FIX_CONFLICT, FIX_CONFLICT_CODE,
    INTERNAL_ERROR, INTERNAL_ERROR_CODE, MAX_FIX_PASSES,
};
pub use parser::{
    parse, UNMATCHED_CLOSER, UNMATCHED_CLOSER_CODE, UNTERMINATED_BLOCK, UNTERMINATED_BLOCK_CODE,
};
pub use registry::{Registry, RuleConstructor, RuleDescriptor};
pub use rule::{Capability, EntryRule, LineRule, Rule, RuleBox, RuleError, RuleResult, SiblingRule};
pub use syntax::{Entry, EntryKind, HelpBlock, LineRole, Property, SyntaxTree, Walk};
pub use types::{Fix, FileReport, LintResult, Location, Severity, Violation, ViolationDiagnostic};
pub use utils::allowance::{AllowCheck, Allowances};
