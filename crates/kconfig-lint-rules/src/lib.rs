//! # kconfig-lint-rules
//!
//! Built-in style rules and presets for kconfig-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Checks | Fix |
//! |------|------|--------|-----|
//! | KL001 | `trailing-whitespace` | Trailing spaces and tabs | Strip |
//! | KL002 | `line-length` | Lines longer than `max` characters | - |
//! | KL003 | `comment-spacing` | Missing space after `#` | Insert space |
//! | KL004 | `indentation` | Indentation of headers, properties and closers | Re-indent |
//! | KL005 | `help-indent` | Indentation of help text | Re-indent |
//! | KL006 | `blank-lines` | Empty lines inside and between entries | Insert/remove |
//! | KL007 | `property-order` | Order of properties within an entry | Reorder |
//! | KL008 | `config-naming` | Case, length and prefix of symbol names | - |
//!
//! ## Usage
//!
//! ```ignore
//! use kconfig_lint_core::Linter;
//! use kconfig_lint_rules::{builtin_registry, Preset};
//!
//! let linter = Linter::from_profile(builtin_registry(), &Preset::Zephyr.profile())?;
//! let violations = linter.check(&text);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blank_lines;
pub mod comment_spacing;
pub mod config_naming;
pub mod help_indent;
pub mod indentation;
pub mod line_length;
pub mod property_order;
pub mod trailing_whitespace;

mod presets;
mod registry;

pub use blank_lines::BlankLines;
pub use comment_spacing::CommentSpacing;
pub use config_naming::ConfigNaming;
pub use help_indent::HelpIndent;
pub use indentation::Indentation;
pub use line_length::LineLength;
pub use presets::Preset;
pub use property_order::PropertyOrder;
pub use registry::builtin_registry;
pub use trailing_whitespace::TrailingWhitespace;

/// Re-export core types for convenience.
pub use kconfig_lint_core::{Linter, Rule, Severity, StyleProfile, Violation};
