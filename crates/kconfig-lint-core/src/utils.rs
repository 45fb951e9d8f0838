//! Utility functions for rule implementations.

pub mod allowance;
pub mod indent;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{AllowCheck, Allowances};
#[doc(inline)]
pub use indent::{describe_indent, IndentSpec, IndentStyle};
