//! Risky fixers that may change code behavior
//!
//! A rule set only enables these when risky rules are explicitly allowed.

mod declare_strict_types;
mod no_alias_functions;

pub use declare_strict_types::DeclareStrictTypesFixer;
pub use no_alias_functions::NoAliasFunctionsFixer;
