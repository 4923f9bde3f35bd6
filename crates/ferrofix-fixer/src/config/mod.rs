//! Configuration consumed by fixers and the factory
//!
//! Whitespace settings shared by every fixer, and the built-in rule sets.

mod presets;
mod whitespace;

pub use presets::{builtin_sets, Preset};
pub use whitespace::{IndentStyle, LineEnding, WhitespaceConfig};
