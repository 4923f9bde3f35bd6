//! Casing fixers for PHP code
//!
//! These fixers handle keyword casing, constant casing and cast casing.

mod constant_case;
mod lowercase_cast;
mod lowercase_keywords;

pub use constant_case::ConstantCaseFixer;
pub use lowercase_cast::LowercaseCastFixer;
pub use lowercase_keywords::LowercaseKeywordsFixer;
