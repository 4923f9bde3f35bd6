//! Whitespace configuration shared by every fixer

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    /// Use spaces for indentation (two or four)
    Spaces(usize),
    /// Use tabs for indentation
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// Parse an indentation unit: a tab, or two or four spaces
    pub fn parse(indent: &str) -> Result<Self, ConfigurationError> {
        match indent {
            "\t" => Ok(IndentStyle::Tabs),
            "  " => Ok(IndentStyle::Spaces(2)),
            "    " => Ok(IndentStyle::Spaces(4)),
            _ => Err(ConfigurationError::InvalidWhitespace(
                "Invalid \"indent\" param, expected tab or two or four spaces.".to_string(),
            )),
        }
    }

    /// The indentation string for one level
    pub fn as_string(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }

    /// Get the number of spaces equivalent
    pub fn width(&self) -> usize {
        match self {
            IndentStyle::Spaces(n) => *n,
            IndentStyle::Tabs => 4,
        }
    }
}

/// Line ending style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,
    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Parse a literal line ending, `"\n"` or `"\r\n"`
    pub fn parse(line_ending: &str) -> Result<Self, ConfigurationError> {
        match line_ending {
            "\n" => Ok(LineEnding::Lf),
            "\r\n" => Ok(LineEnding::CrLf),
            _ => Err(ConfigurationError::InvalidWhitespace(
                "Invalid \"lineEnding\" param, expected \"\\n\" or \"\\r\\n\".".to_string(),
            )),
        }
    }

    /// Get the line ending string
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Combined whitespace configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitespaceConfig {
    pub indent: IndentStyle,
    pub line_ending: LineEnding,
}

impl WhitespaceConfig {
    pub fn new(indent: IndentStyle, line_ending: LineEnding) -> Self {
        Self { indent, line_ending }
    }

    /// Build from the literal indent and line ending strings
    pub fn parse(indent: &str, line_ending: &str) -> Result<Self, ConfigurationError> {
        Ok(Self::new(IndentStyle::parse(indent)?, LineEnding::parse(line_ending)?))
    }

    /// Create config for PSR-12 standard (4 spaces, LF)
    pub fn psr12() -> Self {
        Self {
            indent: IndentStyle::Spaces(4),
            line_ending: LineEnding::Lf,
        }
    }
}
