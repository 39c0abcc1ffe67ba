//! Error code definitions for diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (unrecognized input)
//! - E02xx: Syntax errors (prediction and recovery)
//! - E03xx: Ambiguity warnings

use std::fmt;

/// Error codes for diagnostics
///
/// Each code represents a specific category of problem, enabling
/// filtering, documentation, and downstream tooling integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// No lexical rule matches at this position
    E0101,

    // =========================================================================
    // E02xx: Syntax errors
    // =========================================================================
    /// No grammar alternative matches the upcoming input
    E0201,
    /// A required token is missing
    E0202,
    /// An extraneous token was found and skipped
    E0203,
    /// A quantified element looped without consuming input
    E0204,
    /// Input remains after the entry rule completed
    E0205,
    /// A rule re-entered itself without consuming input
    E0206,
    /// Input does not match the required terminal; resynchronized
    E0207,

    // =========================================================================
    // E03xx: Ambiguity warnings
    // =========================================================================
    /// More than one alternative accepts the same lookahead
    E0301,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            Self::E0206 => "E0206",
            Self::E0207 => "E0207",
            Self::E0301 => "E0301",
        }
    }

    /// One-line description used in documentation and tooling.
    pub fn description(&self) -> &'static str {
        match self {
            Self::E0101 => "no lexical rule matches at this position",
            Self::E0201 => "no grammar alternative matches the upcoming input",
            Self::E0202 => "a required token is missing",
            Self::E0203 => "an extraneous token was found and skipped",
            Self::E0204 => "a quantified element looped without consuming input",
            Self::E0205 => "input remains after the entry rule completed",
            Self::E0206 => "a rule re-entered itself without consuming input",
            Self::E0207 => "input does not match the required terminal",
            Self::E0301 => "more than one alternative accepts the same lookahead",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
