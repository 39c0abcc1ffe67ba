//! The diagnostic model
//!
//! A [`Diagnostic`] records one recovered problem: what kind it was,
//! where it happened, the offending token if one exists, and an optional
//! hint for fixing it.

use std::fmt;

use super::codes::ErrorCode;
use crate::base::SourcePosition;
use crate::lexer::Token;

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// No lexical rule matched; one character was skipped.
    Lexical,
    /// No grammar alternative matched; the parser resynchronized.
    Syntax,
    /// Advisory only: several alternatives accepted the same lookahead.
    Ambiguity,
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A hard error in the input
    #[default]
    Error,
    /// Advisory; never affects the produced tree
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// One recovered problem, accumulated into the parse result and fanned
/// out to registered listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: ErrorCode,
    pub severity: Severity,
    pub position: SourcePosition,
    pub message: String,
    /// The token the problem was detected at, when one exists. Lexical
    /// errors have none: no rule matched, so no token was formed.
    pub offending: Option<Token>,
    /// Optional suggestion for fixing the problem.
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn lexical(code: ErrorCode, position: SourcePosition, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Lexical,
            code,
            severity: Severity::Error,
            position,
            message: message.into(),
            offending: None,
            hint: None,
        }
    }

    pub fn syntax(code: ErrorCode, position: SourcePosition, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Syntax,
            code,
            severity: Severity::Error,
            position,
            message: message.into(),
            offending: None,
            hint: None,
        }
    }

    /// Ambiguity reports are warnings: they never alter the parse.
    pub fn ambiguity(
        code: ErrorCode,
        position: SourcePosition,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::Ambiguity,
            code,
            severity: Severity::Warning,
            position,
            message: message.into(),
            offending: None,
            hint: None,
        }
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.offending = Some(token);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] at {}: {}",
            self.severity.as_str(),
            self.code,
            self.position,
            self.message
        )
    }
}
