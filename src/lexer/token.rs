//! Lexed tokens

use smol_str::SmolStr;
use std::fmt;

use crate::base::{SourcePosition, Span};
use crate::grammar::{Channel, TokenKind};

/// A minimal lexical unit: kind, raw text, channel, and source range.
///
/// Tokens are immutable once created. The text is a [`SmolStr`], so the
/// token stream and the parse tree can reference the same token cheaply
/// without copying the underlying characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub channel: Channel,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: SmolStr, channel: Channel, span: Span) -> Self {
        Self {
            kind,
            text,
            channel,
            span,
        }
    }

    /// The synthetic end-of-input token, anchored at `at`.
    pub fn eof(at: SourcePosition) -> Self {
        Self {
            kind: TokenKind::EOF,
            text: SmolStr::default(),
            channel: Channel::Default,
            span: Span::empty(at),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind.is_eof()
    }

    pub fn is_hidden(&self) -> bool {
        self.channel == Channel::Hidden
    }

    /// Start position, the anchor used for diagnostics.
    pub fn position(&self) -> SourcePosition {
        self.span.start
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            write!(f, "<EOF>")
        } else {
            write!(f, "`{}`", self.text)
        }
    }
}
