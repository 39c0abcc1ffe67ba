//! # gramary
//!
//! Runtime grammar-driven lexing and adaptive predictive parsing.
//!
//! The grammar is data, not code: callers build a [`Grammar`] (lexical
//! rules plus parse rules with alternatives and quantifiers) at runtime,
//! then hand it to the engine together with source text. The engine always
//! returns a parse tree, even for malformed input, and accumulates every
//! problem it saw as a [`Diagnostic`] instead of failing.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! parser   → TokenStream, adaptive predictive engine, recovery
//!   ↓
//! tree     → parse tree (rule / terminal / error nodes), visitor
//!   ↓
//! errors   → diagnostics, error codes, listeners
//!   ↓
//! lexer    → CharacterStream, runtime-rule lexer, tokens
//!   ↓
//! grammar  → rule table model, builder, validation, FIRST/FOLLOW
//!   ↓
//! base     → primitives (SourcePosition, Span)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use gramary::grammar::{Grammar, term};
//!
//! let grammar = Grammar::builder()
//!     .hidden("WS", r"[ \t\r\n]+")
//!     .token("ID", r"[A-Za-z_][A-Za-z0-9_]*")
//!     .token("NUMBER", r"[0-9]+")
//!     .literal("EQUALS", "=")
//!     .literal("SEMI", ";")
//!     .rule("assign", vec![vec![
//!         term("ID"), term("EQUALS"), term("NUMBER"), term("SEMI"),
//!     ]])
//!     .build()
//!     .unwrap();
//!
//! let parse = gramary::parse(&grammar, "assign", "x = 1;").unwrap();
//! assert!(parse.ok());
//! ```

// ============================================================================
// MODULES (dependency order: base → grammar → lexer → errors → tree → parser)
// ============================================================================

/// Foundation types: SourcePosition, Span
pub mod base;

/// Grammar model: rule table, builder, validation, FIRST/FOLLOW analysis
pub mod grammar;

/// Lexer: CharacterStream, runtime lexical rules, tokens, channels
pub mod lexer;

/// Diagnostics: error codes, severity, listeners
pub mod errors;

/// Parse tree: closed node variants and the visitor protocol
pub mod tree;

/// Parser: token stream with marks, adaptive prediction, error recovery
pub mod parser;

// Re-export the types almost every caller needs
pub use base::{SourcePosition, Span};
pub use errors::{
    CollectingListener, Diagnostic, DiagnosticKind, ErrorCode, ErrorListener, Severity,
};
pub use grammar::{Grammar, GrammarBuilder, GrammarError};
pub use lexer::{Channel, Token, TokenKind};
pub use parser::{Parse, ParseOptions, Parser, parse};
pub use tree::{ErrorNode, ParseNode, RuleNode, TerminalNode, VisitFlow, Visitor, walk};
