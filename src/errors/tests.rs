//! Unit tests for the errors module

use super::*;
use crate::base::SourcePosition;

#[test]
fn test_diagnostic_constructors_set_kind_and_severity() {
    let at = SourcePosition::start();

    let lex = Diagnostic::lexical(ErrorCode::E0101, at, "bad character");
    assert_eq!(lex.kind, DiagnosticKind::Lexical);
    assert!(lex.is_error());
    assert!(lex.offending.is_none());

    let syn = Diagnostic::syntax(ErrorCode::E0202, at, "missing NUMBER");
    assert_eq!(syn.kind, DiagnosticKind::Syntax);
    assert!(syn.is_error());

    let amb = Diagnostic::ambiguity(ErrorCode::E0301, at, "two alternatives match");
    assert_eq!(amb.kind, DiagnosticKind::Ambiguity);
    assert_eq!(amb.severity, Severity::Warning);
    assert!(!amb.is_error());
}

#[test]
fn test_display_includes_code_and_position() {
    let at = SourcePosition::new(4, 2, 1);
    let diagnostic = Diagnostic::syntax(ErrorCode::E0201, at, "no viable alternative");
    let rendered = diagnostic.to_string();
    assert!(rendered.contains("E0201"));
    assert!(rendered.contains("2:1"));
    assert!(rendered.starts_with("error"));
}

#[test]
fn test_hint_is_carried() {
    let diagnostic = Diagnostic::syntax(
        ErrorCode::E0202,
        SourcePosition::start(),
        "missing NUMBER",
    )
    .with_hint("expected NUMBER after EQUALS");
    assert_eq!(
        diagnostic.hint.as_deref(),
        Some("expected NUMBER after EQUALS")
    );
}

#[test]
fn test_collecting_listener_shares_buffer_across_clones() {
    let collector = CollectingListener::new();
    let mut registered = collector.clone();
    assert!(collector.is_empty());

    let diagnostic = Diagnostic::lexical(ErrorCode::E0101, SourcePosition::start(), "oops");
    registered.lexical_error(&diagnostic);
    registered.syntax_error(&diagnostic);

    assert_eq!(collector.len(), 2);
    assert_eq!(collector.diagnostics()[0].message, "oops");
}

#[test]
fn test_error_code_strings() {
    let codes = [
        ErrorCode::E0101,
        ErrorCode::E0201,
        ErrorCode::E0202,
        ErrorCode::E0203,
        ErrorCode::E0204,
        ErrorCode::E0205,
        ErrorCode::E0206,
        ErrorCode::E0207,
        ErrorCode::E0301,
    ];
    for code in codes {
        assert_eq!(code.to_string(), code.as_str());
        assert!(!code.description().is_empty());
    }
}
