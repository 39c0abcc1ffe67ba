//! Ambiguity detection tests: advisory, never outcome-changing

mod helpers;

use gramary::errors::{DiagnosticKind, ErrorCode, Severity};
use gramary::grammar::{Grammar, group, term};
use gramary::parser::{ParseOptions, Parser};

/// Two alternatives whose lookahead languages overlap on a bare `ID`:
/// both complete after one token, so no lookahead depth separates them.
fn overlapping_grammar() -> Grammar {
    Grammar::builder()
        .hidden("WS", r"[ \t\r\n]+")
        .token("ID", r"[A-Za-z_][A-Za-z0-9_]*")
        .token("NUMBER", r"[0-9]+")
        .literal("COLON", ":")
        .rule(
            "decl",
            vec![
                vec![term("ID"), group(vec![vec![term("COLON"), term("ID")]]).optional()],
                vec![
                    term("ID"),
                    group(vec![vec![term("COLON"), term("NUMBER")]]).optional(),
                ],
            ],
        )
        .build()
        .unwrap()
}

#[test]
fn test_detection_off_is_silent_and_picks_first() {
    let grammar = overlapping_grammar();
    let parse = Parser::new(&grammar).parse("decl", "x").unwrap();

    assert!(parse.ok());
    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.tree.as_rule().unwrap().alternative, 0);
}

#[test]
fn test_detection_on_reports_but_selects_identically() {
    let grammar = overlapping_grammar();
    let options = ParseOptions::new().with_ambiguity_detection(true);
    let parse = Parser::with_options(&grammar, options)
        .parse("decl", "x")
        .unwrap();

    // Same selection as with detection off.
    assert_eq!(parse.tree.as_rule().unwrap().alternative, 0);

    let warnings: Vec<_> = parse
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Ambiguity)
        .collect();
    assert!(!warnings.is_empty());
    assert_eq!(warnings[0].code, ErrorCode::E0301);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert!(warnings[0].message.contains("alternatives 1, 2"));

    // Advisory only: the parse still counts as clean.
    assert!(parse.ok());
}

#[test]
fn test_same_tree_with_and_without_detection() {
    let grammar = overlapping_grammar();
    let plain = Parser::new(&grammar).parse("decl", "x").unwrap();
    let checked = Parser::with_options(
        &grammar,
        ParseOptions::new().with_ambiguity_detection(true),
    )
    .parse("decl", "x")
    .unwrap();
    assert_eq!(plain.tree, checked.tree);
}

#[test]
fn test_resolvable_overlap_is_not_reported() {
    // These alternatives share a two-token prefix but always diverge at
    // the third token: deep, not ambiguous.
    let grammar = Grammar::builder()
        .hidden("WS", r"[ \t\r\n]+")
        .token("ID", r"[A-Za-z_][A-Za-z0-9_]*")
        .token("NUMBER", r"[0-9]+")
        .literal("COLON", ":")
        .rule(
            "decl",
            vec![
                vec![term("ID"), term("COLON"), term("ID")],
                vec![term("ID"), term("COLON"), term("NUMBER")],
            ],
        )
        .build()
        .unwrap();
    let options = ParseOptions::new().with_ambiguity_detection(true);

    // `x : y` resolves to the first alternative at depth three.
    let parse = Parser::with_options(&grammar, options)
        .parse("decl", "x : y")
        .unwrap();
    assert!(parse.ok());
    assert!(
        parse
            .diagnostics
            .iter()
            .all(|d| d.kind != DiagnosticKind::Ambiguity)
    );
    assert_eq!(parse.tree.as_rule().unwrap().alternative, 0);
}

#[test]
fn test_identical_alternatives_always_overlap() {
    let grammar = Grammar::builder()
        .token("NUMBER", r"[0-9]+")
        .rule("value", vec![vec![term("NUMBER")], vec![term("NUMBER")]])
        .build()
        .unwrap();

    let options = ParseOptions::new().with_ambiguity_detection(true);
    let parse = Parser::with_options(&grammar, options)
        .parse("value", "7")
        .unwrap();
    assert_eq!(parse.tree.as_rule().unwrap().alternative, 0);
    assert!(
        parse
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::E0301)
    );
}
