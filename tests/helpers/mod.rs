//! Shared fixtures for integration tests.
#![allow(dead_code)]

use gramary::grammar::{Grammar, group, rule_ref, term};
use gramary::tree::{ParseNode, TerminalNode, Visitor, walk};

/// The four-token assignment grammar used throughout the suite:
/// `assign := ID EQUALS NUMBER SEMI`.
pub fn assign_grammar() -> Grammar {
    Grammar::builder()
        .hidden("WS", r"[ \t\r\n]+")
        .token("ID", r"[A-Za-z_][A-Za-z0-9_]*")
        .token("NUMBER", r"[0-9]+")
        .literal("EQUALS", "=")
        .literal("SEMI", ";")
        .rule(
            "assign",
            vec![vec![
                term("ID"),
                term("EQUALS"),
                term("NUMBER"),
                term("SEMI"),
            ]],
        )
        .build()
        .expect("assign grammar builds")
}

/// A statement grammar with a real decision point:
/// `stmt := ID EQUALS NUMBER SEMI | ID SEMI`.
pub fn stmt_grammar() -> Grammar {
    Grammar::builder()
        .hidden("WS", r"[ \t\r\n]+")
        .token("ID", r"[A-Za-z_][A-Za-z0-9_]*")
        .token("NUMBER", r"[0-9]+")
        .literal("EQUALS", "=")
        .literal("SEMI", ";")
        .rule("block", vec![vec![rule_ref("stmt").one_or_more(), term("EOF")]])
        .rule(
            "stmt",
            vec![
                vec![term("ID"), term("EQUALS"), term("NUMBER"), term("SEMI")],
                vec![term("ID"), term("SEMI")],
            ],
        )
        .build()
        .expect("stmt grammar builds")
}

/// A small binding-definition language: functions over expressions with
/// `#` line comments, the kind of input this engine exists to parse.
///
/// ```text
/// # doubles the input
/// func double(x: i32) -> i32
///     y = x * 2;
///     y;
/// end
/// ```
pub fn binding_grammar() -> Grammar {
    Grammar::builder()
        .hidden("WS", r"[ \t\r\n]+")
        .hidden("COMMENT", r"#[^\n]*")
        // Keywords are declared before IDENT so they win equal-length ties.
        .literal("FUNC", "func")
        .literal("END", "end")
        .literal("IF", "if")
        .literal("THEN", "then")
        .literal("ELSE", "else")
        .token("IDENT", r"[A-Za-z_][A-Za-z0-9_]*")
        .token("NUMBER", r"[0-9]+")
        .literal("RARROW", "->")
        .literal("LPAREN", "(")
        .literal("RPAREN", ")")
        .literal("COMMA", ",")
        .literal("COLON", ":")
        .literal("SEMI", ";")
        .literal("EQUALS", "=")
        .literal("STAR", "*")
        .literal("SLASH", "/")
        .literal("PLUS", "+")
        .literal("MINUS", "-")
        .rule(
            "program",
            vec![vec![rule_ref("func_def").zero_or_more(), term("EOF")]],
        )
        .rule(
            "func_def",
            vec![vec![
                term("FUNC"),
                term("IDENT"),
                term("LPAREN"),
                rule_ref("params").optional(),
                term("RPAREN"),
                group(vec![vec![term("RARROW"), term("IDENT")]]).optional(),
                rule_ref("stmt").zero_or_more(),
                term("END"),
            ]],
        )
        .rule(
            "params",
            vec![vec![
                rule_ref("param"),
                group(vec![vec![term("COMMA"), rule_ref("param")]]).zero_or_more(),
            ]],
        )
        .rule(
            "param",
            vec![vec![term("IDENT"), term("COLON"), term("IDENT")]],
        )
        .rule(
            "stmt",
            vec![
                vec![term("IDENT"), term("EQUALS"), rule_ref("expr"), term("SEMI")],
                vec![rule_ref("expr"), term("SEMI")],
            ],
        )
        .rule(
            "expr",
            vec![vec![
                rule_ref("mul_expr"),
                group(vec![
                    vec![term("PLUS"), rule_ref("mul_expr")],
                    vec![term("MINUS"), rule_ref("mul_expr")],
                ])
                .zero_or_more(),
            ]],
        )
        .rule(
            "mul_expr",
            vec![vec![
                rule_ref("factor"),
                group(vec![
                    vec![term("STAR"), rule_ref("factor")],
                    vec![term("SLASH"), rule_ref("factor")],
                ])
                .zero_or_more(),
            ]],
        )
        .rule(
            "factor",
            vec![
                vec![term("NUMBER")],
                vec![term("IDENT"), rule_ref("call_args").optional()],
                vec![term("LPAREN"), rule_ref("expr"), term("RPAREN")],
                vec![rule_ref("if_expr")],
            ],
        )
        .rule(
            "call_args",
            vec![vec![
                term("LPAREN"),
                group(vec![vec![
                    rule_ref("expr"),
                    group(vec![vec![term("COMMA"), rule_ref("expr")]]).zero_or_more(),
                ]])
                .optional(),
                term("RPAREN"),
            ]],
        )
        .rule(
            "if_expr",
            vec![vec![
                term("IF"),
                rule_ref("expr"),
                term("THEN"),
                rule_ref("expr"),
                term("ELSE"),
                rule_ref("expr"),
                term("END"),
            ]],
        )
        .build()
        .expect("binding grammar builds")
}

struct TextCollector(Vec<String>);

impl Visitor for TextCollector {
    fn visit_terminal(&mut self, node: &TerminalNode) {
        if !node.token.is_eof() {
            self.0.push(node.token.text.to_string());
        }
    }
}

/// Texts of all non-EOF terminal nodes, in tree order.
pub fn terminal_texts(tree: &ParseNode) -> Vec<String> {
    let mut collector = TextCollector(Vec::new());
    walk(tree, &mut collector);
    collector.0
}
