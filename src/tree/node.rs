//! Tree node variants

use smol_str::SmolStr;
use std::fmt::Write as _;

use crate::base::{SourcePosition, Span};
use crate::grammar::{RuleId, TokenKind};
use crate::lexer::Token;

/// One node of a parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNode {
    /// A grammar rule that matched (or was recovered).
    Rule(RuleNode),
    /// One consumed token.
    Terminal(TerminalNode),
    /// A recovery artifact: a gap or a run of skipped tokens.
    Error(ErrorNode),
}

/// A matched grammar rule with its children in consumption order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    pub rule: RuleId,
    pub name: SmolStr,
    /// Index of the matched alternative, in declaration order.
    pub alternative: usize,
    /// Set when panic-mode recovery fired inside this rule.
    pub erroneous: bool,
    pub children: Vec<ParseNode>,
}

/// A leaf wrapping exactly one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalNode {
    pub token: Token,
}

/// Where recovery touched the tree.
///
/// `Missing` marks a gap where a required token was expected but absent;
/// no token text is fabricated for it. `Skipped` wraps tokens the parser
/// discarded while resynchronizing, so the input is still accounted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNode {
    Missing {
        expected: TokenKind,
        expected_name: SmolStr,
        position: SourcePosition,
    },
    Skipped {
        tokens: Vec<Token>,
    },
}

impl ErrorNode {
    pub fn position(&self) -> SourcePosition {
        match self {
            Self::Missing { position, .. } => *position,
            Self::Skipped { tokens } => tokens
                .first()
                .map(Token::position)
                .unwrap_or(SourcePosition::start()),
        }
    }
}

impl ParseNode {
    pub fn as_rule(&self) -> Option<&RuleNode> {
        match self {
            Self::Rule(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalNode> {
        match self {
            Self::Terminal(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Source range covered by this subtree, if it consumed anything.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Terminal(node) => Some(node.token.span),
            Self::Error(ErrorNode::Missing { position, .. }) => Some(Span::empty(*position)),
            Self::Error(ErrorNode::Skipped { tokens }) => {
                let first = tokens.first()?;
                let last = tokens.last()?;
                Some(first.span.cover(last.span))
            }
            Self::Rule(node) => {
                let mut spans = node.children.iter().filter_map(ParseNode::span);
                let first = spans.next()?;
                Some(spans.fold(first, |acc, span| acc.cover(span)))
            }
        }
    }

    /// Whether this subtree contains any recovery artifact.
    pub fn has_errors(&self) -> bool {
        match self {
            Self::Terminal(_) => false,
            Self::Error(_) => true,
            Self::Rule(node) => node.erroneous || node.children.iter().any(ParseNode::has_errors),
        }
    }

    /// Concatenated text of all terminal nodes, in tree order.
    ///
    /// For an input with no diagnostics this reproduces the visible
    /// token text of the input exactly.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Terminal(node) => out.push_str(&node.token.text),
            Self::Error(_) => {}
            Self::Rule(node) => {
                for child in &node.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Indented multi-line rendering, for debugging and test assertions.
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        self.render(0, &mut out);
        out
    }

    fn render(&self, depth: usize, out: &mut String) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self {
            Self::Rule(node) => {
                let _ = write!(out, "{} [alt {}]", node.name, node.alternative);
                if node.erroneous {
                    out.push_str(" (error)");
                }
                out.push('\n');
                for child in &node.children {
                    child.render(depth + 1, out);
                }
            }
            Self::Terminal(node) => {
                let _ = writeln!(out, "{}", node.token);
            }
            Self::Error(ErrorNode::Missing { expected_name, .. }) => {
                let _ = writeln!(out, "missing {expected_name}");
            }
            Self::Error(ErrorNode::Skipped { tokens }) => {
                let _ = writeln!(out, "skipped {} token(s)", tokens.len());
            }
        }
    }
}

impl RuleNode {
    /// First direct child that is a rule node with the given name.
    pub fn child_rule(&self, name: &str) -> Option<&RuleNode> {
        self.children
            .iter()
            .filter_map(ParseNode::as_rule)
            .find(|node| node.name == name)
    }

    /// Direct terminal children, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children
            .iter()
            .filter_map(ParseNode::as_terminal)
            .map(|node| &node.token)
    }
}
