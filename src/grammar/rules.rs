//! Rule table data model
//!
//! Everything in here is plain, read-only data once built. The parser
//! never mutates a grammar; it only walks it.

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::fmt;

use super::analysis::GrammarAnalysis;
use super::builder::GrammarBuilder;

/// Identifier of a terminal (token type) in a grammar's closed set.
///
/// Kind 0 is always the synthetic end-of-input terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(pub u16);

impl TokenKind {
    /// The synthetic end-of-input terminal, present in every grammar.
    pub const EOF: TokenKind = TokenKind(0);

    pub fn is_eof(&self) -> bool {
        *self == Self::EOF
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a parse rule, assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl RuleId {
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Token channel: the parser's default view sees only `Default` tokens;
/// `Hidden` tokens (whitespace, comments) stay in the stream for
/// inspection but never reach a parse decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    #[default]
    Default,
    Hidden,
}

/// Repetition quantifier on a grammar element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantifier {
    /// Exactly once (no suffix)
    #[default]
    One,
    /// `?`: zero or one
    Optional,
    /// `*`: zero or more
    ZeroOrMore,
    /// `+`: one or more
    OneOrMore,
}

impl Quantifier {
    /// Whether the element may match nothing at all.
    pub fn min_is_zero(&self) -> bool {
        matches!(self, Self::Optional | Self::ZeroOrMore)
    }

    /// Whether the element may match more than once.
    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => Ok(()),
            Self::Optional => write!(f, "?"),
            Self::ZeroOrMore => write!(f, "*"),
            Self::OneOrMore => write!(f, "+"),
        }
    }
}

/// One item inside an alternative: a terminal reference, a rule
/// reference, or a nested group of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Terminal(TokenKind),
    Rule(RuleId),
    Group(Vec<Alternative>),
}

/// An item plus its quantifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub item: Item,
    pub quantifier: Quantifier,
}

/// An ordered sequence of elements. An empty sequence matches nothing
/// (epsilon).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alternative {
    pub elements: Vec<Element>,
}

/// A parse rule: one or more alternatives, tried in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRule {
    pub alternatives: Vec<Alternative>,
}

/// How a lexical rule matches text.
#[derive(Debug, Clone)]
pub enum LexPattern {
    /// Matches this exact text.
    Literal(SmolStr),
    /// Matches an anchored regular expression.
    Pattern(Regex),
}

/// A lexical rule: produces tokens of `kind` on `channel`.
#[derive(Debug, Clone)]
pub struct LexRule {
    pub kind: TokenKind,
    pub pattern: LexPattern,
    pub channel: Channel,
}

/// A validated, immutable grammar: lexical rules plus parse rules.
///
/// Built once via [`Grammar::builder`]; shareable read-only across
/// threads for independent parallel parses.
#[derive(Debug)]
pub struct Grammar {
    pub(super) lex_rules: Vec<LexRule>,
    /// Terminal names indexed by `TokenKind`; slot 0 is `EOF`.
    pub(super) terminal_names: Vec<SmolStr>,
    pub(super) terminals: FxHashMap<SmolStr, TokenKind>,
    /// Parse rules in declaration order; `RuleId` indexes this map.
    pub(super) rules: IndexMap<SmolStr, GrammarRule>,
    pub(super) analysis: GrammarAnalysis,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.terminal_names.len()
    }

    /// Look up a parse rule by id.
    ///
    /// Ids are only ever produced by validation, so indexing cannot fail
    /// for a `RuleId` belonging to this grammar.
    pub fn rule(&self, id: RuleId) -> &GrammarRule {
        &self.rules[id.index()]
    }

    pub fn rule_name(&self, id: RuleId) -> &SmolStr {
        let (name, _) = self
            .rules
            .get_index(id.index())
            .unwrap_or_else(|| panic!("rule id {} out of range", id.0));
        name
    }

    pub fn rule_named(&self, name: &str) -> Option<RuleId> {
        self.rules.get_index_of(name).map(|i| RuleId(i as u32))
    }

    pub fn terminal_named(&self, name: &str) -> Option<TokenKind> {
        self.terminals.get(name).copied()
    }

    pub fn terminal_name(&self, kind: TokenKind) -> &str {
        self.terminal_names
            .get(kind.index())
            .map(SmolStr::as_str)
            .unwrap_or("<unknown>")
    }

    pub(crate) fn lex_rules(&self) -> &[LexRule] {
        &self.lex_rules
    }

    /// Whether the rule can match the empty token sequence.
    pub fn is_nullable(&self, id: RuleId) -> bool {
        self.analysis.nullable[id.index()]
    }

    /// Terminals that can start the rule.
    pub fn first_set(&self, id: RuleId) -> &FxHashSet<TokenKind> {
        &self.analysis.first[id.index()]
    }

    /// Terminals that can follow the rule in any context.
    pub fn follow_set(&self, id: RuleId) -> &FxHashSet<TokenKind> {
        &self.analysis.follow[id.index()]
    }

    /// Panic-mode synchronization set: the follow set plus end-of-input.
    pub(crate) fn sync_set(&self, id: RuleId) -> &FxHashSet<TokenKind> {
        &self.analysis.sync[id.index()]
    }

    /// Lookahead depth used when [`crate::parser::ParseOptions`] does not
    /// override it: the longest minimum token length over all
    /// alternatives, clamped to `2..=16`.
    pub fn default_lookahead_bound(&self) -> usize {
        self.analysis.default_bound
    }
}
