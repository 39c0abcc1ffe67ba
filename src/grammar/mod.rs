//! Grammar rule tables
//!
//! The engine is driven entirely by a [`Grammar`] value built at runtime:
//! - lexical rules (literal or regex patterns, each with a channel),
//! - parse rules (ordered alternatives of terminal refs, rule refs, and
//!   nested groups, each element optionally quantified with `?`/`*`/`+`).
//!
//! A `Grammar` is validated once by [`GrammarBuilder::build`] and is
//! immutable (and `Send + Sync`) afterwards, so one table can drive any
//! number of parallel parses. A malformed table (dangling references,
//! duplicate names, bad patterns) is a defect in the grammar definition,
//! not in the input, and is reported as a fatal [`GrammarError`].

mod analysis;
mod builder;
mod error;
mod rules;

pub use builder::{ElementSpec, GrammarBuilder, group, rule_ref, term};
pub use error::GrammarError;
pub use rules::{
    Alternative, Channel, Element, Grammar, GrammarRule, Item, LexPattern, LexRule, Quantifier,
    RuleId, TokenKind,
};
