//! Fatal grammar-definition errors
//!
//! These are contract violations in the rule table, not problems with
//! parsed input: they abort immediately instead of becoming diagnostics.

use smol_str::SmolStr;
use thiserror::Error;

/// A defect in the grammar definition itself.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("terminal `{0}` is declared more than once")]
    DuplicateTerminal(SmolStr),

    #[error("rule `{0}` is declared more than once")]
    DuplicateRule(SmolStr),

    #[error("rule `{rule}` references unknown rule `{target}`")]
    UnknownRule { rule: SmolStr, target: SmolStr },

    #[error("rule `{rule}` references unknown terminal `{target}`")]
    UnknownTerminal { rule: SmolStr, target: SmolStr },

    #[error("rule `{rule}` references hidden terminal `{target}`, which the parser never sees")]
    HiddenTerminal { rule: SmolStr, target: SmolStr },

    #[error("rule `{0}` has no alternatives")]
    EmptyRule(SmolStr),

    #[error("group in rule `{0}` has no alternatives")]
    EmptyGroup(SmolStr),

    #[error("invalid pattern for terminal `{name}`: {source}")]
    InvalidPattern {
        name: SmolStr,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("terminal `{0}` has an empty literal")]
    EmptyLiteral(SmolStr),

    #[error("unknown entry rule `{0}`")]
    UnknownEntryRule(SmolStr),
}
