//! Advisory ambiguity reporting
//!
//! When enabled, the detector inspects every decision that still has
//! more than one viable alternative once the lookahead bound is
//! exhausted: those alternatives accept the identical lookahead, so the
//! grammar is ambiguous at that point under the configured bound. The
//! report never changes which alternative is chosen; selection is
//! always the first declared viable alternative.

use crate::errors::{Diagnostic, ErrorCode};
use crate::lexer::Token;

#[derive(Debug, Clone, Copy)]
pub(crate) struct AmbiguityDetector {
    enabled: bool,
}

impl AmbiguityDetector {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Build the advisory diagnostic for a decision that kept `viable`
    /// alternatives after `depth` tokens of lookahead. Returns `None`
    /// when detection is off or the decision was not ambiguous.
    pub(crate) fn report(
        &self,
        label: &str,
        viable: &[usize],
        depth: usize,
        at: &Token,
    ) -> Option<Diagnostic> {
        if !self.enabled || viable.len() < 2 {
            return None;
        }
        let list = viable
            .iter()
            .map(|index| (index + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let chosen = viable[0] + 1;
        Some(
            Diagnostic::ambiguity(
                ErrorCode::E0301,
                at.position(),
                format!(
                    "alternatives {list} of `{label}` match the same \
                     {depth}-token lookahead; alternative {chosen} is chosen"
                ),
            )
            .with_token(at.clone()),
        )
    }
}
