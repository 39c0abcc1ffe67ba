//! Runtime-rule lexer with longest-match selection

use smol_str::SmolStr;
use std::mem;

use super::chars::CharacterStream;
use super::token::Token;
use crate::base::Span;
use crate::errors::{Diagnostic, ErrorCode};
use crate::grammar::{Grammar, LexPattern};

/// Interprets a grammar's lexical rules over one input.
///
/// `next_token` never fails: unrecognized text becomes a diagnostic and
/// is skipped one character at a time, and once the input is exhausted
/// every further call returns the end-of-input token.
#[derive(Debug)]
pub struct Lexer<'g, 's> {
    grammar: &'g Grammar,
    chars: CharacterStream<'s>,
    diagnostics: Vec<Diagnostic>,
}

impl<'g, 's> Lexer<'g, 's> {
    pub fn new(grammar: &'g Grammar, source: &'s str) -> Self {
        Self {
            grammar,
            chars: CharacterStream::new(source),
            diagnostics: Vec::new(),
        }
    }

    /// Produce the next token, on whichever channel its rule declares.
    pub fn next_token(&mut self) -> Token {
        loop {
            let start = self.chars.position();
            if self.chars.is_at_end() {
                return Token::eof(start);
            }

            let rest = self.chars.rest();
            let mut best: Option<(usize, usize)> = None;
            for (index, rule) in self.grammar.lex_rules().iter().enumerate() {
                let matched = match &rule.pattern {
                    LexPattern::Literal(text) => {
                        rest.starts_with(text.as_str()).then_some(text.len())
                    }
                    // Patterns are compiled with a \A anchor; a zero-length
                    // match counts as no match, or the lexer would stall.
                    LexPattern::Pattern(regex) => {
                        regex.find(rest).map(|m| m.end()).filter(|&len| len > 0)
                    }
                };
                if let Some(len) = matched {
                    // Longest match wins; on equal length the earlier
                    // declaration keeps the spot.
                    if best.is_none_or(|(_, best_len)| len > best_len) {
                        best = Some((index, len));
                    }
                }
            }

            match best {
                Some((index, len)) => {
                    let rule = &self.grammar.lex_rules()[index];
                    let text = SmolStr::new(&rest[..len]);
                    self.advance_bytes(len);
                    let span = Span::new(start, self.chars.position());
                    return Token::new(rule.kind, text, rule.channel, span);
                }
                None => {
                    // Recover locally: report, skip one character, retry.
                    if let Some(ch) = self.chars.advance() {
                        self.diagnostics.push(Diagnostic::lexical(
                            ErrorCode::E0101,
                            start,
                            format!("unrecognized character `{}`", ch.escape_default()),
                        ));
                    }
                }
            }
        }
    }

    /// Diagnostics accumulated since the last call, in emission order.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        mem::take(&mut self.diagnostics)
    }

    fn advance_bytes(&mut self, len: usize) {
        let target = self.chars.position().offset + len;
        while self.chars.position().offset < target {
            if self.chars.advance().is_none() {
                break;
            }
        }
    }
}
