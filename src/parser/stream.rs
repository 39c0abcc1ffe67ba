//! Feed tokens to the parser with lookahead and speculative marks
//!
//! Tokens are buffered lazily into an append-only arena, hidden-channel
//! tokens included. The parser's view is the visible-channel index over
//! that arena with an integer cursor; `mark`/`seek`/`release` are cheap
//! integer save/restore, never snapshots, and already-buffered tokens are
//! never re-lexed or mutated.
//!
//! Marks obey a strict LIFO discipline: a mark must be rewound or
//! released before any earlier mark is. That is an internal engine
//! invariant, enforced with debug assertions.

use crate::base::SourcePosition;
use crate::errors::Diagnostic;
use crate::grammar::TokenKind;
use crate::lexer::{Lexer, Token};

/// Opaque handle capturing a stream read position.
#[derive(Debug)]
pub struct Mark {
    serial: u64,
    cursor: usize,
}

/// Buffering token source with visible-channel lookahead.
#[derive(Debug)]
pub struct TokenStream<'g, 's> {
    lexer: Lexer<'g, 's>,
    /// Every token lexed so far, in input order, all channels.
    arena: Vec<Token>,
    /// Indices into `arena` of default-channel tokens.
    visible: Vec<usize>,
    /// Cursor into `visible`: the next unconsumed token.
    cursor: usize,
    eof_buffered: bool,
    next_serial: u64,
    active_marks: Vec<u64>,
}

impl<'g, 's> TokenStream<'g, 's> {
    pub fn new(lexer: Lexer<'g, 's>) -> Self {
        Self {
            lexer,
            arena: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            eof_buffered: false,
            next_serial: 0,
            active_marks: Vec::new(),
        }
    }

    /// Ensure at least `n` visible tokens are buffered ahead of the
    /// cursor, pulling the lexer as needed. Stops early at end-of-input
    /// (the EOF token itself is visible and buffered last).
    pub fn fill(&mut self, n: usize) {
        while !self.eof_buffered && self.visible.len() < self.cursor + n {
            let token = self.lexer.next_token();
            if token.is_eof() {
                self.eof_buffered = true;
            }
            let hidden = token.is_hidden();
            let index = self.arena.len();
            self.arena.push(token);
            if !hidden {
                self.visible.push(index);
            }
        }
    }

    /// Kind of the `k`-th visible token ahead; `la(1)` is the next
    /// unconsumed token. Past end-of-input the answer is always EOF.
    pub fn la(&mut self, k: usize) -> TokenKind {
        self.lt(k).kind
    }

    /// The `k`-th visible token ahead (`k >= 1`), without consuming.
    pub fn lt(&mut self, k: usize) -> &Token {
        debug_assert!(k >= 1, "lookahead is 1-based");
        self.fill(k);
        match self.visible.get(self.cursor + k - 1) {
            Some(&index) => &self.arena[index],
            // Beyond the buffered input; the last visible token is EOF.
            None => &self.arena[*self.visible.last().expect("EOF is always buffered")],
        }
    }

    /// Consume and return the current visible token. At end-of-input the
    /// EOF token is returned and the cursor does not move.
    pub fn advance(&mut self) -> Token {
        self.fill(1);
        let token = self.lt(1).clone();
        if !token.is_eof() {
            self.cursor += 1;
        }
        token
    }

    /// The cursor position: how many visible tokens were consumed.
    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Start position of the current token.
    pub fn position(&mut self) -> SourcePosition {
        self.lt(1).position()
    }

    /// Capture the current read position for later `seek` or `release`.
    pub fn mark(&mut self) -> Mark {
        self.next_serial += 1;
        self.active_marks.push(self.next_serial);
        Mark {
            serial: self.next_serial,
            cursor: self.cursor,
        }
    }

    /// Rewind to the marked position. Buffered lookahead taken after the
    /// mark stays in the arena; only the cursor moves back.
    pub fn seek(&mut self, mark: Mark) {
        self.pop_mark(&mark);
        self.cursor = mark.cursor;
    }

    /// Discard the mark without rewinding.
    pub fn release(&mut self, mark: Mark) {
        self.pop_mark(&mark);
    }

    fn pop_mark(&mut self, mark: &Mark) {
        debug_assert_eq!(
            self.active_marks.last(),
            Some(&mark.serial),
            "marks must be released in LIFO order"
        );
        self.active_marks.pop();
    }

    /// Lex the rest of the input so every lexical diagnostic is surfaced
    /// even when the parser never looked that far ahead.
    pub fn exhaust(&mut self) {
        while !self.eof_buffered {
            let pending = self.visible.len() - self.cursor;
            self.fill(pending + 1);
        }
    }

    /// All tokens lexed so far, hidden channels included.
    pub fn tokens(&self) -> &[Token] {
        &self.arena
    }

    /// Hidden tokens sitting immediately before the current token,
    /// typically the comments and whitespace attached to it.
    pub fn hidden_before_current(&mut self) -> Vec<Token> {
        self.fill(1);
        let end = match self.visible.get(self.cursor) {
            Some(&index) => index,
            None => self.arena.len(),
        };
        let start = if self.cursor == 0 {
            0
        } else {
            self.visible[self.cursor - 1] + 1
        };
        self.arena[start..end]
            .iter()
            .filter(|token| token.is_hidden())
            .cloned()
            .collect()
    }

    /// Diagnostics the lexer produced while filling, in emission order.
    pub fn take_lexical_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.lexer.take_diagnostics()
    }
}
