//! The adaptive predictive parsing engine
//!
//! One `parse` call drives the whole pipeline: the token stream pulls
//! the lexer lazily, the engine predicts an alternative at every
//! decision point via bounded speculative lookahead (mark/seek, never
//! permanent consumption), and recovery keeps the parse alive on any
//! input. The result is always a tree plus the ordered diagnostics.
//!
//! Recovery is an explicit mode, not unwinding:
//! - a mismatched terminal tries single-token deletion, then records a
//!   missing-token gap and carries on;
//! - a failed decision reports the offending token and skips forward to
//!   the rule's statically computed synchronization set;
//! - a quantifier iteration that consumes nothing forces the loop shut.
//!
//! Only a defect in the rule table itself (e.g. an unknown entry rule)
//! aborts, as a [`GrammarError`].

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::ParseOptions;
use super::ambiguity::AmbiguityDetector;
use super::stream::TokenStream;
use crate::errors::{Diagnostic, DiagnosticKind, ErrorCode, ErrorListener};
use crate::grammar::{
    Alternative, Element, Grammar, GrammarError, Item, Quantifier, RuleId, TokenKind,
};
use crate::lexer::Lexer;
use crate::tree::{ErrorNode, ParseNode, RuleNode, TerminalNode};

/// Result of one parse call: the tree (always present, possibly
/// containing error-marked subtrees) and every diagnostic in emission
/// order. Whether any of this counts as failure is the caller's call.
#[derive(Debug, Clone)]
pub struct Parse {
    pub tree: ParseNode,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// True when no error-severity diagnostic was produced. Ambiguity
    /// warnings do not count against this.
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Rule-driven predictive parser over a shared, read-only [`Grammar`].
///
/// A parser is cheap to construct and reusable; each `parse` call owns
/// its private stream state, so independent inputs can be parsed on
/// separate threads, each with its own `Parser`.
pub struct Parser<'g> {
    grammar: &'g Grammar,
    options: ParseOptions,
    listeners: Vec<Box<dyn ErrorListener>>,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_options(grammar, ParseOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar, options: ParseOptions) -> Self {
        Self {
            grammar,
            options,
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners observe diagnostics in
    /// registration order and cannot affect the parse.
    pub fn add_listener(&mut self, listener: Box<dyn ErrorListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Parse `source` starting from the named entry rule.
    ///
    /// Always returns a tree for any finite input; the only `Err` is a
    /// malformed-table contract violation.
    pub fn parse(&mut self, entry_rule: &str, source: &str) -> Result<Parse, GrammarError> {
        let entry = self
            .grammar
            .rule_named(entry_rule)
            .ok_or_else(|| GrammarError::UnknownEntryRule(SmolStr::new(entry_rule)))?;
        let bound = self
            .options
            .lookahead_bound
            .unwrap_or_else(|| self.grammar.default_lookahead_bound())
            .max(1);
        debug!(entry = entry_rule, bound, "starting parse");

        let mut run = Run {
            grammar: self.grammar,
            stream: TokenStream::new(Lexer::new(self.grammar, source)),
            bound,
            detector: AmbiguityDetector::new(self.options.ambiguity_detection),
            listeners: &mut self.listeners,
            diagnostics: Vec::new(),
            active: FxHashSet::default(),
        };
        let tree = run.parse_rule(entry);
        run.finish_input();
        Ok(Parse {
            tree,
            diagnostics: run.diagnostics,
        })
    }
}

/// Parse `source` with default options, starting from `entry_rule`.
pub fn parse(grammar: &Grammar, entry_rule: &str, source: &str) -> Result<Parse, GrammarError> {
    Parser::new(grammar).parse(entry_rule, source)
}

/// Per-call state: one stream, one diagnostics list, one recovery
/// bookkeeping set.
struct Run<'g, 's, 'l> {
    grammar: &'g Grammar,
    stream: TokenStream<'g, 's>,
    bound: usize,
    detector: AmbiguityDetector,
    listeners: &'l mut Vec<Box<dyn ErrorListener>>,
    diagnostics: Vec<Diagnostic>,
    /// (rule, token index) pairs currently on the parse stack; a repeat
    /// means the rule re-entered itself without consuming anything.
    active: FxHashSet<(RuleId, usize)>,
}

impl Run<'_, '_, '_> {
    // =========================================================================
    // Diagnostics plumbing
    // =========================================================================

    /// Pull pending lexical diagnostics out of the lexer so the returned
    /// list stays in emission order.
    fn drain_lexical(&mut self) {
        for diagnostic in self.stream.take_lexical_diagnostics() {
            for listener in self.listeners.iter_mut() {
                listener.lexical_error(&diagnostic);
            }
            self.diagnostics.push(diagnostic);
        }
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.drain_lexical();
        for listener in self.listeners.iter_mut() {
            match diagnostic.kind {
                DiagnosticKind::Lexical => listener.lexical_error(&diagnostic),
                DiagnosticKind::Syntax => listener.syntax_error(&diagnostic),
                DiagnosticKind::Ambiguity => listener.ambiguity(&diagnostic),
            }
        }
        self.diagnostics.push(diagnostic);
    }

    /// After the entry rule: report trailing input, then lex whatever is
    /// left so late lexical errors are not silently dropped.
    fn finish_input(&mut self) {
        if !self.stream.la(1).is_eof() {
            let token = self.stream.lt(1).clone();
            self.emit(
                Diagnostic::syntax(
                    ErrorCode::E0205,
                    token.position(),
                    format!("unexpected input after entry rule: {token}"),
                )
                .with_token(token),
            );
        }
        self.stream.exhaust();
        self.drain_lexical();
    }

    // =========================================================================
    // Committed parsing
    // =========================================================================

    fn parse_rule(&mut self, id: RuleId) -> ParseNode {
        let name = self.grammar.rule_name(id).clone();
        let rule = self.grammar.rule(id);

        let key = (id, self.stream.index());
        if !self.active.insert(key) {
            let token = self.stream.lt(1).clone();
            self.emit(
                Diagnostic::syntax(
                    ErrorCode::E0206,
                    token.position(),
                    format!("rule `{name}` re-entered without consuming input"),
                )
                .with_token(token),
            );
            return ParseNode::Rule(RuleNode {
                rule: id,
                name,
                alternative: 0,
                erroneous: true,
                children: Vec::new(),
            });
        }

        let mut node = RuleNode {
            rule: id,
            name: name.clone(),
            alternative: 0,
            erroneous: false,
            children: Vec::new(),
        };

        // A single alternative is not a decision point.
        let choice = if rule.alternatives.len() == 1 {
            Some(0)
        } else {
            self.predict(&name, &rule.alternatives)
        };
        match choice {
            Some(alternative) => {
                trace!(rule = %name, alternative, at = self.stream.index(), "enter rule");
                node.alternative = alternative;
                if !self.parse_sequence(id, &rule.alternatives[alternative].elements, &mut node) {
                    trace!(rule = %name, "rule abandoned after resynchronization");
                }
            }
            None => {
                let token = self.stream.lt(1).clone();
                self.emit(
                    Diagnostic::syntax(
                        ErrorCode::E0201,
                        token.position(),
                        format!("no viable alternative for rule `{name}` at {token}"),
                    )
                    .with_token(token),
                );
                node.erroneous = true;
                self.recover_to_sync(id, &mut node);
            }
        }

        self.active.remove(&key);
        ParseNode::Rule(node)
    }

    /// Parse a sequence of elements into `node`. Returns `false` when a
    /// mismatch escalated to panic-mode: the stream already sits on a
    /// synchronization token and the rest of the sequence is abandoned.
    fn parse_sequence(&mut self, rule: RuleId, elements: &[Element], node: &mut RuleNode) -> bool {
        for (index, element) in elements.iter().enumerate() {
            if !self.parse_element(rule, element, &elements[index + 1..], node) {
                return false;
            }
        }
        true
    }

    fn parse_element(
        &mut self,
        rule: RuleId,
        element: &Element,
        rest: &[Element],
        node: &mut RuleNode,
    ) -> bool {
        match element.quantifier {
            Quantifier::One => self.parse_item(rule, &element.item, rest, node),
            Quantifier::Optional => {
                if self.item_viable(&element.item) {
                    self.parse_item(rule, &element.item, rest, node)
                } else {
                    true
                }
            }
            Quantifier::ZeroOrMore => self.parse_loop(rule, &element.item, rest, node, false),
            Quantifier::OneOrMore => self.parse_loop(rule, &element.item, rest, node, true),
        }
    }

    /// Quantified element: keep applying the loop decision (stay while
    /// the body's lookahead matches) with zero-progress protection.
    fn parse_loop(
        &mut self,
        rule: RuleId,
        item: &Item,
        rest: &[Element],
        node: &mut RuleNode,
        at_least_one: bool,
    ) -> bool {
        if at_least_one {
            // The first iteration of `+` is mandatory: a mismatch goes
            // through ordinary terminal/decision recovery.
            if !self.parse_item(rule, item, rest, node) {
                return false;
            }
        }
        loop {
            if !self.item_viable(item) {
                return true;
            }
            let before = self.stream.index();
            if !self.parse_item(rule, item, rest, node) {
                return false;
            }
            if self.stream.index() == before {
                let token = self.stream.lt(1).clone();
                self.emit(
                    Diagnostic::syntax(
                        ErrorCode::E0204,
                        token.position(),
                        format!(
                            "loop in rule `{}` matched without consuming input",
                            self.grammar.rule_name(rule)
                        ),
                    )
                    .with_token(token),
                );
                return true;
            }
        }
    }

    fn parse_item(
        &mut self,
        rule: RuleId,
        item: &Item,
        rest: &[Element],
        node: &mut RuleNode,
    ) -> bool {
        match item {
            Item::Terminal(kind) => self.parse_terminal(rule, *kind, rest, node),
            Item::Rule(id) => {
                let child = self.parse_rule(*id);
                node.children.push(child);
                true
            }
            Item::Group(alternatives) => {
                if alternatives.len() == 1 {
                    return self.parse_sequence(rule, &alternatives[0].elements, node);
                }
                let label = format!("group in rule `{}`", self.grammar.rule_name(rule));
                match self.predict(&label, alternatives) {
                    Some(alternative) => {
                        self.parse_sequence(rule, &alternatives[alternative].elements, node)
                    }
                    None => {
                        let token = self.stream.lt(1).clone();
                        self.emit(
                            Diagnostic::syntax(
                                ErrorCode::E0201,
                                token.position(),
                                format!("no viable alternative for {label} at {token}"),
                            )
                            .with_token(token),
                        );
                        node.erroneous = true;
                        self.recover_to_sync(rule, node);
                        false
                    }
                }
            }
        }
    }

    fn parse_terminal(
        &mut self,
        rule: RuleId,
        expected: TokenKind,
        rest: &[Element],
        node: &mut RuleNode,
    ) -> bool {
        if self.stream.la(1) == expected {
            let token = self.stream.advance();
            node.children.push(ParseNode::Terminal(TerminalNode { token }));
            return true;
        }
        self.recover_terminal(rule, expected, rest, node)
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    /// A required terminal is absent. In order:
    /// 1. single-token deletion: the token after the offending one is
    ///    the expected one, so drop the offender and match;
    /// 2. single-token insertion: the sequence after the expected
    ///    terminal accepts the current token, so record a gap and carry
    ///    on without consuming;
    /// 3. panic mode: neither repair fits; resynchronize on the rule's
    ///    sync set and abandon the rest of the sequence.
    ///
    /// Returns `false` on the panic branch.
    fn recover_terminal(
        &mut self,
        rule: RuleId,
        expected: TokenKind,
        rest: &[Element],
        node: &mut RuleNode,
    ) -> bool {
        let expected_name = SmolStr::new(self.grammar.terminal_name(expected));
        let offending = self.stream.lt(1).clone();

        if self.stream.la(2) == expected {
            debug!(expected = %expected_name, found = %offending, "recovery: deleting extraneous token");
            self.emit(
                Diagnostic::syntax(
                    ErrorCode::E0203,
                    offending.position(),
                    format!("extraneous {offending}, expected {expected_name}"),
                )
                .with_token(offending),
            );
            let skipped = self.stream.advance();
            node.children.push(ParseNode::Error(ErrorNode::Skipped {
                tokens: vec![skipped],
            }));
            let token = self.stream.advance();
            node.children.push(ParseNode::Terminal(TerminalNode { token }));
            return true;
        }

        if self.insertion_sensible(rule, rest) {
            debug!(expected = %expected_name, found = %offending, "recovery: inserting missing token");
            self.emit(
                Diagnostic::syntax(
                    ErrorCode::E0202,
                    offending.position(),
                    format!("missing {expected_name} before {offending}"),
                )
                .with_token(offending.clone())
                .with_hint(format!("insert {expected_name} here")),
            );
            node.children.push(ParseNode::Error(ErrorNode::Missing {
                expected,
                expected_name,
                position: offending.position(),
            }));
            return true;
        }

        self.emit(
            Diagnostic::syntax(
                ErrorCode::E0207,
                offending.position(),
                format!("mismatched input {offending}, expected {expected_name}"),
            )
            .with_token(offending),
        );
        node.erroneous = true;
        self.recover_to_sync(rule, node);
        false
    }

    /// Would pretending the expected terminal was present let the parse
    /// continue? True when the rest of the sequence accepts the current
    /// token, or when the rule would end here and the current token
    /// belongs to its sync set.
    fn insertion_sensible(&mut self, rule: RuleId, rest: &[Element]) -> bool {
        let before = self.stream.index();
        let limit = before + 1;
        let mark = self.stream.mark();
        let mut active = FxHashSet::default();
        let ok = self.spec_sequence(rest, limit, &mut active);
        let consumed = self.stream.index() - before;
        self.stream.seek(mark);
        if !ok {
            return false;
        }
        if consumed > 0 {
            return true;
        }
        let kind = self.stream.la(1);
        self.grammar.sync_set(rule).contains(&kind)
    }

    /// Panic-mode resynchronization: discard tokens until one belongs to
    /// the rule's statically computed sync set (its follow set plus
    /// end-of-input), then let the enclosing context resume.
    fn recover_to_sync(&mut self, rule: RuleId, node: &mut RuleNode) {
        debug!(rule = %self.grammar.rule_name(rule), "recovery: resynchronizing");
        let sync = self.grammar.sync_set(rule);
        let mut skipped = Vec::new();
        loop {
            let kind = self.stream.la(1);
            if kind.is_eof() || sync.contains(&kind) {
                break;
            }
            skipped.push(self.stream.advance());
        }
        if !skipped.is_empty() {
            trace!(count = skipped.len(), "recovery: skipped tokens");
            node.children
                .push(ParseNode::Error(ErrorNode::Skipped { tokens: skipped }));
        }
    }

    // =========================================================================
    // Prediction (speculative lookahead)
    // =========================================================================

    /// The decision procedure: starting at depth 1, keep the
    /// alternatives whose lookahead language still accepts the upcoming
    /// input, deepening only while more than one survives and the bound
    /// allows. The first survivor in declaration order wins; if several
    /// survive at the bound they accept identical lookahead and the
    /// detector (when enabled) reports the ambiguity.
    fn predict(&mut self, label: &str, alternatives: &[Alternative]) -> Option<usize> {
        let mut viable: Vec<usize> = (0..alternatives.len()).collect();
        let mut depth = 0;
        while depth < self.bound {
            depth += 1;
            let surviving: Vec<usize> = viable
                .iter()
                .copied()
                .filter(|&index| self.alt_viable(&alternatives[index], depth))
                .collect();
            trace!(decision = label, depth, surviving = ?surviving, "prediction");
            match surviving.len() {
                0 => return None,
                1 => return Some(surviving[0]),
                _ => viable = surviving,
            }
        }
        let at = self.stream.lt(1).clone();
        if let Some(diagnostic) = self.detector.report(label, &viable, self.bound, &at) {
            self.emit(diagnostic);
        }
        viable.first().copied()
    }

    /// Whether one alternative accepts the next `depth` tokens. Runs a
    /// bounded dry-run of the committed strategy between a mark/seek
    /// pair, so nothing is permanently consumed.
    fn alt_viable(&mut self, alternative: &Alternative, depth: usize) -> bool {
        let limit = self.stream.index() + depth;
        let mark = self.stream.mark();
        let mut active = FxHashSet::default();
        let ok = self.spec_sequence(&alternative.elements, limit, &mut active);
        self.stream.seek(mark);
        ok
    }

    /// Loop-boundary and `?` decision: does the element's lookahead
    /// match here, within the configured bound?
    fn item_viable(&mut self, item: &Item) -> bool {
        let limit = self.stream.index() + self.bound;
        let mark = self.stream.mark();
        let mut active = FxHashSet::default();
        let ok = self.spec_item(item, limit, &mut active);
        self.stream.seek(mark);
        ok
    }

    fn spec_sequence(
        &mut self,
        elements: &[Element],
        limit: usize,
        active: &mut FxHashSet<(RuleId, usize)>,
    ) -> bool {
        for element in elements {
            if self.stream.index() >= limit {
                // Lookahead window exhausted: viable as far as we can see.
                return true;
            }
            if !self.spec_element(element, limit, active) {
                return false;
            }
        }
        true
    }

    fn spec_element(
        &mut self,
        element: &Element,
        limit: usize,
        active: &mut FxHashSet<(RuleId, usize)>,
    ) -> bool {
        match element.quantifier {
            Quantifier::One => self.spec_item(&element.item, limit, active),
            Quantifier::Optional => {
                let mark = self.stream.mark();
                if self.spec_item(&element.item, limit, active) {
                    self.stream.release(mark);
                } else {
                    self.stream.seek(mark);
                }
                true
            }
            Quantifier::ZeroOrMore => {
                self.spec_loop(&element.item, limit, active);
                true
            }
            Quantifier::OneOrMore => {
                if !self.spec_item(&element.item, limit, active) {
                    return false;
                }
                self.spec_loop(&element.item, limit, active);
                true
            }
        }
    }

    /// Greedy speculative iteration, mirroring the committed loop: keep
    /// matching while the body fits and consumes something.
    fn spec_loop(&mut self, item: &Item, limit: usize, active: &mut FxHashSet<(RuleId, usize)>) {
        loop {
            if self.stream.index() >= limit {
                return;
            }
            let before = self.stream.index();
            let mark = self.stream.mark();
            if self.spec_item(item, limit, active) && self.stream.index() > before {
                self.stream.release(mark);
            } else {
                self.stream.seek(mark);
                return;
            }
        }
    }

    fn spec_item(
        &mut self,
        item: &Item,
        limit: usize,
        active: &mut FxHashSet<(RuleId, usize)>,
    ) -> bool {
        if self.stream.index() >= limit {
            return true;
        }
        match item {
            Item::Terminal(kind) => {
                if self.stream.la(1) == *kind {
                    self.stream.advance();
                    true
                } else {
                    false
                }
            }
            Item::Rule(id) => {
                let key = (*id, self.stream.index());
                // Re-entry at the same position is a cycle that can never
                // consume input; that path is not viable.
                if !active.insert(key) {
                    return false;
                }
                let rule = self.grammar.rule(*id);
                let mut ok = false;
                for alternative in &rule.alternatives {
                    let mark = self.stream.mark();
                    if self.spec_sequence(&alternative.elements, limit, active) {
                        self.stream.release(mark);
                        ok = true;
                        break;
                    }
                    self.stream.seek(mark);
                }
                active.remove(&key);
                ok
            }
            Item::Group(alternatives) => {
                for alternative in alternatives {
                    let mark = self.stream.mark();
                    if self.spec_sequence(&alternative.elements, limit, active) {
                        self.stream.release(mark);
                        return true;
                    }
                    self.stream.seek(mark);
                }
                false
            }
        }
    }
}
