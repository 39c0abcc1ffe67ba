//! Listener tests: registration order, pure observation

mod helpers;

use std::cell::RefCell;
use std::rc::Rc;

use gramary::errors::{CollectingListener, Diagnostic, ErrorListener};
use gramary::parser::{ParseOptions, Parser};

use helpers::assign_grammar;

/// Pushes a tag into a shared log for every diagnostic it sees.
struct Tagger {
    log: Rc<RefCell<Vec<String>>>,
    tag: &'static str,
}

impl ErrorListener for Tagger {
    fn lexical_error(&mut self, diagnostic: &Diagnostic) {
        self.log
            .borrow_mut()
            .push(format!("{}:lex:{}", self.tag, diagnostic.code));
    }

    fn syntax_error(&mut self, diagnostic: &Diagnostic) {
        self.log
            .borrow_mut()
            .push(format!("{}:syn:{}", self.tag, diagnostic.code));
    }

    fn ambiguity(&mut self, diagnostic: &Diagnostic) {
        self.log
            .borrow_mut()
            .push(format!("{}:amb:{}", self.tag, diagnostic.code));
    }
}

#[test]
fn test_collecting_listener_sees_what_the_parse_returns() {
    let grammar = assign_grammar();
    let collector = CollectingListener::new();
    let handle = collector.clone();

    let mut parser = Parser::new(&grammar);
    parser.add_listener(Box::new(collector));
    let parse = parser.parse("assign", "x = @;").unwrap();

    // One lexical error (`@`) and one syntax error (missing NUMBER).
    assert_eq!(parse.diagnostics.len(), 2);
    assert_eq!(handle.diagnostics(), parse.diagnostics);
}

#[test]
fn test_listeners_fire_in_registration_order() {
    let grammar = assign_grammar();
    let log = Rc::new(RefCell::new(Vec::new()));

    let mut parser = Parser::new(&grammar);
    parser.add_listener(Box::new(Tagger {
        log: Rc::clone(&log),
        tag: "first",
    }));
    parser.add_listener(Box::new(Tagger {
        log: Rc::clone(&log),
        tag: "second",
    }));

    let parse = parser.parse("assign", "x = ;").unwrap();
    assert_eq!(parse.diagnostics.len(), 1);

    let log = log.borrow();
    assert_eq!(*log, ["first:syn:E0202", "second:syn:E0202"]);
}

#[test]
fn test_listener_receives_every_kind() {
    // An ambiguous grammar plus a lexical error in the input exercises
    // all three callbacks in one parse.
    let grammar = gramary::Grammar::builder()
        .token("NUMBER", r"[0-9]+")
        .rule(
            "value",
            vec![
                vec![gramary::grammar::term("NUMBER")],
                vec![gramary::grammar::term("NUMBER")],
            ],
        )
        .build()
        .unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut parser = Parser::with_options(
        &grammar,
        ParseOptions::new().with_ambiguity_detection(true),
    );
    parser.add_listener(Box::new(Tagger {
        log: Rc::clone(&log),
        tag: "l",
    }));

    let parse = parser.parse("value", "!7").unwrap();
    assert!(parse.diagnostics.len() >= 2);

    let log = log.borrow();
    assert!(log.contains(&"l:lex:E0101".to_string()));
    assert!(log.contains(&"l:amb:E0301".to_string()));
}

#[test]
fn test_listeners_cannot_change_the_outcome() {
    let grammar = assign_grammar();

    let mut with_listener = Parser::new(&grammar);
    with_listener.add_listener(Box::new(CollectingListener::new()));
    let observed = with_listener.parse("assign", "x = ;").unwrap();

    let silent = Parser::new(&grammar).parse("assign", "x = ;").unwrap();
    assert_eq!(observed.tree, silent.tree);
    assert_eq!(observed.diagnostics, silent.diagnostics);
}
