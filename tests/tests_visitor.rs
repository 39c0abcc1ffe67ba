//! Visitor tests over real parse output

mod helpers;

use gramary::parser::parse;
use gramary::tree::{ErrorNode, RuleNode, TerminalNode, VisitFlow, Visitor, walk};

use helpers::{assign_grammar, binding_grammar};

#[test]
fn test_preorder_over_parsed_tree() {
    let grammar = binding_grammar();
    let parsed = parse(&grammar, "program", "func f() 1; end").unwrap();
    assert!(parsed.ok());

    #[derive(Default)]
    struct Events(Vec<String>);
    impl Visitor for Events {
        fn visit_rule(&mut self, node: &RuleNode) -> VisitFlow {
            self.0.push(format!("rule:{}", node.name));
            VisitFlow::Continue
        }
        fn visit_terminal(&mut self, node: &TerminalNode) {
            if !node.token.is_eof() {
                self.0.push(format!("tok:{}", node.token.text));
            }
        }
    }

    let mut events = Events::default();
    walk(&parsed.tree, &mut events);
    assert_eq!(
        events.0,
        [
            "rule:program",
            "rule:func_def",
            "tok:func",
            "tok:f",
            "tok:(",
            "tok:)",
            "rule:stmt",
            "rule:expr",
            "rule:mul_expr",
            "rule:factor",
            "tok:1",
            "tok:;",
            "tok:end",
        ]
    );
}

#[test]
fn test_pruning_skips_whole_subtrees() {
    let grammar = binding_grammar();
    let parsed = parse(&grammar, "program", "func f() 1; end func g() 2; end").unwrap();
    assert!(parsed.ok());

    #[derive(Default)]
    struct FunctionCounter {
        functions: usize,
        terminals: usize,
    }
    impl Visitor for FunctionCounter {
        fn visit_rule(&mut self, node: &RuleNode) -> VisitFlow {
            if node.name == "func_def" {
                self.functions += 1;
                // Count functions without descending into their bodies.
                return VisitFlow::SkipChildren;
            }
            VisitFlow::Continue
        }
        fn visit_terminal(&mut self, _node: &TerminalNode) {
            self.terminals += 1;
        }
    }

    let mut counter = FunctionCounter::default();
    walk(&parsed.tree, &mut counter);
    assert_eq!(counter.functions, 2);
    // Only the program-level EOF terminal remains unpruned.
    assert_eq!(counter.terminals, 1);
}

#[test]
fn test_error_nodes_are_visited() {
    let grammar = assign_grammar();
    let parsed = parse(&grammar, "assign", "x = ;").unwrap();
    assert!(!parsed.ok());

    #[derive(Default)]
    struct Errors(Vec<String>);
    impl Visitor for Errors {
        fn visit_error(&mut self, node: &ErrorNode) {
            match node {
                ErrorNode::Missing { expected_name, .. } => {
                    self.0.push(format!("missing:{expected_name}"));
                }
                ErrorNode::Skipped { tokens } => {
                    self.0.push(format!("skipped:{}", tokens.len()));
                }
            }
        }
    }

    let mut errors = Errors::default();
    walk(&parsed.tree, &mut errors);
    assert_eq!(errors.0, ["missing:NUMBER"]);
}
