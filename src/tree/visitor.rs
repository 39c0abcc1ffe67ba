//! Depth-first, pre-order traversal
//!
//! One visit method per node kind; [`Visitor::visit_rule`] may return
//! [`VisitFlow::SkipChildren`] to prune a subtree. Visitors borrow the
//! tree immutably; there is no mutating traversal.

use super::node::{ErrorNode, ParseNode, RuleNode, TerminalNode};

/// Signal returned from [`Visitor::visit_rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitFlow {
    /// Descend into the node's children.
    #[default]
    Continue,
    /// Do not descend; continue with the next sibling.
    SkipChildren,
}

/// Handlers for one traversal. All methods have default bodies, so a
/// visitor implements only what it cares about.
pub trait Visitor {
    fn visit_rule(&mut self, _node: &RuleNode) -> VisitFlow {
        VisitFlow::Continue
    }

    fn visit_terminal(&mut self, _node: &TerminalNode) {}

    fn visit_error(&mut self, _node: &ErrorNode) {}
}

/// Drive a visitor over a subtree, pre-order.
pub fn walk<V: Visitor + ?Sized>(node: &ParseNode, visitor: &mut V) {
    match node {
        ParseNode::Rule(rule) => {
            if visitor.visit_rule(rule) == VisitFlow::Continue {
                for child in &rule.children {
                    walk(child, visitor);
                }
            }
        }
        ParseNode::Terminal(terminal) => visitor.visit_terminal(terminal),
        ParseNode::Error(error) => visitor.visit_error(error),
    }
}
