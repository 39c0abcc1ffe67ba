//! Parse trees
//!
//! The tree is a closed tagged variant: every node is a rule node, a
//! terminal node, or an error node left behind by recovery. Children are
//! stored in input-consumption order and the whole tree is immutable
//! once a parse returns it; traversal happens through the
//! [`Visitor`] protocol or plain pattern matching, never mutation.

mod node;
mod visitor;

pub use node::{ErrorNode, ParseNode, RuleNode, TerminalNode};
pub use visitor::{VisitFlow, Visitor, walk};
