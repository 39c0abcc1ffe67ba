//! Fluent construction and validation of grammars
//!
//! Rule bodies are written with the free functions [`term`], [`rule_ref`]
//! and [`group`], quantified via [`ElementSpec::optional`],
//! [`ElementSpec::zero_or_more`] and [`ElementSpec::one_or_more`]:
//!
//! ```
//! use gramary::grammar::{Grammar, group, term};
//!
//! let grammar = Grammar::builder()
//!     .hidden("WS", r"[ \t\r\n]+")
//!     .token("ID", r"[A-Za-z_][A-Za-z0-9_]*")
//!     .literal("COMMA", ",")
//!     .rule("list", vec![vec![
//!         term("ID"),
//!         group(vec![vec![term("COMMA"), term("ID")]]).zero_or_more(),
//!     ]])
//!     .build()
//!     .unwrap();
//! assert_eq!(grammar.rule_count(), 1);
//! ```
//!
//! Everything is name-based until [`GrammarBuilder::build`], which
//! resolves references, rejects malformed tables, and runs the static
//! analysis the parser needs (FIRST/FOLLOW, sync sets, lookahead bound).

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::analysis;
use super::error::GrammarError;
use super::rules::{
    Alternative, Channel, Element, Grammar, GrammarRule, Item, LexPattern, LexRule, Quantifier,
    RuleId, TokenKind,
};

/// Name of the reserved end-of-input terminal.
const EOF_NAME: &str = "EOF";

/// An unresolved element of a rule body.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    item: ItemSpec,
    quantifier: Quantifier,
}

#[derive(Debug, Clone)]
enum ItemSpec {
    Terminal(SmolStr),
    Rule(SmolStr),
    Group(Vec<Vec<ElementSpec>>),
}

impl ElementSpec {
    fn new(item: ItemSpec) -> Self {
        Self {
            item,
            quantifier: Quantifier::One,
        }
    }

    /// Mark this element `?`.
    pub fn optional(mut self) -> Self {
        self.quantifier = Quantifier::Optional;
        self
    }

    /// Mark this element `*`.
    pub fn zero_or_more(mut self) -> Self {
        self.quantifier = Quantifier::ZeroOrMore;
        self
    }

    /// Mark this element `+`.
    pub fn one_or_more(mut self) -> Self {
        self.quantifier = Quantifier::OneOrMore;
        self
    }
}

/// Reference a terminal by name. `term("EOF")` matches end-of-input.
pub fn term(name: &str) -> ElementSpec {
    ElementSpec::new(ItemSpec::Terminal(SmolStr::new(name)))
}

/// Reference another parse rule by name.
pub fn rule_ref(name: &str) -> ElementSpec {
    ElementSpec::new(ItemSpec::Rule(SmolStr::new(name)))
}

/// A nested group of alternatives, e.g. `(A | B C)`.
pub fn group(alternatives: Vec<Vec<ElementSpec>>) -> ElementSpec {
    ElementSpec::new(ItemSpec::Group(alternatives))
}

#[derive(Debug, Clone)]
enum PatternDecl {
    Literal(SmolStr),
    Regex(SmolStr),
}

#[derive(Debug, Clone)]
struct LexDecl {
    name: SmolStr,
    pattern: PatternDecl,
    channel: Channel,
}

/// Accumulates declarations, then validates them into a [`Grammar`].
///
/// Declaration order is significant twice over: lexical ties break toward
/// the earlier rule, and parse alternatives are tried first-to-last.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    lex: Vec<LexDecl>,
    rules: Vec<(SmolStr, Vec<Vec<ElementSpec>>)>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a terminal matched by an anchored regex pattern.
    pub fn token(mut self, name: &str, pattern: &str) -> Self {
        self.lex.push(LexDecl {
            name: SmolStr::new(name),
            pattern: PatternDecl::Regex(SmolStr::new(pattern)),
            channel: Channel::Default,
        });
        self
    }

    /// Declare a terminal matched by exact text.
    ///
    /// Declared before a broader pattern of the same length (e.g. a
    /// keyword before the identifier rule), the literal wins the tie.
    pub fn literal(mut self, name: &str, text: &str) -> Self {
        self.lex.push(LexDecl {
            name: SmolStr::new(name),
            pattern: PatternDecl::Literal(SmolStr::new(text)),
            channel: Channel::Default,
        });
        self
    }

    /// Declare a hidden-channel terminal (whitespace, comments).
    pub fn hidden(mut self, name: &str, pattern: &str) -> Self {
        self.lex.push(LexDecl {
            name: SmolStr::new(name),
            pattern: PatternDecl::Regex(SmolStr::new(pattern)),
            channel: Channel::Hidden,
        });
        self
    }

    /// Declare a parse rule. Each inner `Vec` is one alternative, in
    /// declaration order; an empty inner `Vec` is an epsilon alternative.
    pub fn rule(mut self, name: &str, alternatives: Vec<Vec<ElementSpec>>) -> Self {
        self.rules.push((SmolStr::new(name), alternatives));
        self
    }

    /// Validate everything and produce an immutable [`Grammar`].
    pub fn build(self) -> Result<Grammar, GrammarError> {
        // Terminals: slot 0 is the synthetic EOF.
        let mut terminal_names: Vec<SmolStr> = vec![SmolStr::new(EOF_NAME)];
        let mut terminals: FxHashMap<SmolStr, TokenKind> = FxHashMap::default();
        terminals.insert(SmolStr::new(EOF_NAME), TokenKind::EOF);

        let mut lex_rules = Vec::with_capacity(self.lex.len());
        for decl in &self.lex {
            if terminals.contains_key(&decl.name) {
                return Err(GrammarError::DuplicateTerminal(decl.name.clone()));
            }
            let kind = TokenKind(terminal_names.len() as u16);
            let pattern = match &decl.pattern {
                PatternDecl::Literal(text) => {
                    if text.is_empty() {
                        return Err(GrammarError::EmptyLiteral(decl.name.clone()));
                    }
                    LexPattern::Literal(text.clone())
                }
                PatternDecl::Regex(pattern) => {
                    let anchored = format!(r"\A(?:{pattern})");
                    let regex = Regex::new(&anchored).map_err(|e| GrammarError::InvalidPattern {
                        name: decl.name.clone(),
                        source: Box::new(e),
                    })?;
                    LexPattern::Pattern(regex)
                }
            };
            terminal_names.push(decl.name.clone());
            terminals.insert(decl.name.clone(), kind);
            lex_rules.push(LexRule {
                kind,
                pattern,
                channel: decl.channel,
            });
        }

        // Rules, pass one: assign ids in declaration order.
        let mut rule_ids: FxHashMap<SmolStr, RuleId> = FxHashMap::default();
        for (index, (name, _)) in self.rules.iter().enumerate() {
            if rule_ids.contains_key(name) {
                return Err(GrammarError::DuplicateRule(name.clone()));
            }
            rule_ids.insert(name.clone(), RuleId(index as u32));
        }

        // Pass two: resolve references.
        let resolver = Resolver {
            terminals: &terminals,
            lex_rules: &lex_rules,
            rule_ids: &rule_ids,
        };
        let mut rules: IndexMap<SmolStr, GrammarRule> = IndexMap::with_capacity(self.rules.len());
        for (name, alt_specs) in &self.rules {
            if alt_specs.is_empty() {
                return Err(GrammarError::EmptyRule(name.clone()));
            }
            let mut alternatives = Vec::with_capacity(alt_specs.len());
            for seq in alt_specs {
                alternatives.push(Alternative {
                    elements: resolver.resolve_sequence(name, seq)?,
                });
            }
            rules.insert(name.clone(), GrammarRule { alternatives });
        }

        let analysis = analysis::analyze(&rules);
        Ok(Grammar {
            lex_rules,
            terminal_names,
            terminals,
            rules,
            analysis,
        })
    }
}

struct Resolver<'a> {
    terminals: &'a FxHashMap<SmolStr, TokenKind>,
    lex_rules: &'a [LexRule],
    rule_ids: &'a FxHashMap<SmolStr, RuleId>,
}

impl Resolver<'_> {
    fn resolve_sequence(
        &self,
        rule: &SmolStr,
        specs: &[ElementSpec],
    ) -> Result<Vec<Element>, GrammarError> {
        specs
            .iter()
            .map(|spec| {
                Ok(Element {
                    item: self.resolve_item(rule, &spec.item)?,
                    quantifier: spec.quantifier,
                })
            })
            .collect()
    }

    fn resolve_item(&self, rule: &SmolStr, item: &ItemSpec) -> Result<Item, GrammarError> {
        match item {
            ItemSpec::Terminal(name) => {
                let kind =
                    self.terminals
                        .get(name)
                        .copied()
                        .ok_or_else(|| GrammarError::UnknownTerminal {
                            rule: rule.clone(),
                            target: name.clone(),
                        })?;
                if !kind.is_eof() && self.lex_rules[kind.index() - 1].channel == Channel::Hidden {
                    return Err(GrammarError::HiddenTerminal {
                        rule: rule.clone(),
                        target: name.clone(),
                    });
                }
                Ok(Item::Terminal(kind))
            }
            ItemSpec::Rule(name) => self
                .rule_ids
                .get(name)
                .copied()
                .map(Item::Rule)
                .ok_or_else(|| GrammarError::UnknownRule {
                    rule: rule.clone(),
                    target: name.clone(),
                }),
            ItemSpec::Group(alt_specs) => {
                if alt_specs.is_empty() {
                    return Err(GrammarError::EmptyGroup(rule.clone()));
                }
                let mut alternatives = Vec::with_capacity(alt_specs.len());
                for seq in alt_specs {
                    alternatives.push(Alternative {
                        elements: self.resolve_sequence(rule, seq)?,
                    });
                }
                Ok(Item::Group(alternatives))
            }
        }
    }
}
