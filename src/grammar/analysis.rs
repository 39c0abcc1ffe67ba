//! Static analysis of the rule table
//!
//! Computes the classic nullable / FIRST / FOLLOW fixpoints over the
//! resolved rules, the per-rule panic-mode synchronization sets, and the
//! grammar-derived default lookahead bound. Runs once at build time; the
//! parser only reads the results.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::rules::{Element, GrammarRule, Item, TokenKind};

/// Token-length cap used while deriving the default lookahead bound.
const BOUND_CAP: usize = 16;

#[derive(Debug)]
pub(super) struct GrammarAnalysis {
    pub(super) nullable: Vec<bool>,
    pub(super) first: Vec<FxHashSet<TokenKind>>,
    pub(super) follow: Vec<FxHashSet<TokenKind>>,
    pub(super) sync: Vec<FxHashSet<TokenKind>>,
    pub(super) default_bound: usize,
}

pub(super) fn analyze(rules: &IndexMap<SmolStr, GrammarRule>) -> GrammarAnalysis {
    let n = rules.len();

    // Nullable: a rule is nullable if any alternative can match epsilon.
    let mut nullable = vec![false; n];
    loop {
        let mut changed = false;
        for (i, (_, rule)) in rules.iter().enumerate() {
            if !nullable[i]
                && rule
                    .alternatives
                    .iter()
                    .any(|alt| seq_nullable(&alt.elements, &nullable))
            {
                nullable[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // FIRST: terminals that can begin each rule.
    let mut first: Vec<FxHashSet<TokenKind>> = vec![FxHashSet::default(); n];
    loop {
        let mut changed = false;
        for (i, (_, rule)) in rules.iter().enumerate() {
            let mut fresh = FxHashSet::default();
            for alt in &rule.alternatives {
                seq_first(&alt.elements, &first, &nullable, &mut fresh);
            }
            let before = first[i].len();
            first[i].extend(fresh);
            changed |= first[i].len() != before;
        }
        if !changed {
            break;
        }
    }

    // FOLLOW: terminals that can appear after each rule, in any context.
    let mut follow: Vec<FxHashSet<TokenKind>> = vec![FxHashSet::default(); n];
    loop {
        let mut changed = false;
        for (i, (_, rule)) in rules.iter().enumerate() {
            let ctx = follow[i].clone();
            for alt in &rule.alternatives {
                follow_seq(
                    &alt.elements,
                    &ctx,
                    &mut follow,
                    &first,
                    &nullable,
                    &mut changed,
                );
            }
        }
        if !changed {
            break;
        }
    }

    // Panic-mode resynchronization: follow set plus end-of-input.
    let sync = follow
        .iter()
        .map(|set| {
            let mut sync = set.clone();
            sync.insert(TokenKind::EOF);
            sync
        })
        .collect();

    let default_bound = derive_bound(rules);

    GrammarAnalysis {
        nullable,
        first,
        follow,
        sync,
        default_bound,
    }
}

fn elem_nullable(elem: &Element, nullable: &[bool]) -> bool {
    elem.quantifier.min_is_zero() || item_nullable(&elem.item, nullable)
}

fn item_nullable(item: &Item, nullable: &[bool]) -> bool {
    match item {
        Item::Terminal(_) => false,
        Item::Rule(id) => nullable[id.index()],
        Item::Group(alts) => alts
            .iter()
            .any(|alt| seq_nullable(&alt.elements, nullable)),
    }
}

fn seq_nullable(elements: &[Element], nullable: &[bool]) -> bool {
    elements.iter().all(|elem| elem_nullable(elem, nullable))
}

fn seq_first(
    elements: &[Element],
    first: &[FxHashSet<TokenKind>],
    nullable: &[bool],
    out: &mut FxHashSet<TokenKind>,
) {
    for elem in elements {
        item_first(&elem.item, first, nullable, out);
        if !elem_nullable(elem, nullable) {
            break;
        }
    }
}

fn item_first(
    item: &Item,
    first: &[FxHashSet<TokenKind>],
    nullable: &[bool],
    out: &mut FxHashSet<TokenKind>,
) {
    match item {
        Item::Terminal(kind) => {
            out.insert(*kind);
        }
        Item::Rule(id) => out.extend(first[id.index()].iter().copied()),
        Item::Group(alts) => {
            for alt in alts {
                seq_first(&alt.elements, first, nullable, out);
            }
        }
    }
}

/// One FOLLOW propagation pass over a sequence. `ctx` is the set of
/// terminals that can follow the whole sequence.
fn follow_seq(
    elements: &[Element],
    ctx: &FxHashSet<TokenKind>,
    follow: &mut [FxHashSet<TokenKind>],
    first: &[FxHashSet<TokenKind>],
    nullable: &[bool],
    changed: &mut bool,
) {
    for (i, elem) in elements.iter().enumerate() {
        let rest = &elements[i + 1..];
        let mut after = FxHashSet::default();
        seq_first(rest, first, nullable, &mut after);
        if seq_nullable(rest, nullable) {
            after.extend(ctx.iter().copied());
        }
        // A repeating element can be followed by its own next iteration.
        if elem.quantifier.is_repeating() {
            item_first(&elem.item, first, nullable, &mut after);
        }
        match &elem.item {
            Item::Terminal(_) => {}
            Item::Rule(id) => {
                let set = &mut follow[id.index()];
                let before = set.len();
                set.extend(after.iter().copied());
                *changed |= set.len() != before;
            }
            Item::Group(alts) => {
                for alt in alts {
                    follow_seq(&alt.elements, &after, follow, first, nullable, changed);
                }
            }
        }
    }
}

/// Default lookahead bound: the longest minimum token length over all
/// alternatives, clamped to `2..=BOUND_CAP`. Recursive rules bottom out
/// at the cap, which is exactly the "stop deepening" behavior we want.
fn derive_bound(rules: &IndexMap<SmolStr, GrammarRule>) -> usize {
    let n = rules.len();
    let mut min_len = vec![BOUND_CAP + 1; n];
    loop {
        let mut changed = false;
        for (i, (_, rule)) in rules.iter().enumerate() {
            let len = rule
                .alternatives
                .iter()
                .map(|alt| seq_min(&alt.elements, &min_len))
                .min()
                .unwrap_or(0);
            if len < min_len[i] {
                min_len[i] = len;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut longest = 0;
    for (_, rule) in rules {
        for alt in &rule.alternatives {
            longest = longest.max(seq_min(&alt.elements, &min_len).min(BOUND_CAP));
        }
    }
    longest.clamp(2, BOUND_CAP)
}

fn seq_min(elements: &[Element], min_len: &[usize]) -> usize {
    let mut total = 0usize;
    for elem in elements {
        if elem.quantifier.min_is_zero() {
            continue;
        }
        total = (total + item_min(&elem.item, min_len)).min(BOUND_CAP + 1);
    }
    total
}

fn item_min(item: &Item, min_len: &[usize]) -> usize {
    match item {
        Item::Terminal(_) => 1,
        Item::Rule(id) => min_len[id.index()],
        Item::Group(alts) => alts
            .iter()
            .map(|alt| seq_min(&alt.elements, min_len))
            .min()
            .unwrap_or(0),
    }
}
