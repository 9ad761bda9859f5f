//! # LR(1) and LALR(1) construction
//! This module turns a [Grammar](crate::grammar::Grammar) into a table-driven parser in three
//! steps, each produced by the previous one:
//!
//! 1. [LrAutomaton] builds the canonical collection of LR(1) item sets over the augmented
//!    grammar.
//! 2. [Lalr1Table] merges states sharing a core, unions their lookaheads, and fills the
//!    ACTION and GOTO tables, recording (but never resolving) conflicts.
//! 3. [Lalr1Table::accepts] drives the shift/reduce loop over a token sequence.
//!
//! ```
//! use grackle::grammar::Grammar;
//! use grackle::lr::Lalr1Table;
//! use grackle::tokenizer::Token;
//!
//! let grammar: Grammar = grackle::parser::grammar("
//!     E -> E + T | T
//!     T -> T * F | F
//!     F -> ( E ) | id
//! ").unwrap().try_into().unwrap();
//!
//! let table = Lalr1Table::new(&grammar);
//! assert!(table.conflicts().is_empty());
//!
//! let tokens = ["id", "+", "id", "*", "id"].map(|t| Token::new(t, t));
//! assert!(table.accepts(&tokens));
//! assert!(!table.accepts(&tokens[..2]));
//! ```
//!
//! ## Items and states
//! An LR(1) item is a production with a dot position and a lookahead terminal. Items sharing
//! production and dot position differ only in bookkeeping, so a state is kept as a map from
//! [ItemCore] (production index and dot position) to the set of lookahead symbols carried by
//! that core. This makes the LALR merge a per-core set union. State and production indices
//! follow discovery and declaration order, so the whole construction is deterministic for a
//! given grammar.

use crate::grammar::{Grammar, Production, Symbol};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;

mod driver;
mod table;

pub use table::{Action, Lalr1Table};

/// The core of an LR(1) item: a production (by index into the augmented grammar) and a dot
/// position within its right-hand side. Lookaheads are carried beside the core, see [ItemSet].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemCore {
    pub production: usize,
    pub dot: usize,
}

/// A state of the LR(1) automaton: each item core present in the state, mapped to its set of
/// lookahead terminals. The ordered maps make iteration order, and with it state numbering,
/// deterministic.
pub type ItemSet = BTreeMap<ItemCore, BTreeSet<Symbol>>;

/// The canonical collection of LR(1) item sets of an augmented grammar, together with its
/// transitions. States are numbered in BFS discovery order; state 0 is the closure of the seed
/// item `[S' → •S, $]`.
#[derive(Debug, Clone)]
pub struct LrAutomaton {
    pub(crate) grammar: Grammar,
    pub(crate) states: Vec<ItemSet>,
    pub(crate) transitions: HashMap<(usize, Symbol), usize>,
}

/// The index of the augmented production `S' → S`
pub(crate) const START_PRODUCTION: usize = 0;

impl LrAutomaton {
    /// Builds the canonical collection for the given grammar. The grammar is augmented first:
    /// a fresh start symbol (the old start's name with primes appended until unused) with the
    /// single production `S' → S` becomes production 0, and all further state is computed over
    /// the augmented grammar.
    pub fn new(grammar: &Grammar) -> Self {
        let grammar = augment(grammar);
        let first = grammar.first_sets();

        let seed: ItemSet = BTreeMap::from([(
            ItemCore {
                production: START_PRODUCTION,
                dot: 0,
            },
            BTreeSet::from([Symbol::end_of_input()]),
        )]);

        let mut states = vec![closure(&grammar, &first, seed)];
        let mut transitions = HashMap::new();
        let mut queue = VecDeque::from([0]);

        while let Some(state) = queue.pop_front() {
            for symbol in symbols_after_dot(&grammar, &states[state]) {
                let target_items = goto(&grammar, &first, &states[state], &symbol);
                if target_items.is_empty() {
                    continue;
                }
                let target = match states.iter().position(|existing| *existing == target_items)
                {
                    Some(existing) => existing,
                    None => {
                        states.push(target_items);
                        queue.push_back(states.len() - 1);
                        states.len() - 1
                    }
                };
                transitions.insert((state, symbol), target);
            }
        }

        Self {
            grammar,
            states,
            transitions,
        }
    }

    /// Gets the augmented grammar this automaton was built over
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Gets the item sets of this automaton, indexed by state number
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// Gets the transition for a state and symbol, if any
    pub fn transition(&self, state: usize, symbol: &Symbol) -> Option<usize> {
        self.transitions.get(&(state, symbol.clone())).copied()
    }
}

/// Adds the fresh start symbol and the production `S' → S` in front of the grammar's own
/// productions
fn augment(grammar: &Grammar) -> Grammar {
    let name = {
        let mut name = format!("{}'", grammar.start().name());
        let taken = |name: &str| {
            grammar
                .non_terminals()
                .iter()
                .chain(grammar.terminals())
                .any(|s| s.name() == name)
        };
        while taken(&name) {
            name.push('\'');
        }
        Rc::from(name.as_str())
    };
    let fresh_start = Symbol::non_terminal(name);

    let mut productions = Vec::with_capacity(grammar.productions().len() + 1);
    productions.push(Production::new(
        fresh_start.clone(),
        vec![grammar.start().clone()],
    ));
    productions.extend(grammar.productions().iter().cloned());

    let mut non_terminals = grammar.non_terminals().to_vec();
    non_terminals.push(fresh_start.clone());

    Grammar::new(
        grammar.terminals().to_vec(),
        non_terminals,
        productions,
        fresh_start,
    )
    .expect("augmenting preserves the grammar invariants")
}

/// CLOSURE: for every item `[A → α•Bβ, a]` with `B` a non-terminal and every production
/// `B → γ`, the item `[B → •γ, b]` is added for every terminal `b` in `FIRST(βa)`
fn closure(
    grammar: &Grammar,
    first: &HashMap<Symbol, HashSet<Symbol>>,
    mut items: ItemSet,
) -> ItemSet {
    let mut pending: Vec<(ItemCore, Symbol)> = items
        .iter()
        .flat_map(|(core, lookaheads)| lookaheads.iter().map(|la| (*core, la.clone())))
        .collect();

    while let Some((core, lookahead)) = pending.pop() {
        let production = &grammar.productions()[core.production];
        let next = match production.right().get(core.dot) {
            Some(symbol) if symbol.is_non_terminal() => symbol,
            _ => continue,
        };

        let beta = &production.right()[core.dot + 1..];
        let (mut firsts, nullable) = grammar.sequence_first(beta, first);
        if nullable {
            firsts.insert(lookahead);
        }

        for (production_idx, _) in grammar.productions_for(next) {
            let new_core = ItemCore {
                production: production_idx,
                dot: 0,
            };
            for b in &firsts {
                let lookaheads = items.entry(new_core).or_default();
                if lookaheads.insert(b.clone()) {
                    pending.push((new_core, b.clone()));
                }
            }
        }
    }
    items
}

/// GOTO: advances the dot over `symbol` in every item that has it next, then takes the closure
fn goto(
    grammar: &Grammar,
    first: &HashMap<Symbol, HashSet<Symbol>>,
    items: &ItemSet,
    symbol: &Symbol,
) -> ItemSet {
    let mut kernel = ItemSet::new();
    for (core, lookaheads) in items {
        if grammar.productions()[core.production].right().get(core.dot) == Some(symbol) {
            kernel
                .entry(ItemCore {
                    production: core.production,
                    dot: core.dot + 1,
                })
                .or_default()
                .extend(lookaheads.iter().cloned());
        }
    }
    if kernel.is_empty() {
        kernel
    } else {
        closure(grammar, first, kernel)
    }
}

/// The symbols appearing immediately after a dot in the state, in item order without duplicates
fn symbols_after_dot(grammar: &Grammar, items: &ItemSet) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    for core in items.keys() {
        if let Some(symbol) = grammar.productions()[core.production].right().get(core.dot) {
            if !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }
    }
    symbols
}
