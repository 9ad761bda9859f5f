use crate::grammar::{Grammar, Production, Symbol};
use crate::lr::{ItemCore, ItemSet, LrAutomaton, START_PRODUCTION};
use crate::table::Table;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// An entry of the ACTION table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Consume the terminal and enter the given state
    Shift(usize),
    /// Reduce by the production with the given index in the [augmented grammar](Lalr1Table::grammar)
    Reduce(usize),
    /// The input is a sentence of the grammar
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{state}"),
            Action::Reduce(production) => write!(f, "r{production}"),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/// An LALR(1) parse table: the ACTION and GOTO tables over the merged states of an
/// [LrAutomaton], plus the conflicts encountered while filling them.
///
/// Conflicts are *recorded, not resolved*: a cell keeps the first action written to it and
/// every later disagreeing write is described in [conflicts](Lalr1Table::conflicts). A caller
/// that wants to reject ambiguous grammars should check that list before using the table.
#[derive(Debug, Clone)]
pub struct Lalr1Table {
    pub(crate) grammar: Grammar,
    pub(crate) states: Vec<ItemSet>,
    pub(crate) actions: HashMap<(usize, Symbol), Action>,
    pub(crate) gotos: HashMap<(usize, Symbol), usize>,
    pub(crate) conflicts: Vec<String>,
}

impl Lalr1Table {
    /// Builds the LALR(1) table for a grammar by constructing the canonical LR(1) collection
    /// and merging it. Equivalent to `Lalr1Table::from_automaton(LrAutomaton::new(grammar))`.
    pub fn new(grammar: &Grammar) -> Self {
        Self::from_automaton(LrAutomaton::new(grammar))
    }

    /// Merges the LR(1) states of the automaton by core and fills the ACTION and GOTO tables.
    /// Merged states are numbered by the first LR(1) state of each core group, so state 0 stays
    /// the initial state.
    pub fn from_automaton(automaton: LrAutomaton) -> Self {
        let LrAutomaton {
            grammar,
            states: lr_states,
            transitions: lr_transitions,
        } = automaton;

        // Group states by core set; the lookaheads of a core become the union across its group
        let mut groups: HashMap<BTreeSet<ItemCore>, usize> = HashMap::new();
        let mut state_map = Vec::with_capacity(lr_states.len());
        let mut states: Vec<ItemSet> = Vec::new();
        for items in &lr_states {
            let core_set: BTreeSet<ItemCore> = items.keys().copied().collect();
            let merged = match groups.get(&core_set) {
                Some(&merged) => merged,
                None => {
                    let merged = states.len();
                    groups.insert(core_set, merged);
                    states.push(ItemSet::new());
                    merged
                }
            };
            for (core, lookaheads) in items {
                states[merged]
                    .entry(*core)
                    .or_default()
                    .extend(lookaheads.iter().cloned());
            }
            state_map.push(merged);
        }

        // States with equal cores have equal outgoing cores, so the remapped transitions agree
        let mut transitions: HashMap<(usize, Symbol), usize> = HashMap::new();
        for ((from, symbol), to) in &lr_transitions {
            transitions.insert((state_map[*from], symbol.clone()), state_map[*to]);
        }

        let mut actions = HashMap::new();
        let mut gotos = HashMap::new();
        let mut conflicts = Vec::new();

        for (state, items) in states.iter().enumerate() {
            for (core, lookaheads) in items {
                let production = &grammar.productions()[core.production];
                match production.right().get(core.dot) {
                    Some(symbol) if symbol.is_terminal() => {
                        if let Some(&target) = transitions.get(&(state, symbol.clone())) {
                            install(
                                &mut actions,
                                &mut conflicts,
                                state,
                                symbol.clone(),
                                Action::Shift(target),
                            );
                        }
                    }
                    Some(_) => {} // a non-terminal after the dot becomes a GOTO entry below
                    None => {
                        if core.production == START_PRODUCTION {
                            // The dot is at the end of S' → S, and its only lookahead is $
                            install(
                                &mut actions,
                                &mut conflicts,
                                state,
                                Symbol::end_of_input(),
                                Action::Accept,
                            );
                        } else {
                            for lookahead in lookaheads {
                                install(
                                    &mut actions,
                                    &mut conflicts,
                                    state,
                                    lookahead.clone(),
                                    Action::Reduce(core.production),
                                );
                            }
                        }
                    }
                }
            }
        }

        for ((state, symbol), target) in &transitions {
            if symbol.is_non_terminal() {
                gotos.insert((*state, symbol.clone()), *target);
            }
        }

        Self {
            grammar,
            states,
            actions,
            gotos,
            conflicts,
        }
    }

    /// Gets the ACTION entry for a state and terminal, if any. An absent entry means the parser
    /// rejects in this configuration.
    pub fn action(&self, state: usize, terminal: &Symbol) -> Option<Action> {
        self.actions.get(&(state, terminal.clone())).copied()
    }

    /// Gets the GOTO entry for a state and non-terminal, if any
    pub fn goto(&self, state: usize, non_terminal: &Symbol) -> Option<usize> {
        self.gotos.get(&(state, non_terminal.clone())).copied()
    }

    /// Gets the conflicts recorded while the table was filled, in fill order. An empty list
    /// means the grammar is LALR(1) and the table is unambiguous.
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// Gets the augmented grammar behind this table. Production 0 is the augmented start
    /// production, which [Action::Reduce] indices point into.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Gets the merged item sets, indexed by state number
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// Generates the ACTION/GOTO table suitable for printing: one row per state, one column per
    /// terminal (`$` included), then one per non-terminal
    pub fn to_table(&self) -> String {
        let terminals = self
            .grammar
            .terminals()
            .iter()
            .cloned()
            .chain([Symbol::end_of_input()])
            .collect::<Vec<_>>();
        let non_terminals = self
            .grammar
            .non_terminals()
            .iter()
            .filter(|nt| *nt != self.grammar.start())
            .cloned()
            .collect::<Vec<_>>();

        let mut table = Table::default();
        let mut head = vec![String::new()];
        head.extend(terminals.iter().chain(&non_terminals).map(Symbol::to_string));
        table.push_row(head);

        for state in 0..self.states.len() {
            let mut row = vec![state.to_string()];
            row.extend(terminals.iter().map(|t| {
                self.action(state, t)
                    .map_or_else(String::new, |action| action.to_string())
            }));
            row.extend(non_terminals.iter().map(|nt| {
                self.goto(state, nt)
                    .map_or_else(String::new, |target| target.to_string())
            }));
            table.push_row(row);
        }
        table.to_string(" ")
    }

    /// The production a reduce action refers to
    pub fn production(&self, index: usize) -> &Production {
        &self.grammar.productions()[index]
    }
}

/// Writes an action into a cell, keeping the existing entry and recording a conflict if the
/// cell already holds a different action
fn install(
    actions: &mut HashMap<(usize, Symbol), Action>,
    conflicts: &mut Vec<String>,
    state: usize,
    symbol: Symbol,
    action: Action,
) {
    match actions.get(&(state, symbol.clone())) {
        None => {
            actions.insert((state, symbol), action);
        }
        Some(existing) if *existing == action => {}
        Some(existing) => {
            let kind = match (existing, &action) {
                (Action::Reduce(_), Action::Reduce(_)) => "Reduce/Reduce",
                _ => "Shift/Reduce",
            };
            conflicts.push(format!("{kind} in state {state} on {symbol}"));
        }
    }
}
