//! # Deterministic Finite Automaton
//! The DFA module includes the [Dfa] struct which represents a
//! [Deterministic finite automaton](https://en.wikipedia.org/wiki/Deterministic_finite_automaton).
//! DFAs are produced by [converting an NFA](crate::nfa::Nfa::to_dfa) with the subset
//! construction, and are built once and never mutated afterwards.
//!
//! A DFA here is *partial*: a state may have no transition at all on some element of the
//! alphabet, in which case the evaluation is dead and no suffix can make it accept. The subset
//! construction produces such gaps instead of materializing a trap state.
//!
//! ## Checking word acceptance
//! [Dfa::accepts] checks a list of alphabet elements, [Dfa::accepts_graphemes] splits a `&str`
//! into grapheme clusters first. Internally a [DfaEvaluator] steps through the states one
//! element at a time; [Dfa::evaluator] gives direct access to it, which is what the
//! [tokenizer](crate::tokenizer) uses to find the longest match:
//!
//! ```
//! use grackle::regex::Regex;
//!
//! let dfa = Regex::compile("ab*").unwrap().to_nfa().to_dfa();
//! let mut eval = dfa.evaluator();
//! eval.step("a");
//! assert!(eval.is_accepting());
//! eval.step("b");
//! assert!(eval.is_accepting());
//! eval.step("a");
//! assert!(eval.is_dead()); // no transition on "a" here, nothing can recover
//! ```
//!
//! ## Minimization
//! [Dfa::minimize] produces an equivalent DFA with the least possible number of states, using
//! the table-filling algorithm: every unordered pair of states starts out unmarked, pairs where
//! exactly one state is accepting are marked, and a pair becomes marked when some element leads
//! exactly one of the two states to a dead end or leads the pair into an already marked pair.
//! When no more pairs can be marked, unmarked pairs are non-distinguishable, and the equivalence
//! classes (computed by union-find) become the states of the minimized DFA.
//!
//! ```
//! use grackle::regex::Regex;
//!
//! let dfa = Regex::compile("(a|b)*abb").unwrap().to_nfa().to_dfa();
//! let minimized = dfa.minimize();
//! assert_eq!(minimized.states().len(), 4);
//! assert!(minimized.accepts_graphemes("aabb"));
//! assert!(!minimized.accepts_graphemes("abab"));
//! ```

use crate::table::Table;
use crate::util::UnionFind;
pub use eval::DfaEvaluator;
use std::collections::HashMap;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

pub mod eval;

/// A [Deterministic finite automaton](https://en.wikipedia.org/wiki/Deterministic_finite_automaton),
/// defined by its *alphabet*, a *set of states*, one of the states being its *initial state*, a
/// subset of its states being *accepting states*, and a partial *transition function* from each
/// state upon seeing each element of the alphabet. See the
/// [module-level documentation](crate::dfa) for more info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

/// A state in a DFA, which consists of its name, the set of NFA states it was built from, if it
/// is the initial state or not, if it is accepting or not, and an optional transition for each
/// element of the alphabet (`None` meaning the evaluation dies on that element)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) nfa_states: Vec<usize>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<Option<usize>>,
}

impl DfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the indices of the NFA states this state represents. For a minimized DFA, this is
    /// the union over all merged states.
    pub fn nfa_states(&self) -> &[usize] {
        self.nfa_states.as_slice()
    }

    /// Checks if this state is the initial state
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets a list of transitions, as optional state indices for each element of the alphabet,
    /// in the alphabet's ordering
    pub fn transitions(&self) -> &[Option<usize>] {
        self.transitions.as_slice()
    }
}

impl Dfa {
    /// Produces the unique (up to state naming) equivalent DFA with the least possible number of
    /// states, by marking distinguishable state pairs to a fixed point and merging the classes
    /// of the remaining non-distinguishable pairs. A DFA with zero or one states is returned
    /// unchanged. States of the minimized DFA are ordered by the smallest member of their class,
    /// each named after that member, so the result is deterministic.
    pub fn minimize(&self) -> Dfa {
        if self.states.len() <= 1 {
            return self.clone();
        }

        let n = self.states.len();
        // marked[p][q] for p < q: the pair is known distinguishable
        let mut marked = vec![vec![false; n]; n];
        for p in 0..n {
            for q in p + 1..n {
                marked[p][q] = self.states[p].accepting != self.states[q].accepting;
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for p in 0..n {
                for q in p + 1..n {
                    if marked[p][q] {
                        continue;
                    }
                    let distinguishable = (0..self.alphabet.len()).any(|c| {
                        match (self.states[p].transitions[c], self.states[q].transitions[c]) {
                            (None, None) => false,
                            (Some(pt), Some(qt)) => {
                                pt != qt && marked[pt.min(qt)][pt.max(qt)]
                            }
                            // Exactly one side is dead on this element
                            _ => true,
                        }
                    });
                    if distinguishable {
                        marked[p][q] = true;
                        changed = true;
                    }
                }
            }
        }

        // The unmarked-pair relation is an equivalence, union-find gives its classes
        let mut classes = UnionFind::new(n);
        for p in 0..n {
            for q in p + 1..n {
                if !marked[p][q] {
                    classes.union(p, q);
                }
            }
        }

        // Class ids in order of smallest member (the union-find root)
        let mut class_ids: HashMap<usize, usize> = HashMap::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        for state in 0..n {
            let root = classes.find(state);
            let class = match class_ids.get(&root) {
                Some(&class) => class,
                None => {
                    let class = members.len();
                    class_ids.insert(root, class);
                    members.push(Vec::new());
                    class
                }
            };
            members[class].push(state);
        }
        let class_of: Vec<usize> = (0..n).map(|s| class_ids[&classes.find(s)]).collect();

        // All members of a class have equivalent outgoing behaviour, so the representative's
        // transition row stands in for the whole class
        let mut states = members
            .iter()
            .map(|class_members| {
                let representative = class_members[0];
                let mut nfa_states = class_members
                    .iter()
                    .flat_map(|&m| self.states[m].nfa_states.iter().copied())
                    .collect::<Vec<_>>();
                nfa_states.sort_unstable();
                nfa_states.dedup();
                DfaState {
                    name: self.states[representative].name.clone(),
                    nfa_states,
                    initial: false,
                    accepting: class_members.iter().any(|&m| self.states[m].accepting),
                    transitions: self.states[representative]
                        .transitions
                        .iter()
                        .map(|tr| tr.map(|target| class_of[target]))
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        let initial_state = class_of[self.initial_state];
        states[initial_state].initial = true;

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state,
        }
    }

    /// Checks if this automaton accepts the given string. This is equivalent to getting the
    /// evaluator, stepping it multiple times and checking if it is accepting
    pub fn accepts(&self, string: &[&str]) -> bool {
        let mut eval = self.evaluator();
        eval.step_multiple(string);
        eval.is_accepting()
    }

    /// Checks if this automaton accepts the given string, where every grapheme cluster of the
    /// string is considered one element of the alphabet
    pub fn accepts_graphemes(&self, string: &str) -> bool {
        let graphemes = string.graphemes(true).collect::<Vec<_>>();
        self.accepts(&graphemes)
    }

    /// Gets an evaluator, which is a struct that is used to evaluate strings with the automaton
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Generates a transition table of this DFA suitable for printing. Dead transitions are
    /// written as `-`.
    pub fn to_table(&self) -> String {
        let mut table = Table::default();

        let mut head = vec![String::new(), String::new(), String::new()];
        head.extend(self.alphabet.iter().map(|s| s.to_string()));
        table.push_row(head);

        for state in &self.states {
            let mut row = vec![
                if state.initial { "→" } else { "" }.to_string(),
                if state.accepting { "*" } else { "" }.to_string(),
                state.name.to_string(),
            ];
            row.extend(state.transitions.iter().map(|tr| match tr {
                Some(target) => self.states[*target].name.to_string(),
                None => "-".to_string(),
            }));
            table.push_row(row);
        }
        table.to_string(" ")
    }

    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this DFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
