//! # Nondeterministic Finite Automaton
//! The NFA module includes the [Nfa] struct which represents a
//! [Nondeterministic finite automaton](https://en.wikipedia.org/wiki/Nondeterministic_finite_automaton)
//! with ε-moves. NFAs are produced by [converting a regular expression](crate::regex::Regex::to_nfa)
//! with Thompson's construction; they are built once and never mutated afterwards.
//!
//! ## Checking word acceptance
//! The most basic operation is to check if a list of elements is accepted by the automaton or
//! not, with [Nfa::accepts]. The elements of the alphabet are grapheme clusters when the NFA
//! comes from a regular expression, so the convenience function [Nfa::accepts_graphemes] takes a
//! `&str` and splits it into single grapheme clusters before checking.
//!
//! Internally, a [NfaEvaluator] tracks the set of states the automaton is in during the
//! evaluation of a string, including every state reachable by ε-moves. To step through a string
//! manually, see [Nfa::evaluator].
//!
//! ```
//! use grackle::regex::Regex;
//!
//! let nfa = Regex::compile("(ab)+").unwrap().to_nfa();
//! assert!(nfa.accepts(&["a", "b", "a", "b"]));
//! assert!(nfa.accepts_graphemes("ab"));
//! assert!(!nfa.accepts_graphemes("aba"));
//! ```
//!
//! ## Conversion to a DFA
//! [Nfa::to_dfa] uses the subset construction: every state of the resulting DFA corresponds to
//! a set of NFA states, starting from the ε-closure of the initial state. Since each state of
//! the DFA can either include or exclude each state of the NFA, there are up to `2^n` states in
//! the full construction, but only the subsets actually reachable on some input are built. A
//! symbol on which the subset has no outgoing transition at all produces *no* DFA transition
//! rather than a trap state, so the resulting [Dfa](crate::dfa::Dfa) is partial.

use crate::dfa::{Dfa, DfaState};
pub use eval::NfaEvaluator;
use std::collections::{HashMap, HashSet};
use std::mem;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

pub mod eval;

/// A non-deterministic finite automaton, denoted by its alphabet, states and the initial state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<NfaState>,
    pub(crate) initial_state: usize,
}

/// A state in an NFA, which consists of its name, if it is the initial state or not, if it is
/// accepting or not, any amount of epsilon transitions and any amount of transitions for each
/// element of the alphabet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) name: Rc<str>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl NfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is the initial state
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets a list of transitions, as sets of state indices for each element of the alphabet, in
    /// the alphabet's ordering
    pub fn transitions(&self) -> &[Vec<usize>] {
        self.transitions.as_slice()
    }

    /// Gets the epsilon transitions as a set of state indices
    pub fn epsilon_transitions(&self) -> &[usize] {
        self.epsilon_transitions.as_slice()
    }
}

impl Nfa {
    /// Converts this NFA to a DFA using the subset construction. The names of the states in the
    /// resulting DFA are assigned sequentially from 0 in order of discovery, and the state named
    /// 0 is guaranteed to be the initial state (the ε-closure of this NFA's initial state). Each
    /// DFA state records the set of NFA states it represents, and is accepting if any of them is
    /// accepting. Symbols on which a subset has no successor produce no transition at all.
    pub fn to_dfa(&self) -> Dfa {
        // Generator for sequential numbers for new states
        let mut gen = 0usize..;
        // Maps the (sorted) set of NFA states to its DFA state number
        let mut map: HashMap<Vec<usize>, usize> = HashMap::new();
        // DFA state numbers that are accepting
        let mut accepting = HashSet::new();
        // Evaluators not yet expanded
        let mut to_explore = vec![self.evaluator()];
        // Transition rows for new states, keyed by NFA-state set
        let mut transitions: HashMap<Vec<usize>, Vec<Option<usize>>> = HashMap::new();

        {
            // Pre-work, add the initial closure to the tables
            let key = Self::set_to_vec(to_explore[0].current_states_idx());
            let n = gen.next().unwrap(); // 0
            map.insert(key, n);
            if to_explore[0].is_accepting() {
                accepting.insert(n);
            }
        }

        while let Some(eval) = to_explore.pop() {
            let mut tr = Vec::with_capacity(self.alphabet.len());
            for new_evaluator in eval.step_all() {
                if new_evaluator.current_states_idx().is_empty() {
                    // Dead on this symbol, no transition is installed
                    tr.push(None);
                    continue;
                }
                let is_accepting = new_evaluator.is_accepting();
                let key = Self::set_to_vec(new_evaluator.current_states_idx());
                if !map.contains_key(&key) {
                    to_explore.push(new_evaluator);
                }
                let x = *map.entry(key).or_insert_with(|| gen.next().unwrap());
                tr.push(Some(x));
                if is_accepting {
                    accepting.insert(x);
                }
            }
            transitions.insert(Self::set_to_vec(eval.current_states_idx()), tr);
        }

        let sorted_keys = {
            let mut vec = map.iter().collect::<Vec<_>>();
            vec.sort_by_key(|(_, &n)| n);
            vec
        };

        let states = sorted_keys
            .into_iter()
            .map(|(key, &n)| DfaState {
                name: Rc::from(n.to_string()),
                nfa_states: key.clone(),
                initial: n == 0,
                accepting: accepting.contains(&n),
                transitions: transitions.remove(key).unwrap(),
            })
            .collect();

        Dfa {
            alphabet: self.alphabet.clone(), // Clone is cheap: alphabet is Rc<_>
            states,
            initial_state: 0,
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
    pub fn evaluator(&self) -> NfaEvaluator<'_> {
        self.into()
    }

    /// Extends a set of states with every state reachable from it using only ε-transitions
    pub(crate) fn closure_into(&self, states: &mut HashSet<usize>) {
        let mut new = states.iter().copied().collect::<Vec<_>>();
        while !new.is_empty() {
            let old_new = mem::take(&mut new);
            for state in old_new {
                for &eps_target in &self.states[state].epsilon_transitions {
                    if states.insert(eps_target) {
                        new.push(eps_target);
                    }
                }
            }
        }
    }

    /// Converts a HashSet (which is not hashable) to a Vec (which is hashable) in a
    /// deterministic way
    fn set_to_vec<T: Clone + Ord>(set: &HashSet<T>) -> Vec<T> {
        let mut vec = set.iter().cloned().collect::<Vec<_>>();
        vec.sort();
        vec
    }

    /// Gets the alphabet of this NFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this NFA
    pub fn initial_state(&self) -> &NfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this NFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
