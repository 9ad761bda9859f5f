use crate::nfa::Nfa;
use std::collections::{HashMap, HashSet};
use std::iter;

/// Tracks the set of states an [Nfa] is in while evaluating a string, ε-closure included.
#[derive(Clone, Debug)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    rev_map: HashMap<&'a str, usize>,
    current_states: HashSet<usize>,
}

impl<'a> NfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_states
            .iter()
            .any(|&s| self.nfa.states[s].accepting)
    }

    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current_states
    }

    /// Steps one clone of this evaluator for each element of the alphabet, in the alphabet's
    /// ordering
    pub fn step_all(&self) -> Vec<NfaEvaluator<'a>> {
        iter::repeat(self.clone())
            .zip(self.nfa.alphabet.iter())
            .map(|(mut eval, elem)| {
                eval.step(elem);
                eval
            })
            .collect()
    }

    /// Steps this evaluator on one element. On an element not part of the alphabet the state
    /// set becomes empty, and stays empty for the rest of the evaluation.
    pub fn step(&mut self, elem: &str) -> Option<()> {
        let &idx = match self.rev_map.get(elem) {
            Some(idx) => idx,
            None => {
                self.current_states.clear();
                return None;
            }
        };
        self.current_states = self
            .current_states
            .iter()
            .flat_map(|&state| self.nfa.states[state].transitions[idx].iter().copied())
            .collect();
        self.nfa.closure_into(&mut self.current_states);
        Some(())
    }

    pub fn step_multiple(&mut self, elems: &[&str]) -> Option<()> {
        elems.iter().try_for_each(|e| self.step(e))
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(value: &'a Nfa) -> Self {
        let rev_map = value
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, c)| (c as &str, idx))
            .collect();
        let mut current_states = HashSet::from([value.initial_state]);
        value.closure_into(&mut current_states);
        Self {
            nfa: value,
            rev_map,
            current_states,
        }
    }
}
