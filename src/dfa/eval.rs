use crate::dfa::{Dfa, DfaState};
use std::collections::HashMap;

/// Tracks the current state of a [Dfa] while evaluating a string. The evaluator turns *dead*
/// when it sees an element it has no transition for (or one outside the alphabet entirely), and
/// stays dead for the rest of the evaluation.
#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    rev_map: HashMap<&'a str, usize>,
    current_state: usize,
    dead: bool,
}

impl<'a> DfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_state().map_or(false, DfaState::is_accepting)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn current_state(&self) -> Option<&DfaState> {
        if self.dead {
            None
        } else {
            Some(&self.dfa.states[self.current_state])
        }
    }

    /// Steps this evaluator on one element, giving the new state, or `None` if the evaluator is
    /// (or just became) dead
    pub fn step(&mut self, elem: &str) -> Option<&DfaState> {
        if self.dead {
            return None;
        }

        let next = self
            .rev_map
            .get(elem)
            .and_then(|&idx| self.dfa.states[self.current_state].transitions[idx]);
        match next {
            None => {
                self.dead = true;
                None
            }
            Some(idx) => {
                self.current_state = idx;
                Some(&self.dfa.states[idx])
            }
        }
    }

    /// Steps this evaluator on each element in turn, giving the final state, or `None` if the
    /// evaluator died along the way
    pub fn step_multiple(&mut self, elems: &[&str]) -> Option<&DfaState> {
        match elems.iter().try_for_each(|e| self.step(e).map(|_| ())) {
            None => None,
            Some(_) => Some(&self.dfa.states[self.current_state]),
        }
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(value: &'a Dfa) -> Self {
        let rev_map = value
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, c)| (c as &str, idx))
            .collect();
        Self {
            dfa: value,
            rev_map,
            current_state: value.initial_state,
            dead: false,
        }
    }
}
