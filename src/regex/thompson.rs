use crate::nfa::{Nfa, NfaState};
use crate::regex::{Regex, RegexToken};
use std::collections::HashMap;
use std::rc::Rc;

/// A partial NFA on the construction stack. `accept` is the fragment's single accepting state
/// until a combinator splices it into a larger fragment.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: usize,
    accept: usize,
}

/// Thompson's construction: scans the postfix form left to right, combining fragments from a
/// stack. All states live in one arena, named sequentially in order of creation. The arity of
/// the postfix form is checked at compile time, so the stack operations here cannot fail.
pub(crate) fn build(regex: &Regex) -> Nfa {
    let mut states: Vec<NfaState> = Vec::new();
    let mut stack: Vec<Fragment> = Vec::new();

    // Maps each operand grapheme to its index in the alphabet, in order of first occurrence
    let mut grapheme_map: HashMap<Rc<str>, usize> = HashMap::new();

    for unit in &regex.postfix {
        match unit {
            RegexToken::Operand(g) => {
                let next_idx = grapheme_map.len();
                let gidx = *grapheme_map.entry(g.clone()).or_insert(next_idx);
                let start = new_state(&mut states, false);
                let accept = new_state(&mut states, true);
                // If the operand has index 2, the transition table becomes {{}, {}, {accept}}
                let mut transitions = vec![vec![]; gidx];
                transitions.push(vec![accept]);
                states[start].transitions = transitions;
                stack.push(Fragment { start, accept });
            }
            RegexToken::Concat => {
                let b = pop(&mut stack);
                let a = pop(&mut stack);
                states[a.accept].epsilon_transitions.push(b.start);
                states[a.accept].accepting = false;
                stack.push(Fragment {
                    start: a.start,
                    accept: b.accept,
                });
            }
            RegexToken::Union => {
                let b = pop(&mut stack);
                let a = pop(&mut stack);
                let start = new_state(&mut states, false);
                let accept = new_state(&mut states, true);
                states[start].epsilon_transitions = vec![a.start, b.start];
                states[a.accept].epsilon_transitions.push(accept);
                states[a.accept].accepting = false;
                states[b.accept].epsilon_transitions.push(accept);
                states[b.accept].accepting = false;
                stack.push(Fragment { start, accept });
            }
            RegexToken::Star => {
                let a = pop(&mut stack);
                let start = new_state(&mut states, false);
                let accept = new_state(&mut states, true);
                states[start].epsilon_transitions = vec![a.start, accept];
                states[a.accept].epsilon_transitions.extend([a.start, accept]);
                states[a.accept].accepting = false;
                stack.push(Fragment { start, accept });
            }
            RegexToken::Plus => {
                let a = pop(&mut stack);
                let start = new_state(&mut states, false);
                let accept = new_state(&mut states, true);
                states[start].epsilon_transitions = vec![a.start];
                states[a.accept].epsilon_transitions.extend([a.start, accept]);
                states[a.accept].accepting = false;
                stack.push(Fragment { start, accept });
            }
            RegexToken::Optional => {
                let a = pop(&mut stack);
                let start = new_state(&mut states, false);
                let accept = new_state(&mut states, true);
                states[start].epsilon_transitions = vec![a.start, accept];
                states[a.accept].epsilon_transitions.push(accept);
                states[a.accept].accepting = false;
                stack.push(Fragment { start, accept });
            }
            RegexToken::LeftParen | RegexToken::RightParen => {
                unreachable!("parentheses do not survive the postfix conversion")
            }
        }
    }

    let fragment = pop(&mut stack);
    debug_assert!(stack.is_empty(), "arity check leaves exactly one fragment");
    states[fragment.start].initial = true;

    // Transition tables were built against a growing alphabet, extend them all to full width
    states
        .iter_mut()
        .for_each(|s| s.transitions.resize(grapheme_map.len(), vec![]));

    let alphabet = {
        let mut sorted_map = grapheme_map.into_iter().collect::<Vec<_>>();
        sorted_map.sort_by_key(|(_, i)| *i);
        sorted_map.into_iter().map(|(g, _)| g).collect()
    };

    Nfa {
        alphabet,
        states,
        initial_state: fragment.start,
    }
}

fn new_state(states: &mut Vec<NfaState>, accepting: bool) -> usize {
    let idx = states.len();
    states.push(NfaState {
        name: Rc::from(idx.to_string()),
        initial: false,
        accepting,
        epsilon_transitions: vec![],
        transitions: vec![],
    });
    idx
}

fn pop(stack: &mut Vec<Fragment>) -> Fragment {
    stack
        .pop()
        .expect("arity-checked postfix never underflows the fragment stack")
}
