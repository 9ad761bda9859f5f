use crate::grammar::Symbol;
use crate::lr::{Action, Lalr1Table};
use crate::tokenizer::Token;

impl Lalr1Table {
    /// Runs the shift/reduce loop over a token sequence and tells whether the sequence is a
    /// sentence of the grammar. Token types are matched against the grammar's terminal names,
    /// and a `$` sentinel is appended internally.
    ///
    /// The driver never fails: any configuration without a table entry (including tokens whose
    /// type is no terminal of the grammar at all) simply rejects. Note that on a table with
    /// [conflicts](Lalr1Table::conflicts) the answer reflects the first-writer-wins cells, not
    /// necessarily the grammar.
    pub fn accepts(&self, tokens: &[Token]) -> bool {
        let input = tokens
            .iter()
            .map(|token| Symbol::terminal(token.token_type.clone()))
            .chain([Symbol::end_of_input()])
            .collect::<Vec<_>>();

        let mut stack = vec![0usize];
        let mut ip = 0;

        loop {
            let state = match stack.last() {
                Some(&state) => state,
                None => return false,
            };
            let symbol = match input.get(ip) {
                Some(symbol) => symbol,
                None => return false,
            };

            match self.actions.get(&(state, symbol.clone())) {
                None => return false,
                Some(Action::Shift(target)) => {
                    stack.push(*target);
                    ip += 1;
                }
                Some(Action::Reduce(production)) => {
                    let production = &self.grammar.productions()[*production];
                    // Pops one state per right-hand side symbol, none for an ε-production
                    if stack.len() <= production.right().len() {
                        return false;
                    }
                    stack.truncate(stack.len() - production.right().len());
                    let top = match stack.last() {
                        Some(&top) => top,
                        None => return false,
                    };
                    match self.gotos.get(&(top, production.left().clone())) {
                        Some(&target) => stack.push(target),
                        None => return false,
                    }
                }
                Some(Action::Accept) => return true,
            }
        }
    }
}
