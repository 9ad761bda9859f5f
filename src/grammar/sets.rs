use crate::grammar::{Grammar, Symbol};
use std::collections::{HashMap, HashSet};

impl Grammar {
    /// Computes the FIRST set of every symbol of this grammar: the set of terminals that can
    /// begin a string derived from the symbol, plus `ε` if the symbol can derive the empty
    /// string. For a terminal `t`, `FIRST(t) = {t}`. The sets only ever grow during the
    /// iteration, and each is bounded by the terminal count, so the fixed point is reached.
    ///
    /// ```
    /// use grackle::grammar::{Grammar, Symbol};
    ///
    /// let grammar: Grammar = grackle::parser::grammar("
    ///     E -> E + T | T
    ///     T -> T * F | F
    ///     F -> ( E ) | id
    /// ").unwrap().try_into().unwrap();
    ///
    /// let first = grammar.first_sets();
    /// let expected = [Symbol::terminal("("), Symbol::terminal("id")].into_iter().collect();
    /// assert_eq!(first[&Symbol::non_terminal("E")], expected);
    /// ```
    pub fn first_sets(&self) -> HashMap<Symbol, HashSet<Symbol>> {
        let mut first: HashMap<Symbol, HashSet<Symbol>> = HashMap::new();
        for terminal in self.terminals() {
            first.insert(terminal.clone(), HashSet::from([terminal.clone()]));
        }
        for non_terminal in self.non_terminals() {
            first.insert(non_terminal.clone(), HashSet::new());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in self.productions() {
                let (mut addition, nullable) = self.sequence_first(production.right(), &first);
                if nullable {
                    addition.insert(Symbol::epsilon());
                }
                let entry = first
                    .get_mut(production.left())
                    .expect("every production symbol is declared");
                let before = entry.len();
                entry.extend(addition);
                if entry.len() > before {
                    changed = true;
                }
            }
        }
        first
    }

    /// Computes the FOLLOW set of every non-terminal of this grammar: the set of terminals that
    /// can appear immediately after the non-terminal in some derivation from the start symbol,
    /// with `$` standing for the end of the input. `ε` never appears in a FOLLOW set.
    ///
    /// ```
    /// use grackle::grammar::{Grammar, Symbol};
    ///
    /// let grammar: Grammar = grackle::parser::grammar("
    ///     E -> E + T | T
    ///     T -> T * F | F
    ///     F -> ( E ) | id
    /// ").unwrap().try_into().unwrap();
    ///
    /// let follow = grammar.follow_sets(&grammar.first_sets());
    /// let expected = [Symbol::end_of_input(), Symbol::terminal("+"), Symbol::terminal(")")]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(follow[&Symbol::non_terminal("E")], expected);
    /// ```
    pub fn follow_sets(
        &self,
        first: &HashMap<Symbol, HashSet<Symbol>>,
    ) -> HashMap<Symbol, HashSet<Symbol>> {
        let mut follow: HashMap<Symbol, HashSet<Symbol>> = self
            .non_terminals()
            .iter()
            .map(|nt| (nt.clone(), HashSet::new()))
            .collect();
        follow
            .get_mut(self.start())
            .expect("the start symbol is a declared non-terminal")
            .insert(Symbol::end_of_input());

        let mut changed = true;
        while changed {
            changed = false;
            for production in self.productions() {
                for (idx, symbol) in production.right().iter().enumerate() {
                    if !symbol.is_non_terminal() {
                        continue;
                    }
                    let beta = &production.right()[idx + 1..];
                    let (mut addition, nullable) = self.sequence_first(beta, first);
                    if nullable {
                        addition.extend(follow[production.left()].iter().cloned());
                    }
                    let entry = follow
                        .get_mut(symbol)
                        .expect("every production symbol is declared");
                    let before = entry.len();
                    entry.extend(addition);
                    if entry.len() > before {
                        changed = true;
                    }
                }
            }
        }
        follow
    }

    /// FIRST of a symbol sequence: the non-`ε` terminals that can begin a string derived from
    /// it, and whether the whole sequence can derive the empty string. The empty sequence is
    /// nullable with an empty FIRST set.
    pub(crate) fn sequence_first(
        &self,
        symbols: &[Symbol],
        first: &HashMap<Symbol, HashSet<Symbol>>,
    ) -> (HashSet<Symbol>, bool) {
        let mut result = HashSet::new();
        for symbol in symbols {
            let symbol_first = first
                .get(symbol)
                .expect("every production symbol is declared");
            result.extend(symbol_first.iter().filter(|s| !s.is_epsilon()).cloned());
            if !symbol_first.contains(&Symbol::epsilon()) {
                return (result, false);
            }
        }
        (result, true)
    }
}
