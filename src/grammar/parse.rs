use crate::grammar::{Grammar, GrammarError, Production, Symbol, END_OF_INPUT, EPSILON};
use crate::parser::ParsedGrammar;
use std::collections::HashSet;
use thiserror::Error;

/// The spelling of ε accepted in grammar files
const EPSILON_NAMES: [&str; 2] = [EPSILON, "eps"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarParseError<'a> {
    /// `ε`, `eps` or `$` was used as a rule's left-hand side
    #[error("'{0}' is reserved and cannot be the left-hand side of a rule")]
    ReservedRuleName(&'a str),
    /// `ε` appeared in a production body together with other symbols
    #[error("'ε' may only appear alone in a production body")]
    MisplacedEpsilon,
    /// The parsed grammar violates a grammar invariant
    #[error(transparent)]
    Invalid(#[from] GrammarError),
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar {
    type Error = GrammarParseError<'a>;

    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        use GrammarParseError::*;
        let ParsedGrammar { rules } = value;

        let mut non_terminal_names: Vec<&str> = Vec::new();
        for rule in &rules {
            if EPSILON_NAMES.contains(&rule.left) || rule.left == END_OF_INPUT {
                return Err(ReservedRuleName(rule.left));
            }
            if !non_terminal_names.contains(&rule.left) {
                non_terminal_names.push(rule.left);
            }
        }
        let lefts: HashSet<&str> = non_terminal_names.iter().copied().collect();

        // Everything that never appears on a left-hand side is a terminal, in order of first
        // occurrence
        let mut terminal_names: Vec<&str> = Vec::new();
        for rule in &rules {
            for alternative in &rule.alternatives {
                for &name in alternative {
                    if !lefts.contains(name)
                        && !EPSILON_NAMES.contains(&name)
                        && !terminal_names.contains(&name)
                    {
                        terminal_names.push(name);
                    }
                }
            }
        }

        let mut productions = Vec::new();
        for rule in &rules {
            let left = Symbol::non_terminal(rule.left);
            for alternative in &rule.alternatives {
                let is_epsilon = |name: &&str| EPSILON_NAMES.contains(name);
                let right = if alternative.iter().any(is_epsilon) {
                    if alternative.len() > 1 {
                        return Err(MisplacedEpsilon);
                    }
                    vec![]
                } else {
                    alternative
                        .iter()
                        .map(|&name| {
                            if lefts.contains(name) {
                                Symbol::non_terminal(name)
                            } else {
                                Symbol::terminal(name)
                            }
                        })
                        .collect()
                };
                productions.push(Production::new(left.clone(), right));
            }
        }

        // The nom layer guarantees at least one rule, but a hand-built ParsedGrammar may not
        let start = match non_terminal_names.first() {
            Some(&name) => Symbol::non_terminal(name),
            None => return Err(GrammarError::MissingStartSymbol.into()),
        };
        let terminals = terminal_names.into_iter().map(Symbol::terminal).collect();
        let non_terminals = non_terminal_names
            .into_iter()
            .map(Symbol::non_terminal)
            .collect();

        Ok(Grammar::new(terminals, non_terminals, productions, start)?)
    }
}
