//! # Context-free grammars
//! The grammar module includes the [Symbol], [Production] and [Grammar] types that the
//! [FIRST/FOLLOW analysis](Grammar::first_sets) and the [LALR(1) machinery](crate::lr) operate
//! on. A grammar can be built directly from its parts with [Grammar::new], or parsed from a
//! text format with [crate::parser::grammar] followed by a `TryInto` conversion that checks the
//! invariants:
//!
//! ```
//! use grackle::grammar::Grammar;
//!
//! let grammar: Grammar = grackle::parser::grammar("
//!     ## arithmetic expressions
//!     E -> E + T | T
//!     T -> T * F | F
//!     F -> ( E ) | id
//! ").unwrap().try_into().unwrap();
//!
//! assert_eq!(grammar.start().name(), "E");
//! assert_eq!(grammar.productions().len(), 6);
//! assert_eq!(grammar.non_terminals().len(), 3);
//! ```
//!
//! ## Distinguished terminals
//! Two terminal names are reserved: `ε` ([Symbol::epsilon]) marks the empty string in FIRST
//! sets, and `$` ([Symbol::end_of_input]) is the end-of-input sentinel appended by the parser
//! driver and seeding FOLLOW of the start symbol. Neither may be declared as a user symbol, and
//! neither ever appears inside a production body: a production with an empty right-hand side
//! simply has an empty symbol sequence.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub mod parse;
mod sets;

pub use parse::GrammarParseError;

/// The name of the distinguished terminal marking the empty string
pub(crate) const EPSILON: &str = "ε";
/// The name of the distinguished terminal marking the end of the input
pub(crate) const END_OF_INPUT: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// A grammar symbol: a name together with a kind. Two symbols are equal if and only if both
/// their names and their kinds match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    kind: SymbolKind,
    name: Rc<str>,
}

impl Symbol {
    pub fn terminal(name: impl Into<Rc<str>>) -> Self {
        Self {
            kind: SymbolKind::Terminal,
            name: name.into(),
        }
    }

    pub fn non_terminal(name: impl Into<Rc<str>>) -> Self {
        Self {
            kind: SymbolKind::NonTerminal,
            name: name.into(),
        }
    }

    /// The distinguished terminal `ε` marking the empty string
    pub fn epsilon() -> Self {
        Self::terminal(EPSILON)
    }

    /// The distinguished terminal `$` marking the end of the input
    pub fn end_of_input() -> Self {
        Self::terminal(END_OF_INPUT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    pub fn is_non_terminal(&self) -> bool {
        self.kind == SymbolKind::NonTerminal
    }

    pub fn is_epsilon(&self) -> bool {
        self.kind == SymbolKind::Terminal && &*self.name == EPSILON
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == SymbolKind::Terminal && &*self.name == END_OF_INPUT
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A production rule: a non-terminal left-hand side and a (possibly empty) sequence of symbols
/// it produces. Equality is structural over both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    left: Symbol,
    right: Vec<Symbol>,
}

impl Production {
    pub fn new(left: Symbol, right: Vec<Symbol>) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &Symbol {
        &self.left
    }

    pub fn right(&self) -> &[Symbol] {
        self.right.as_slice()
    }

    /// Checks if this production produces the empty string
    pub fn is_empty(&self) -> bool {
        self.right.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        if self.right.is_empty() {
            write!(f, " {EPSILON}")?;
        }
        for symbol in &self.right {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// The start symbol is not among the declared non-terminals
    #[error("The start symbol is not among the non-terminals")]
    MissingStartSymbol,
    /// `ε` or `$` was declared as a user symbol
    #[error("'{0}' is reserved and cannot be declared as a grammar symbol")]
    ReservedSymbol(String),
    /// A declared terminal has non-terminal kind or the other way around
    #[error("Symbol '{0}' is declared with the wrong kind")]
    WrongSymbolKind(String),
    /// A production mentions a symbol that is neither a declared terminal nor non-terminal
    #[error("Symbol '{0}' is used in a production but not declared")]
    UndeclaredSymbol(String),
    /// The same production appears twice
    #[error("Production '{0}' is defined twice")]
    DuplicateProduction(String),
}

/// A context-free grammar: terminals, non-terminals, productions and a start symbol. The
/// constructor checks all invariants, so every existing [Grammar] is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    terminals: Vec<Symbol>,
    non_terminals: Vec<Symbol>,
    productions: Vec<Production>,
    start: Symbol,
}

impl Grammar {
    /// Builds a grammar after checking its invariants: the start symbol is a declared
    /// non-terminal, declared symbols have the declared kind and are not reserved, every symbol
    /// used in a production is declared, and no production appears twice. Production order is
    /// significant: it determines the numbering used by [LR states](crate::lr::LrAutomaton) and
    /// reduce actions.
    pub fn new(
        terminals: Vec<Symbol>,
        non_terminals: Vec<Symbol>,
        productions: Vec<Production>,
        start: Symbol,
    ) -> Result<Self, GrammarError> {
        use GrammarError::*;

        for terminal in &terminals {
            if terminal.is_epsilon() || terminal.is_end_of_input() {
                return Err(ReservedSymbol(terminal.name().to_string()));
            }
            if !terminal.is_terminal() {
                return Err(WrongSymbolKind(terminal.name().to_string()));
            }
        }
        for non_terminal in &non_terminals {
            if non_terminal.name() == EPSILON || non_terminal.name() == END_OF_INPUT {
                return Err(ReservedSymbol(non_terminal.name().to_string()));
            }
            if !non_terminal.is_non_terminal() {
                return Err(WrongSymbolKind(non_terminal.name().to_string()));
            }
        }

        if !non_terminals.contains(&start) {
            return Err(MissingStartSymbol);
        }

        let declared: HashSet<&Symbol> = terminals.iter().chain(&non_terminals).collect();
        let mut seen: HashSet<&Production> = HashSet::new();
        for production in &productions {
            if !declared.contains(production.left()) {
                return Err(UndeclaredSymbol(production.left().name().to_string()));
            }
            for symbol in production.right() {
                if !declared.contains(symbol) {
                    return Err(UndeclaredSymbol(symbol.name().to_string()));
                }
            }
            if !seen.insert(production) {
                return Err(DuplicateProduction(production.to_string()));
            }
        }

        Ok(Self {
            terminals,
            non_terminals,
            productions,
            start,
        })
    }

    /// Gets the terminals of this grammar
    pub fn terminals(&self) -> &[Symbol] {
        &self.terminals
    }

    /// Gets the non-terminals of this grammar
    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    /// Gets the productions of this grammar, in declaration order
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Gets the start symbol of this grammar
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// Iterates over the productions with the given left-hand side, with their indices
    pub fn productions_for<'a>(
        &'a self,
        left: &'a Symbol,
    ) -> impl Iterator<Item = (usize, &'a Production)> + 'a {
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.left() == left)
    }
}
