//!# grackle
//!
//! `grackle` is a Rust library for building the front end of a compiler from declarative
//! descriptions: regular expressions become DFA-based tokenizers, and context-free grammars
//! become LALR(1) parse tables, using the classical construction pipeline throughout.
//!
//! ## Usage
//!
//! ```rust
//! use grackle::grammar::Grammar;
//! use grackle::lr::Lalr1Table;
//! use grackle::regex::Regex;
//! use grackle::tokenizer::Token;
//!
//! fn main() {
//!     // Regular expressions compile through Thompson's construction, the subset
//!     // construction and DFA minimization
//!     let dfa = Regex::compile("a(b|c)*").unwrap().to_nfa().to_dfa().minimize();
//!     assert!(dfa.accepts_graphemes("abccb"));
//!     assert!(!dfa.accepts_graphemes("ad"));
//!
//!     // Grammars are written in a small text format; every left-hand side is a
//!     // non-terminal and the first rule names the start symbol
//!     let grammar: Grammar = grackle::parser::grammar("
//!         E -> E + T | T
//!         T -> T * F | F
//!         F -> ( E ) | id
//!     ").unwrap().try_into().unwrap();
//!
//!     // The LALR(1) table is built over the canonical LR(1) collection; conflicts
//!     // are recorded rather than resolved, so a clean grammar has none
//!     let table = Lalr1Table::new(&grammar);
//!     assert!(table.conflicts().is_empty());
//!
//!     let tokens = ["id", "+", "id", "*", "id"].map(|t| Token::new(t, t));
//!     assert!(table.accepts(&tokens));
//!     assert!(!table.accepts(&tokens[..2]));
//! }
//! ```
//!
//! ## Pipeline
//!
//! The lexing side: a pattern string is [compiled](regex::Regex::compile) into postfix form
//! (explicit concatenation insertion followed by Shunting-Yard), converted
//! [to an NFA](regex::Regex::to_nfa) with Thompson's construction, [to a
//! DFA](nfa::Nfa::to_dfa) with the subset construction, and [minimized](dfa::Dfa::minimize)
//! with the table-filling algorithm. A [Tokenizer](tokenizer::Tokenizer) runs any number of
//! such DFAs as prioritized rules with longest-match semantics.
//!
//! The parsing side: a [Grammar](grammar::Grammar) (hand-built or parsed from
//! [text](parser::grammar)) provides [FIRST/FOLLOW analysis](grammar::Grammar::first_sets),
//! the [canonical LR(1) collection](lr::LrAutomaton) is built over the augmented grammar, and
//! [core merging](lr::Lalr1Table) yields the LALR(1) ACTION/GOTO tables driving the
//! [shift/reduce loop](lr::Lalr1Table::accepts).
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Compiling regular expressions](regex::Regex::compile) over the operators
//!   `|`, `*`, `+`, `?` and parentheses
//! * [Converting regular expressions to NFAs](regex::Regex::to_nfa)
//! * [Converting NFAs to DFAs](nfa::Nfa::to_dfa)
//! * [Minimizing DFAs](dfa::Dfa::minimize)
//! * [Step-by-step evaluation](dfa::Dfa::evaluator) of strings against automata
//! * [Longest-match tokenization](tokenizer::Tokenizer::tokenize) over prioritized rules
//! * [Parsing](parser::grammar) and validating context-free grammars from a text format
//! * [FIRST](grammar::Grammar::first_sets) and [FOLLOW](grammar::Grammar::follow_sets) sets
//! * [Building the canonical LR(1) collection](lr::LrAutomaton::new)
//! * [Building LALR(1) tables](lr::Lalr1Table::new) with
//!   [conflict reporting](lr::Lalr1Table::conflicts)
//! * [Accept/reject parsing](lr::Lalr1Table::accepts) of token sequences

pub mod dfa;
pub mod grammar;
pub mod lr;
pub mod nfa;
pub mod parser;
pub mod regex;
mod table;
pub mod tokenizer;
mod util;

#[cfg(test)]
mod tests;
