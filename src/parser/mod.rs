//! # Grammar parser
//! This module contains the parser for the text format for context-free grammars.
//!
//! ## Format
//! The file describing a grammar should be a UTF-8 encoded file consisting of one rule per
//! line. A rule is a symbol name, an arrow (`->` or `→`), and one or more alternatives
//! separated by `|`, where each alternative is a whitespace-separated list of symbol names:
//!
//! ```text
//! # arithmetic expressions
//! E -> E + T | T
//! T -> T * F | F
//! F -> ( E ) | id
//! ```
//!
//! Symbol names may be any whitespace-free text not containing `#` or `|` and distinct from the
//! arrows. Every name appearing on the left-hand side of some rule is a non-terminal, all other
//! names are terminals. The start symbol is the left-hand side of the first rule. The body `ε`
//! (or `eps`) on its own denotes the empty production; it may not be mixed with other symbols,
//! and `ε`, `eps` and `$` may not be used as grammar symbols. Comments are started by `#` and
//! run to the end of the line; lines containing only whitespace or comments are ignored.
//!
//! Parsing is done in two steps: [grammar] parses the text into a [ParsedGrammar] without
//! checking the grammar's invariants, and a `TryInto` conversion to
//! [Grammar](crate::grammar::Grammar) validates it (see
//! [GrammarParseError](crate::grammar::GrammarParseError)).

mod grammar;

use nom::{combinator::all_consuming, error::Error, Finish};

/// A grammar as it is written, before any invariants are checked
#[derive(Debug)]
pub struct ParsedGrammar<'a> {
    pub rules: Vec<ParsedRule<'a>>,
}

/// One rule line: a left-hand side and its alternatives, each a list of raw symbol names
#[derive(Debug)]
pub struct ParsedRule<'a> {
    pub left: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// Parses a grammar according to the format above. The whole string must be parsable, otherwise
/// this function errors. Note that the result is a [ParsedGrammar], which is not guaranteed to
/// be a valid [Grammar](crate::grammar::Grammar). Use [TryInto::try_into] to convert a
/// [ParsedGrammar] to a [Grammar](crate::grammar::Grammar).
pub fn grammar(input: &str) -> Result<ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}
