//! # Regular expressions
//! Grackle implements the mathematical core of regular expressions, which is a subset of the
//! regexes commonly found for pattern matching in programming languages.
//!
//! ## Syntax
//! A regular expression is written as a UTF-8 string. Each unicode extended grapheme cluster is
//! considered one character (but no normalization is used). There are seven reserved characters:
//! `(`, `)`, `|`, `*`, `+` and `?` are operators, and parenthesis is used for grouping. Every
//! other character is an operand matching itself. Sequencing is done by writing characters next
//! to each other, `|` denotes alternation, `*`/`+` are Kleene star/plus (zero or more/one or
//! more) and `?` makes the preceding expression optional. There is no escape mechanism: a
//! pattern that needs to match a reserved character literally has to be rewritten by whatever
//! produces it.
//!
//! Here are some examples:
//! * `(ab)+` matches `ab`, `abab`, `ababab`, ...
//! * `(ab)*` matches the empty string, `ab`, `abab`, `ababab`, ...
//! * `0*1(0?)` matches `1`, `10`, `0001` and all other strings containing the character `1` once
//!
//! ## Compilation
//! [Regex::compile] turns the surface string into postfix form in two classical steps: an
//! explicit concatenation operator is inserted between adjacent units, and the result is run
//! through the Shunting-Yard algorithm (precedence `|` < concatenation < `*`/`+`/`?`, all
//! left-associative). Mismatched parentheses are reported as
//! [UnbalancedParentheses](RegexError::UnbalancedParentheses), and a postfix sequence that would
//! not reduce to exactly one automaton (such as `|a` or the empty pattern) as
//! [MalformedRegex](RegexError::MalformedRegex). A successfully compiled [Regex] always converts
//! to an NFA.
//!
//! ## Operations
//! The only operation on a compiled regex is converting it to an NFA with [Regex::to_nfa], using
//! Thompson's construction. From there you can evaluate strings directly, convert the NFA
//! [to a DFA](crate::nfa::Nfa::to_dfa), [minimize](crate::dfa::Dfa::minimize) that DFA, or hand
//! it to the [tokenizer](crate::tokenizer) as a token rule.
//!
//! ```
//! use grackle::regex::Regex;
//!
//! let regex = Regex::compile("a(b|c)*").unwrap();
//! let dfa = regex.to_nfa().to_dfa();
//! assert!(dfa.accepts_graphemes("abccb"));
//! assert!(!dfa.accepts_graphemes("ad"));
//! ```

use crate::nfa::Nfa;
use std::rc::Rc;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

mod thompson;

/// A compiled regular expression, held in postfix form and ready for conversion to an NFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub(crate) postfix: Vec<RegexToken>,
}

/// One unit of a regular expression. Operands are single grapheme clusters; the concatenation
/// operator never appears in source text, it is inserted by the preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexToken {
    Operand(Rc<str>),
    Union,
    Concat,
    Star,
    Plus,
    Optional,
    LeftParen,
    RightParen,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexError {
    /// The pattern contains a `(` without a matching `)`, or the other way around
    #[error("Unmatched '(' or ')' in pattern")]
    UnbalancedParentheses,
    /// The pattern does not describe exactly one expression, such as `|a`, `*` or the empty
    /// pattern
    #[error("Pattern does not reduce to a single expression")]
    MalformedRegex,
}

impl Regex {
    /// Compiles a pattern into postfix form. The pattern is scanned into operand and operator
    /// units, explicit concatenation is inserted, and the units are reordered with the
    /// Shunting-Yard algorithm. The compiled form is verified to reduce to exactly one
    /// expression, so [Regex::to_nfa] cannot fail.
    ///
    /// ```
    /// use grackle::regex::{Regex, RegexError};
    ///
    /// assert!(Regex::compile("(ab)+c?").is_ok());
    /// assert_eq!(Regex::compile("(a|b").unwrap_err(), RegexError::UnbalancedParentheses);
    /// assert_eq!(Regex::compile("*a").unwrap_err(), RegexError::MalformedRegex);
    /// ```
    pub fn compile(pattern: &str) -> Result<Self, RegexError> {
        let units = scan(pattern);
        let units = insert_concatenation(units);
        let postfix = to_postfix(units)?;
        check_arity(&postfix)?;
        Ok(Self { postfix })
    }

    /// Converts this regular expression to an NFA using Thompson's construction. The states of
    /// the resulting NFA are named sequentially in order of creation, and its alphabet consists
    /// of exactly the operands appearing in the pattern, in order of first occurrence.
    pub fn to_nfa(&self) -> Nfa {
        thompson::build(self)
    }

    /// The compiled postfix form of this regular expression.
    pub fn postfix(&self) -> &[RegexToken] {
        &self.postfix
    }
}

fn scan(pattern: &str) -> Vec<RegexToken> {
    pattern
        .graphemes(true)
        .map(|g| match g {
            "|" => RegexToken::Union,
            "*" => RegexToken::Star,
            "+" => RegexToken::Plus,
            "?" => RegexToken::Optional,
            "(" => RegexToken::LeftParen,
            ")" => RegexToken::RightParen,
            operand => RegexToken::Operand(Rc::from(operand)),
        })
        .collect()
}

/// Inserts the explicit concatenation operator between two adjacent units `c1 c2` whenever
/// `c1` can end an expression (operand, `)`, `*`, `+`, `?`) and `c2` can begin one (operand,
/// `(`).
fn insert_concatenation(units: Vec<RegexToken>) -> Vec<RegexToken> {
    use RegexToken::*;
    let mut out: Vec<RegexToken> = Vec::with_capacity(units.len() * 2);
    for unit in units {
        if let Some(prev) = out.last() {
            let ends_expr = matches!(prev, Operand(_) | RightParen | Star | Plus | Optional);
            let begins_expr = matches!(unit, Operand(_) | LeftParen);
            if ends_expr && begins_expr {
                out.push(Concat);
            }
        }
        out.push(unit);
    }
    out
}

/// Shunting-Yard: reorders the infix unit sequence into postfix. All operators are
/// left-associative, so an operator on the stack with greater or equal precedence is popped
/// before the incoming one is pushed.
fn to_postfix(units: Vec<RegexToken>) -> Result<Vec<RegexToken>, RegexError> {
    use RegexToken::*;
    let mut output = Vec::with_capacity(units.len());
    let mut operators: Vec<RegexToken> = Vec::new();

    for unit in units {
        match unit {
            Operand(_) => output.push(unit),
            LeftParen => operators.push(unit),
            RightParen => loop {
                match operators.pop() {
                    Some(LeftParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(RegexError::UnbalancedParentheses),
                }
            },
            op => {
                while let Some(top) = operators.pop() {
                    if precedence(&top) >= precedence(&op) {
                        output.push(top);
                    } else {
                        operators.push(top);
                        break;
                    }
                }
                operators.push(op);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if matches!(op, LeftParen) {
            return Err(RegexError::UnbalancedParentheses);
        }
        output.push(op);
    }
    Ok(output)
}

/// Precedence used by the Shunting-Yard reordering. A `(` on the operator stack never outranks
/// an incoming operator.
fn precedence(unit: &RegexToken) -> u8 {
    match unit {
        RegexToken::Union => 1,
        RegexToken::Concat => 2,
        RegexToken::Star | RegexToken::Plus | RegexToken::Optional => 3,
        _ => 0,
    }
}

/// Runs the postfix sequence against a symbolic stack depth, rejecting sequences that would not
/// leave exactly one fragment on the construction stack.
fn check_arity(postfix: &[RegexToken]) -> Result<(), RegexError> {
    use RegexToken::*;
    let mut depth: usize = 0;
    for unit in postfix {
        match unit {
            Operand(_) => depth += 1,
            Star | Plus | Optional => {
                if depth == 0 {
                    return Err(RegexError::MalformedRegex);
                }
            }
            Union | Concat => {
                if depth < 2 {
                    return Err(RegexError::MalformedRegex);
                }
                depth -= 1;
            }
            LeftParen | RightParen => return Err(RegexError::MalformedRegex),
        }
    }
    if depth == 1 {
        Ok(())
    } else {
        Err(RegexError::MalformedRegex)
    }
}
