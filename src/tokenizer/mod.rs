//! # Tokenizer
//! A [Tokenizer] splits an input string into a sequence of [Token]s by running a list of
//! [TokenRule]s, each pairing a token type name with a [Dfa]. The scan follows the
//! *maximal munch* rule:
//!
//! * Whitespace between tokens is skipped.
//! * At each position, every rule's DFA is simulated forward and the position of its last
//!   accepting state is remembered.
//! * The rule with the longest match wins; on equal lengths, the rule listed first wins, so
//!   rule order expresses priority.
//! * If no rule matches at least one grapheme cluster, tokenization fails with
//!   [TokenizerError::UnexpectedCharacter] carrying the byte position.
//!
//! Note that longest-match is applied across *all* rules, so a keyword rule listed before an
//! identifier rule still loses on input where the identifier continues past the keyword:
//!
//! ```
//! use grackle::regex::Regex;
//! use grackle::tokenizer::{TokenRule, Tokenizer};
//!
//! let kw_if = Regex::compile("if").unwrap().to_nfa().to_dfa();
//! let ident = Regex::compile("(i|f|y)(i|f|y)*").unwrap().to_nfa().to_dfa();
//! let tokenizer = Tokenizer::new(vec![
//!     TokenRule::new("KW_IF", kw_if),
//!     TokenRule::new("ID", ident),
//! ]);
//!
//! let tokens = tokenizer.tokenize("iffy if").unwrap();
//! let types: Vec<_> = tokens.iter().map(|t| t.token_type()).collect();
//! assert_eq!(types, ["ID", "KW_IF"]);
//! assert_eq!(tokens[0].lexeme(), "iffy");
//! ```

use crate::dfa::Dfa;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// A token produced by the [Tokenizer]: the name of the rule that matched and the matched text.
/// The token type is what the [parser driver](crate::lr::Lalr1Table::accepts) maps onto the
/// grammar's terminal symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub(crate) token_type: Rc<str>,
    pub(crate) lexeme: String,
}

impl Token {
    pub fn new(token_type: impl Into<Rc<str>>, lexeme: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            lexeme: lexeme.into(),
        }
    }

    /// The name of the rule that produced this token
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// The matched text
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.token_type, self.lexeme)
    }
}

/// One tokenization rule: a token type name together with the DFA recognizing its lexemes
#[derive(Debug, Clone)]
pub struct TokenRule {
    token_type: Rc<str>,
    dfa: Dfa,
}

impl TokenRule {
    pub fn new(token_type: impl Into<Rc<str>>, dfa: Dfa) -> Self {
        Self {
            token_type: token_type.into(),
            dfa,
        }
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizerError {
    /// No rule matched anything at the given byte position of the input
    #[error("No rule matches the input at byte position {0}")]
    UnexpectedCharacter(usize),
}

/// A longest-match scanner over a prioritized list of [TokenRule]s
#[derive(Debug, Clone)]
pub struct Tokenizer {
    rules: Vec<TokenRule>,
}

impl Tokenizer {
    pub fn new(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Scans the whole input into a token list, skipping whitespace between tokens. See the
    /// [module-level documentation](crate::tokenizer) for the matching rules.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, TokenizerError> {
        let graphemes = input.grapheme_indices(true).collect::<Vec<_>>();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < graphemes.len() {
            let (byte_pos, grapheme) = graphemes[pos];
            if grapheme.chars().all(char::is_whitespace) {
                pos += 1;
                continue;
            }

            // (rule index, match length); strict > keeps the first rule on equal lengths
            let mut best: Option<(usize, usize)> = None;
            for (rule_idx, rule) in self.rules.iter().enumerate() {
                let len = match_length(&rule.dfa, &graphemes[pos..]);
                if len > 0 && best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((rule_idx, len));
                }
            }

            match best {
                None => return Err(TokenizerError::UnexpectedCharacter(byte_pos)),
                Some((rule_idx, len)) => {
                    let lexeme = graphemes[pos..pos + len]
                        .iter()
                        .map(|(_, g)| *g)
                        .collect::<String>();
                    tokens.push(Token {
                        token_type: self.rules[rule_idx].token_type.clone(),
                        lexeme,
                    });
                    pos += len;
                }
            }
        }
        Ok(tokens)
    }
}

/// Simulates the DFA over the input and gives the length (in grapheme clusters) of the longest
/// prefix ending in an accepting state, or 0 if no non-empty prefix is accepted
fn match_length(dfa: &Dfa, input: &[(usize, &str)]) -> usize {
    let mut eval = dfa.evaluator();
    let mut len = 0;
    for (consumed, (_, grapheme)) in input.iter().enumerate() {
        if eval.step(grapheme).is_none() {
            break;
        }
        if eval.is_accepting() {
            len = consumed + 1;
        }
    }
    len
}
