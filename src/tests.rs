use crate::dfa::{Dfa, DfaState};
use crate::grammar::{Grammar, GrammarError, GrammarParseError, Production, Symbol};
use crate::lr::{Action, ItemCore, Lalr1Table, LrAutomaton};
use crate::regex::{Regex, RegexError, RegexToken};
use crate::tokenizer::{Token, TokenRule, Tokenizer, TokenizerError};
use crate::*;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use std::collections::BTreeSet;
use std::rc::Rc;

fn dfa_of(pattern: &str) -> Dfa {
    Regex::compile(pattern).unwrap().to_nfa().to_dfa()
}

fn expression_grammar() -> Grammar {
    parser::grammar(
        "
        E -> E + T | T
        T -> T * F | F
        F -> ( E ) | id
        ",
    )
    .unwrap()
    .try_into()
    .unwrap()
}

fn tokens(types: &[&str]) -> Vec<Token> {
    types.iter().map(|t| Token::new(*t, *t)).collect()
}

#[test]
fn compiles_to_postfix() {
    use RegexToken::*;
    let regex = Regex::compile("a(b|c)*").unwrap();
    assert_eq!(
        regex.postfix(),
        [
            Operand(Rc::from("a")),
            Operand(Rc::from("b")),
            Operand(Rc::from("c")),
            Union,
            Star,
            Concat,
        ]
    );
}

#[test]
fn rejects_malformed_patterns() {
    assert_eq!(
        Regex::compile("(a|b").unwrap_err(),
        RegexError::UnbalancedParentheses
    );
    assert_eq!(
        Regex::compile("a)b").unwrap_err(),
        RegexError::UnbalancedParentheses
    );
    assert_eq!(Regex::compile("|a").unwrap_err(), RegexError::MalformedRegex);
    assert_eq!(Regex::compile("").unwrap_err(), RegexError::MalformedRegex);
    assert_eq!(Regex::compile("?").unwrap_err(), RegexError::MalformedRegex);
}

#[test]
fn nfa_dfa_and_minimized_dfa_agree() {
    let regex = Regex::compile("a(b|c)*").unwrap();
    let nfa = regex.to_nfa();
    let dfa = nfa.to_dfa();
    let minimized = dfa.minimize();

    for (input, expected) in [
        ("a", true),
        ("abccb", true),
        ("ad", false),
        ("", false),
        ("bc", false),
        ("abcbc", true),
    ] {
        assert_eq!(nfa.accepts_graphemes(input), expected, "NFA on {input:?}");
        assert_eq!(dfa.accepts_graphemes(input), expected, "DFA on {input:?}");
        assert_eq!(
            minimized.accepts_graphemes(input),
            expected,
            "minimized DFA on {input:?}"
        );
    }
}

#[test]
fn subset_construction_starts_at_initial_closure() {
    let dfa = dfa_of("(a|b)*abb");
    assert_eq!(dfa.initial_state_index(), 0);
    assert_eq!(dfa.initial_state().name(), "0");
    assert!(dfa.states().iter().all(|s| !s.nfa_states().is_empty()));
    assert!(dfa.accepts_graphemes("abb"));
    assert!(dfa.accepts_graphemes("aabb"));
    assert!(!dfa.accepts_graphemes("ab"));
}

#[test]
fn minimization_merges_nondistinguishable_states() {
    let state = |name: &str, accepting, transitions| DfaState {
        name: Rc::from(name),
        nfa_states: vec![name.parse().unwrap()],
        initial: name == "0",
        accepting,
        transitions,
    };
    let dfa = Dfa {
        alphabet: ["a", "b"].map(Rc::from).into(),
        states: vec![
            state("0", false, vec![Some(1), Some(2)]),
            state("1", false, vec![Some(1), Some(3)]),
            state("2", false, vec![Some(1), Some(3)]),
            state("3", true, vec![None, None]),
        ],
        initial_state: 0,
    };

    let minimized = dfa.minimize();
    assert_eq!(minimized.states().len(), 3);
    // States 1 and 2 collapse into one class represented by 1
    let merged = &minimized.states()[1];
    assert_eq!(merged.name(), "1");
    assert_eq!(merged.nfa_states(), [1, 2]);
    for input in ["ab", "bb", "aab"] {
        assert_eq!(
            dfa.accepts_graphemes(input),
            minimized.accepts_graphemes(input)
        );
    }
}

#[test]
fn minimization_reaches_known_optimum() {
    // The canonical example: the minimal DFA for (a|b)*abb has 4 states
    assert_eq!(dfa_of("(a|b)*abb").minimize().states().len(), 4);
    // a(b|c)* needs only a start state and an accepting loop state
    assert_eq!(dfa_of("a(b|c)*").minimize().states().len(), 2);
}

#[test]
fn single_state_dfa_minimizes_to_itself() {
    let dfa = dfa_of("a*").minimize();
    assert_eq!(dfa.minimize(), dfa);
    assert_eq!(dfa.states().len(), 1);
}

#[test]
fn tokenizer_prefers_longest_match() {
    let tokenizer = Tokenizer::new(vec![
        TokenRule::new("KW_IF", dfa_of("if")),
        TokenRule::new("ID", dfa_of("(i|f|y)(i|f|y)*")),
    ]);
    let tokens = tokenizer.tokenize("iffy").unwrap();
    assert_eq!(tokens, [Token::new("ID", "iffy")]);
}

#[test]
fn tokenizer_breaks_ties_by_rule_order() {
    let tokenizer = Tokenizer::new(vec![
        TokenRule::new("KW_IF", dfa_of("if")),
        TokenRule::new("ID", dfa_of("(i|f|y)(i|f|y)*")),
    ]);
    let tokens = tokenizer.tokenize("if").unwrap();
    assert_eq!(tokens, [Token::new("KW_IF", "if")]);
}

#[test]
fn tokenizer_skips_whitespace() {
    let tokenizer = Tokenizer::new(vec![TokenRule::new("A", dfa_of("a+"))]);
    let tokens = tokenizer.tokenize("  a\n aa\t").unwrap();
    assert_eq!(
        tokens,
        [Token::new("A", "a"), Token::new("A", "aa")]
    );
}

#[test]
fn tokenizer_reports_unmatched_position() {
    let tokenizer = Tokenizer::new(vec![TokenRule::new("A", dfa_of("a+"))]);
    assert_eq!(
        tokenizer.tokenize("aab").unwrap_err(),
        TokenizerError::UnexpectedCharacter(2)
    );
}

#[test]
fn first_and_follow_of_expression_grammar() {
    let grammar = expression_grammar();
    let first = grammar.first_sets();
    let follow = grammar.follow_sets(&first);

    let parens_or_id: BTreeSet<_> = [Symbol::terminal("("), Symbol::terminal("id")]
        .into_iter()
        .collect();
    for nt in ["E", "T", "F"] {
        let actual: BTreeSet<_> = first[&Symbol::non_terminal(nt)].iter().cloned().collect();
        assert_eq!(actual, parens_or_id, "FIRST({nt})");
    }

    let follow_e: BTreeSet<_> = follow[&Symbol::non_terminal("E")].iter().cloned().collect();
    let expected: BTreeSet<_> = [
        Symbol::end_of_input(),
        Symbol::terminal("+"),
        Symbol::terminal(")"),
    ]
    .into_iter()
    .collect();
    assert_eq!(follow_e, expected);
}

#[test]
fn first_sets_track_nullability() {
    let grammar: Grammar = parser::grammar(
        "
        S -> A B
        A -> a | ε
        B -> b
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let first = grammar.first_sets();
    let follow = grammar.follow_sets(&first);

    assert!(first[&Symbol::non_terminal("A")].contains(&Symbol::epsilon()));
    assert!(first[&Symbol::non_terminal("S")].contains(&Symbol::terminal("a")));
    // A can vanish, so b can begin a sentence
    assert!(first[&Symbol::non_terminal("S")].contains(&Symbol::terminal("b")));
    assert_eq!(
        follow[&Symbol::non_terminal("A")],
        [Symbol::terminal("b")].into_iter().collect()
    );
}

#[test]
fn growing_a_grammar_grows_its_sets() {
    let smaller = expression_grammar();
    let larger: Grammar = parser::grammar(
        "
        E -> E + T | T
        T -> T * F | F
        F -> ( E ) | id | id ( E )
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();

    let first_smaller = smaller.first_sets();
    let first_larger = larger.first_sets();
    let follow_smaller = smaller.follow_sets(&first_smaller);
    let follow_larger = larger.follow_sets(&first_larger);

    for (symbol, set) in &first_smaller {
        assert!(set.is_subset(&first_larger[symbol]), "FIRST({symbol}) shrank");
    }
    for (symbol, set) in &follow_smaller {
        assert!(
            set.is_subset(&follow_larger[symbol]),
            "FOLLOW({symbol}) shrank"
        );
    }
}

#[test]
fn automaton_seeds_with_augmented_item() {
    let automaton = LrAutomaton::new(&expression_grammar());
    assert_eq!(automaton.grammar().start().name(), "E'");
    let seed_lookaheads = &automaton.states()[0][&ItemCore {
        production: 0,
        dot: 0,
    }];
    assert_eq!(
        seed_lookaheads,
        &BTreeSet::from([Symbol::end_of_input()])
    );
    assert!(automaton
        .transition(0, &Symbol::non_terminal("E"))
        .is_some());
}

#[test]
fn lalr_merge_reaches_known_state_count() {
    // Core merging brings the canonical LR(1) collection of the expression grammar down to
    // the familiar 12 states
    let table = Lalr1Table::new(&expression_grammar());
    assert_eq!(table.states().len(), 12);
    assert!(table.conflicts().is_empty());
}

#[test]
fn parses_the_expression_grammar() {
    let table = Lalr1Table::new(&expression_grammar());
    assert!(table.conflicts().is_empty());

    assert!(table.accepts(&tokens(&["id", "+", "id", "*", "id"])));
    assert!(table.accepts(&tokens(&["id"])));
    assert!(table.accepts(&tokens(&["(", "id", "+", "id", ")", "*", "id"])));
    assert!(!table.accepts(&tokens(&["id", "+"])));
    assert!(!table.accepts(&tokens(&["+", "id"])));
    assert!(!table.accepts(&tokens(&["(", ")"])));
    assert!(!table.accepts(&tokens(&["wat"])));
    assert!(!table.accepts(&tokens(&[])));
}

#[test]
fn exactly_one_accept_cell() {
    let table = Lalr1Table::new(&expression_grammar());
    let accepts = table
        .actions
        .iter()
        .filter(|(_, action)| **action == Action::Accept)
        .collect::<Vec<_>>();
    assert_eq!(accepts.len(), 1);
    let ((_, symbol), _) = accepts[0];
    assert!(symbol.is_end_of_input());
}

#[test]
fn dangling_else_reports_shift_reduce() {
    let grammar: Grammar = parser::grammar(
        "
        S -> if E then S | if E then S else S | a
        E -> b
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let table = Lalr1Table::new(&grammar);
    assert!(table
        .conflicts()
        .iter()
        .any(|c| c.starts_with("Shift/Reduce") && c.ends_with("on else")));
    // First-writer-wins keeps the table usable
    assert!(table.accepts(&tokens(&["if", "b", "then", "a"])));
}

#[test]
fn ambiguous_reduction_reports_reduce_reduce() {
    let grammar: Grammar = parser::grammar(
        "
        S -> A | B
        A -> x
        B -> x
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let table = Lalr1Table::new(&grammar);
    assert!(table
        .conflicts()
        .iter()
        .any(|c| c.starts_with("Reduce/Reduce")));
}

#[test]
fn parses_epsilon_productions() {
    let grammar: Grammar = parser::grammar("S -> a S | ε").unwrap().try_into().unwrap();
    let table = Lalr1Table::new(&grammar);
    assert!(table.conflicts().is_empty());
    assert!(table.accepts(&tokens(&[])));
    assert!(table.accepts(&tokens(&["a"])));
    assert!(table.accepts(&tokens(&["a", "a", "a"])));
    assert!(!table.accepts(&tokens(&["b"])));
}

#[test]
fn handles_lalr_but_not_slr_grammar() {
    let grammar: Grammar = parser::grammar(
        "
        S -> L = R | R
        L -> * R | id
        R -> L
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let table = Lalr1Table::new(&grammar);
    assert!(table.conflicts().is_empty());

    assert!(table.accepts(&tokens(&["id", "=", "id"])));
    assert!(table.accepts(&tokens(&["*", "id", "=", "*", "id"])));
    assert!(table.accepts(&tokens(&["id"])));
    assert!(!table.accepts(&tokens(&["id", "="])));
    assert!(!table.accepts(&tokens(&["=", "id"])));
}

#[test]
fn augmented_start_never_collides() {
    let grammar: Grammar = parser::grammar(
        "
        S -> S' a | b
        S' -> c
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    let table = Lalr1Table::new(&grammar);
    assert_eq!(table.grammar().start().name(), "S''");
    assert!(table.accepts(&tokens(&["c", "a"])));
    assert!(table.accepts(&tokens(&["b"])));
}

#[test]
fn grammar_invariants_are_checked() {
    // Start symbol must be declared
    let err = Grammar::new(
        vec![Symbol::terminal("a")],
        vec![],
        vec![],
        Symbol::non_terminal("S"),
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::MissingStartSymbol);

    // Production symbols must be declared
    let err = Grammar::new(
        vec![],
        vec![Symbol::non_terminal("S")],
        vec![Production::new(
            Symbol::non_terminal("S"),
            vec![Symbol::terminal("a")],
        )],
        Symbol::non_terminal("S"),
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::UndeclaredSymbol("a".to_string()));

    // Reserved and mis-kinded symbols are rejected
    let err = Grammar::new(
        vec![Symbol::epsilon()],
        vec![Symbol::non_terminal("S")],
        vec![],
        Symbol::non_terminal("S"),
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::ReservedSymbol("ε".to_string()));

    let err = Grammar::new(
        vec![Symbol::non_terminal("a")],
        vec![Symbol::non_terminal("S")],
        vec![],
        Symbol::non_terminal("S"),
    )
    .unwrap_err();
    assert_eq!(err, GrammarError::WrongSymbolKind("a".to_string()));
}

#[test]
fn grammar_text_format_is_validated() {
    let grammar: Grammar = parser::grammar(
        "
        # comments and blank lines are fine

        S -> a S b | eps  # 'eps' spells ε
        ",
    )
    .unwrap()
    .try_into()
    .unwrap();
    assert_eq!(grammar.start().name(), "S");
    assert_eq!(grammar.productions().len(), 2);
    assert!(grammar.productions()[1].is_empty());

    let duplicated = parser::grammar("E -> a | a").unwrap();
    assert!(matches!(
        Grammar::try_from(duplicated).unwrap_err(),
        GrammarParseError::Invalid(GrammarError::DuplicateProduction(_))
    ));

    let reserved_body = parser::grammar("S -> $").unwrap();
    assert!(matches!(
        Grammar::try_from(reserved_body).unwrap_err(),
        GrammarParseError::Invalid(GrammarError::ReservedSymbol(_))
    ));

    let reserved_left = parser::grammar("ε -> a").unwrap();
    assert!(matches!(
        Grammar::try_from(reserved_left).unwrap_err(),
        GrammarParseError::ReservedRuleName("ε")
    ));

    let misplaced = parser::grammar("S -> a ε").unwrap();
    assert!(matches!(
        Grammar::try_from(misplaced).unwrap_err(),
        GrammarParseError::MisplacedEpsilon
    ));
}

#[test]
fn terminals_follow_first_occurrence_order() {
    let grammar = expression_grammar();
    let names = grammar
        .terminals()
        .iter()
        .map(Symbol::name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["+", "*", "(", ")", "id"]);
}

#[test]
fn lexes_and_parses_end_to_end() {
    let grammar: Grammar = parser::grammar("S -> a S b | ε").unwrap().try_into().unwrap();
    let table = Lalr1Table::new(&grammar);
    let tokenizer = Tokenizer::new(vec![
        TokenRule::new("a", dfa_of("a")),
        TokenRule::new("b", dfa_of("b")),
    ]);

    for (input, expected) in [("", true), ("ab", true), ("aabb", true), ("aab", false)] {
        let tokens = tokenizer.tokenize(input).unwrap();
        assert_eq!(table.accepts(&tokens), expected, "on input {input:?}");
    }
}

#[test]
fn printable_tables_render() {
    let dfa = dfa_of("ab?");
    let rendered = dfa.to_table();
    assert!(rendered.contains('→'));
    assert!(rendered.contains('-'));

    let table = Lalr1Table::new(&expression_grammar());
    let rendered = table.to_table();
    assert!(rendered.contains("acc"));
    assert!(rendered.contains("id"));
}

proptest! {
    /// Tests that the NFA, the DFA and the minimized DFA built from a pattern all agree with
    /// the regex library on random inputs
    #[test]
    fn regex_pipeline_agrees_with_library(
        pattern in random_regex(),
        tests in prop::collection::vec("[a-d]{0,10}", 25)
    ) {
        let regex = Regex::compile(&pattern).unwrap();
        let nfa = regex.to_nfa();
        let dfa = nfa.to_dfa();
        let minimized = dfa.minimize();
        let lib_regex = LibRegex::new(&format!("^({pattern})$")).unwrap();

        for test in &tests {
            let expected = lib_regex.is_match(test);
            prop_assert_eq!(nfa.accepts_graphemes(test), expected);
            prop_assert_eq!(dfa.accepts_graphemes(test), expected);
            prop_assert_eq!(minimized.accepts_graphemes(test), expected);
        }
    }

    /// Tests that minimization neither changes the language nor grows the state count
    #[test]
    fn minimize_preserves_language(
        dfa in dfa(20),
        tests in prop::collection::vec("[a-f]{0,10}", 50)
    ) {
        let minimized = dfa.minimize();
        prop_assert!(minimized.states().len() <= dfa.states().len());
        for test in &tests {
            prop_assert_eq!(dfa.accepts_graphemes(test), minimized.accepts_graphemes(test));
        }
    }

    /// Tests that minimizing twice gives the very same DFA (not just an equivalent one)
    #[test]
    fn minimize_is_idempotent(dfa in dfa(20)) {
        let minimized = dfa.minimize();
        prop_assert_eq!(&minimized.minimize(), &minimized);
    }
}

prop_compose! {
    fn dfa(max_states: usize)
        (num_states in 1..max_states)
        (
            initial_state in 0..num_states,
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            transitions in prop::collection::vec(
                prop::collection::vec(prop::option::of(0..num_states), 5..=5),
                num_states..=num_states
            )
        )
    -> Dfa {
        let mut alphabet: Vec<Rc<str>> = ('a'..='e').map(|c| Rc::from(c.to_string())).collect();
        alphabet.shuffle(&mut thread_rng());

        let states = accepting.into_iter()
            .zip(transitions)
            .enumerate()
            .map(|(idx, (accepting, transitions))| DfaState {
                name: Rc::from(idx.to_string()),
                nfa_states: vec![idx],
                initial: idx == initial_state,
                accepting,
                transitions,
            })
            .collect();

        Dfa {
            alphabet: alphabet.into(),
            states,
            initial_state,
        }
    }
}

fn random_regex() -> impl Strategy<Value = String> {
    "[a-d]".prop_recursive(8, 64, 10, |inner| {
        prop_oneof![
            8 => prop::collection::vec(inner.clone(), 1..6).prop_map(|vec| vec.concat()),
            6 => prop::collection::vec(inner.clone(), 1..6).prop_map(|vec| vec.join("|")),
            2 => inner.clone().prop_map(|r| format!("({r})*")),
            2 => inner.clone().prop_map(|r| format!("({r})+")),
            2 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}
