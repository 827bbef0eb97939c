//! Grammar loading from BNF text.

use lrex::parser::{Entry, TableKind, bnf, driver};

const PAIRS: &str = r#"
<pair> ::= <x> <x>
<x>    ::= "a" <x> | "b"
"#;

#[test]
fn numbering_follows_first_appearance() {
    let g = bnf::load(PAIRS, None).expect("loads");
    assert_eq!(g.names, vec!["a", "b", "$", "pair", "x", "pair'"]);
    assert_eq!(g.eof, 2);
    assert_eq!(g.start, 5);
    assert_eq!(g.grammar.num_terminals(), 3);
    assert_eq!(g.grammar.num_tokens(), 6);
    let rules: Vec<(usize, Vec<usize>)> = g
        .grammar
        .rules()
        .iter()
        .map(|r| (r.lhs, r.rhs.clone()))
        .collect();
    assert_eq!(
        rules,
        vec![(5, vec![3, 2]), (3, vec![4, 4]), (4, vec![0, 4]), (4, vec![1])]
    );
}

#[test]
fn loaded_grammar_builds_the_textbook_table() {
    let g = bnf::load(PAIRS, None).unwrap();
    let table = g.grammar.compile(g.start).unwrap();
    assert_eq!(table.num_states(), 8);
    assert_eq!(table.entry(0, 0), Entry::Transition(1));
    assert_eq!(table.entry(7, g.eof), Entry::Reduce(1));

    let input = g.terminals(["a", "a", "b", "b"]).unwrap();
    assert_eq!(driver::parse(&table, &input, g.eof), Ok(vec![3, 2, 2, 3, 1]));
    assert!(g.terminals(["a", "c"]).is_err());
}

#[test]
fn empty_terminal_is_epsilon() {
    let src = r#"
<list> ::= "(" <list> ")" <list> | ""
"#;
    let g = bnf::load(src, None).unwrap();
    assert_eq!(g.names, vec!["(", ")", "$", "list", "list'"]);
    assert_eq!(g.grammar.rules()[2].rhs, Vec::<usize>::new());

    for kind in [TableKind::Merged, TableKind::Canonical] {
        let table = g.grammar.compile_with(g.start, kind).unwrap();
        let ok = g.terminals(["(", ")", "(", "(", ")", ")"]).unwrap();
        assert!(driver::parse(&table, &ok, g.eof).is_ok(), "{kind:?}");
        assert!(driver::parse(&table, &[], g.eof).is_ok(), "{kind:?}");
        let bad = g.terminals(["(", "(", ")"]).unwrap();
        assert!(driver::parse(&table, &bad, g.eof).is_err(), "{kind:?}");
    }
}

#[test]
fn explicit_start_symbol() {
    let g = bnf::load(PAIRS, Some("x")).unwrap();
    assert_eq!(g.names.last().map(String::as_str), Some("x'"));
    let table = g.grammar.compile(g.start).unwrap();
    let input = g.terminals(["a", "b"]).unwrap();
    assert_eq!(driver::parse(&table, &input, g.eof), Ok(vec![3, 2]));
}

#[test]
fn bad_grammars_are_reported() {
    assert!(bnf::load(PAIRS, Some("nope")).is_err(), "unknown start");
    assert!(bnf::load(r#"<s> ::= "$" "a""#, None).is_err(), "reserved end marker");
}
