//! Multi-rule scanner: maximal munch, earliest rule on ties.

use lrex::lexer::{Scanner, Token};

const IF: u32 = 0;
const IDENT: u32 = 1;
const INT: u32 = 2;
const WS: u32 = 3;
const OP: u32 = 4;

fn toy() -> Scanner {
    Scanner::new(&["if", "[a-z][a-z0-9]*", "[0-9]+", "[ \\t\\n]+", "==|=|\\+"])
        .expect("toy rules compile")
}

fn kinds(toks: &[Token]) -> Vec<u32> {
    toks.iter().map(|t| t.rule).collect()
}

#[test]
fn keyword_wins_tie_but_longer_ident_wins_overall() {
    let s = toy();
    assert_eq!(s.longest(b"if"), Some((IF, 2)));
    assert_eq!(s.longest(b"iffy"), Some((IDENT, 4)));
    assert_eq!(s.longest(b"if("), Some((IF, 2)));
    assert_eq!(s.longest(b"(if"), None);
}

#[test]
fn tokenize_covers_input_exactly() {
    let s = toy();
    let src = "if x1 == 42\n  y=x1+7";
    let toks = s.tokenize(src).expect("lexes");
    assert_eq!(
        kinds(&toks),
        vec![
            IF, WS, IDENT, WS, OP, WS, INT, WS, IDENT, OP, IDENT, OP, INT
        ]
    );
    let mut at = 0;
    for t in &toks {
        assert_eq!(t.start, at, "tokens are contiguous");
        assert!(t.len > 0);
        at += t.len;
    }
    assert_eq!(at, src.len());
    let eq = toks[4];
    assert_eq!(&src[eq.start..eq.start + eq.len], "==", "maximal munch");
}

#[test]
fn unmatched_byte_is_reported_with_offset() {
    let s = toy();
    let err = s.tokenize("x = 1 ; y").unwrap_err();
    assert!(err.contains("byte 6"), "{err}");
}

#[test]
fn empty_input_yields_no_tokens() {
    assert_eq!(toy().tokenize("").unwrap(), Vec::<Token>::new());
}

#[test]
fn bad_rule_rejects_whole_set() {
    assert!(Scanner::new(&["ok", "(bad"]).is_none());
}

#[test]
fn labels_name_the_lowest_rule() {
    let s = Scanner::new(&["a", "a", "b*"]).unwrap();
    assert_eq!(s.num_rules(), 3);
    assert_eq!(s.longest(b"a"), Some((0, 1)));
    assert_eq!(s.longest(b"bb"), Some((2, 2)));
    assert_eq!(s.longest(b"c"), Some((2, 0)), "b* accepts the empty prefix");
}
