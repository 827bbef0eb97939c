//! Regex facade: whole-string acceptance, prefix queries, and randomized
//! consistency between the two match modes.

use lrex::{
    Regex,
    dev::generator::{gen_pattern, gen_text},
};
use rand::{SeedableRng, rngs::StdRng};

fn re(p: &str) -> Regex {
    Regex::compile(p).unwrap_or_else(|| panic!("pattern {p:?} should compile"))
}

/// True when the longest accepting prefix is the whole text.
fn matches(p: &str, text: &str) -> bool {
    re(p).greedy_match(text) == Some(text.len())
}

#[test]
fn star_then_literal() {
    assert_eq!(re("a*b").greedy_match("aaaab"), Some(5));
    assert_eq!(re("a*b").greedy_match("aaaac"), None);
    assert!(matches("ca*t", "caaat"));
    assert!(!matches("ca*t", "caabt"));
}

#[test]
fn ranges_in_brackets() {
    assert_eq!(re("[a-zA-Z]*a").greedy_match("ajkAJHa"), Some(7));
    assert!(!matches("[a-zA-Z]*a", "ajkA1Ha"));
    assert!(!matches("[a-zA-Z]*a", "ajkAJHb"));
}

#[test]
fn alternation() {
    let r = re("cat|dog");
    assert_eq!(r.greedy_match("cat"), Some(3));
    assert_eq!(r.greedy_match("dog"), Some(3));
    assert_eq!(r.greedy_match("bug"), None);
}

#[test]
fn posix_classes() {
    assert!(matches("[:alnum:]*", "abcd1234"));
    assert!(matches("[:alnum:]*", "0123456789"), "every digit is alnum");
    assert!(!matches("[:alnum:]*", "hello."));
    assert!(matches("[.xdigit.]*", "abcd1234"));
    assert!(!matches("[=xdigit=]*", "zzz"));
    // `!` is not a class delimiter: this is the set {!, x, d, i, g, t}.
    assert!(!matches("[!xdigit!]*", "abcd1234"));
    assert!(matches("[!xdigit!]*", "xd!t"));
    assert!(matches("[[:upper:]_]+", "AB_C"));
    assert!(!matches("[[:upper:]_]+", "AbC"));
    assert!(matches("[[:space:]]*", " \t\n\r"));
}

#[test]
fn dot_skips_newline() {
    assert!(matches("a.c", "abc"));
    assert!(!matches("a.c", "a\nc"));
    assert!(matches("a.c", "a\0c"));
}

#[test]
fn nested_star_and_plus() {
    assert!(!matches("(ab*)*", "b"));
    assert!(matches("(ab*)*", "abbbabbbaabbb"));
    assert!(matches("a+b", "aaab"));
    assert!(!matches("a+b", "b"));
    assert!(matches("(a|b)?c", "c"));
    assert!(matches("a*?", "aaa"), "quantifiers stack");
}

#[test]
fn bounded_intervals() {
    let r = re("a{2,4}");
    for s in ["aa", "aaa", "aaaa"] {
        assert_eq!(r.greedy_match(s), Some(s.len()), "{s:?}");
    }
    assert_eq!(r.greedy_match("a"), None);
    assert_eq!(r.greedy_match("aaaaa"), Some(4), "only a prefix of five a's");
    assert!(!matches("a{2,4}", "aaaaa"));

    assert!(matches("a{3}", "aaa"));
    assert!(!matches("a{3}", "aa"));
    assert!(!matches("a{3}", "aaaa"));
    assert!(matches("(ab){2,}", "ababab"));
    assert!(!matches("(ab){2,}", "ab"));
    assert!(matches("x{0,}", ""));
    assert!(matches("x{0,}", "xxxx"));
    assert!(matches("b{0}c", "c"));
    assert!(matches("(a|bc){1,2}d", "bcad"));
}

#[test]
fn escapes() {
    assert!(matches("a\\nb", "a\nb"));
    assert!(matches("\\t\\x41\\102", "\tAB"));
    assert!(matches("\\*\\.", "*."));
    assert!(matches("[\\]x]+", "]x]"));
    assert!(matches("[^\\n]*", "anything but"));
    assert!(!matches("[^a]", "\n"), "negated sets never match newline");
}

#[test]
fn nongreedy_stops_at_first_accept() {
    let r = re("a+");
    assert_eq!(r.nongreedy_match("aaaa"), Some(1));
    assert_eq!(r.greedy_match("aaaa"), Some(4));
    assert_eq!(re("a*").nongreedy_match("aaa"), Some(0));
    assert_eq!(re("a*").greedy_match("bbb"), Some(0));
    assert_eq!(re("b").nongreedy_match(""), None);
    assert_eq!(re("").greedy_match("xyz"), Some(0));
}

#[test]
fn bytes_above_ascii_are_plain_symbols() {
    let r = Regex::compile(b"\xff+\x80").expect("byte pattern");
    assert_eq!(r.greedy_match(b"\xff\xff\x80".as_slice()), Some(3));
    assert_eq!(re(".").greedy_match(b"\xc3".as_slice()), Some(1));
}

#[test]
fn node_zero_is_start_and_links_stay_in_range() {
    let r = re("(a|b)*abb");
    let dfa = r.dfa();
    assert_eq!(dfa.num_items, 256);
    for node in &dfa.nodes {
        for &l in &node.links {
            assert!(l == lrex::REJECT || (l as usize) < dfa.num_nodes());
        }
    }
    assert!(!r.is_accepting(0));
}

#[test]
fn randomized_greedy_never_shorter() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..300 {
        let p = gen_pattern(&mut rng, 2);
        let r = re(&p);
        for len in [0, 1, 3, 8, 16] {
            let t = gen_text(&mut rng, len);
            match (r.nongreedy_match(&t), r.greedy_match(&t)) {
                (Some(l), Some(g)) => assert!(l <= g && g <= t.len(), "{p:?} on {t:?}"),
                (None, None) => {}
                other => panic!("{p:?} on {t:?}: modes disagree on existence {other:?}"),
            }
        }
    }
}

#[test]
fn recompiling_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let p = gen_pattern(&mut rng, 3);
        assert!(re(&p).dfa().same_table(re(&p).dfa()), "{p:?}");
    }
}
