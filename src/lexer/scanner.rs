// src/lexer/scanner.rs
// Several patterns in one DFA: the lexer-generator view of the regex engine.

use log::debug;

use super::{parse, regex::NfaBuilder};
use crate::automaton::{self, BuildOptions, Dfa};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Index of the pattern that produced this token.
    pub rule: u32,
    pub start: usize,
    pub len: usize,
}

/// DFA node labels are the lowest rule accepted at that node, or -1.
#[derive(Debug, Clone)]
pub struct Scanner {
    dfa: Dfa,
    num_rules: usize,
}

fn slice_dbg(src: &[u8], i: usize) -> (usize, String) {
    let lo = i.saturating_sub(16);
    let hi = (i + 16).min(src.len());
    let s = src[lo..hi]
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '·'
            }
        })
        .collect();
    (lo, s)
}

impl Scanner {
    /// `None` if any pattern is malformed.
    pub fn new<P: AsRef<[u8]>>(patterns: &[P]) -> Option<Scanner> {
        let rules: Vec<&[u8]> = patterns.iter().map(|p| p.as_ref()).collect();
        let nfa = match parse::parse_rules(&rules) {
            Ok(nfa) => nfa,
            Err(e) => {
                debug!("[scanner] rejected rule set: {e}");
                return None;
            }
        };
        let builder = NfaBuilder::new(&nfa);
        let dfa = automaton::build(&builder, builder.initial(), BuildOptions::default());
        debug!(
            "[scanner] {} rules, {} nfa nodes -> {} dfa nodes",
            rules.len(),
            nfa.nodes.len(),
            dfa.num_nodes()
        );
        Some(Scanner {
            dfa,
            num_rules: rules.len(),
        })
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn num_rules(&self) -> usize {
        self.num_rules
    }

    #[inline]
    fn rule_at(&self, node: usize) -> Option<u32> {
        let label = self.dfa.nodes.get(node)?.label;
        u32::try_from(label).ok()
    }

    /// Longest accepting prefix of `text` as `(rule, len)`. Among rules matching
    /// that same length the one listed first wins.
    pub fn longest(&self, text: &[u8]) -> Option<(u32, usize)> {
        if self.dfa.num_nodes() == 0 {
            return None;
        }
        let mut node = 0usize;
        let mut best = self.rule_at(node).map(|r| (r, 0));
        for (i, &b) in text.iter().enumerate() {
            let Some(next) = self.dfa.link(node, b as usize) else {
                break;
            };
            node = next;
            if let Some(r) = self.rule_at(node) {
                best = Some((r, i + 1));
            }
        }
        best
    }

    /// Splits all of `input` into maximal-munch tokens.
    pub fn tokenize(&self, input: impl AsRef<[u8]>) -> Result<Vec<Token>, String> {
        let bytes = input.as_ref();
        let mut out = Vec::new();
        let mut at = 0usize;
        while at < bytes.len() {
            match self.longest(&bytes[at..]) {
                Some((rule, len)) if len > 0 => {
                    out.push(Token {
                        rule,
                        start: at,
                        len,
                    });
                    at += len;
                }
                _ => {
                    let (ctx_lo, ctx) = slice_dbg(bytes, at);
                    return Err(format!(
                        "no rule matches at byte {at} (0x{:02X}); context [{}..{}):\n{}",
                        bytes[at],
                        ctx_lo,
                        ctx_lo + ctx.chars().count(),
                        ctx
                    ));
                }
            }
        }
        Ok(out)
    }
}
