// src/lexer/regex.rs
// Pattern -> NFA -> DFA, plus the two prefix-match queries.

use hashbrown::HashSet;
use log::debug;

use super::{
    nfa::{NUM_CHARS, Nfa},
    parse,
};
use crate::automaton::{self, BuildOptions, Dfa, State, SubsetBuilder};

/// Subset-construction view of an NFA: items are NFA node ids, tokens are bytes.
///
/// The label of a DFA node is the lowest rule accepted by any member, or -1.
pub struct NfaBuilder<'a> {
    nfa: &'a Nfa,
}

impl<'a> NfaBuilder<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Self { nfa }
    }

    pub fn initial(&self) -> State {
        State::from_items([self.nfa.start])
    }
}

impl SubsetBuilder for NfaBuilder<'_> {
    fn num_items(&self) -> usize {
        NUM_CHARS
    }

    fn enclose(&self, state: &mut State) {
        let mut seen: HashSet<usize> = state.iter().collect();
        let mut stack: Vec<usize> = state.iter().collect();
        while let Some(n) = stack.pop() {
            for &to in &self.nfa.nodes[n].epsilon {
                if seen.insert(to) {
                    state.insert(to);
                    stack.push(to);
                }
            }
        }
    }

    fn step(&self, state: &State, token: usize) -> State {
        let byte = token as u8;
        State::from_items(
            state
                .iter()
                .flat_map(|n| self.nfa.nodes[n].targets(byte)),
        )
    }

    fn followups(&self, state: &State, out: &mut [bool]) {
        for n in state.iter() {
            for &(b, _) in &self.nfa.nodes[n].transitions {
                out[b as usize] = true;
            }
        }
    }

    fn label(&self, state: &State) -> i64 {
        state
            .iter()
            .filter_map(|n| self.nfa.nodes[n].accept)
            .min()
            .map_or(-1, i64::from)
    }
}

/// A compiled pattern. Matching walks the DFA from node 0.
#[derive(Debug, Clone)]
pub struct Regex {
    dfa: Dfa,
}

impl Regex {
    /// `None` if the pattern is malformed.
    pub fn compile(pattern: impl AsRef<[u8]>) -> Option<Regex> {
        let pattern = pattern.as_ref();
        match parse::parse(pattern) {
            Ok(nfa) => Some(Self::from_nfa(&nfa)),
            Err(e) => {
                debug!(
                    "[regex] rejected {:?}: {e}",
                    String::from_utf8_lossy(pattern)
                );
                None
            }
        }
    }

    pub fn from_nfa(nfa: &Nfa) -> Regex {
        let builder = NfaBuilder::new(nfa);
        let dfa = automaton::build(&builder, builder.initial(), BuildOptions::default());
        debug!(
            "[regex] {} nfa nodes -> {} dfa nodes",
            nfa.nodes.len(),
            dfa.num_nodes()
        );
        Regex { dfa }
    }

    /// Wraps a DFA produced elsewhere (e.g. loaded from disk).
    pub fn from_dfa(dfa: Dfa) -> Regex {
        Regex { dfa }
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn num_nodes(&self) -> usize {
        self.dfa.num_nodes()
    }

    #[inline]
    pub fn is_accepting(&self, node: usize) -> bool {
        self.dfa.nodes.get(node).is_some_and(|n| n.label >= 0)
    }

    /// Length of the shortest accepting prefix of `text`.
    pub fn nongreedy_match(&self, text: impl AsRef<[u8]>) -> Option<usize> {
        self.walk(text.as_ref(), true)
    }

    /// Length of the longest accepting prefix of `text`.
    pub fn greedy_match(&self, text: impl AsRef<[u8]>) -> Option<usize> {
        self.walk(text.as_ref(), false)
    }

    fn walk(&self, text: &[u8], stop_at_first: bool) -> Option<usize> {
        if self.dfa.num_nodes() == 0 {
            return None;
        }
        let mut node = 0usize;
        let mut best = self.is_accepting(node).then_some(0);
        if stop_at_first && best.is_some() {
            return best;
        }
        for (i, &b) in text.iter().enumerate() {
            let Some(next) = self.dfa.link(node, b as usize) else {
                break;
            };
            node = next;
            if self.is_accepting(node) {
                best = Some(i + 1);
                if stop_at_first {
                    break;
                }
            }
        }
        best
    }
}
