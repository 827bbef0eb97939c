// src/parser/items.rs
//
// LR(1) items as flat ids:
//
//     id = rule.item_base + dot + (|rhs| + 1) * lookahead
//
// `Grammar::item` is the inverse. Within a rule, lookahead is the outer loop
// and dot the inner one, so ids sort by (rule, lookahead, dot).

use std::borrow::Cow;

use super::{TableKind, grammar::Grammar};
use crate::automaton::{ItemId, State, SubsetBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
    pub rule: usize,
    pub dot: usize,
    pub lookahead: usize,
}

impl Grammar {
    pub fn item_id(&self, item: Item) -> ItemId {
        let rule = &self.rules()[item.rule];
        debug_assert!(item.dot <= rule.rhs.len());
        debug_assert!(item.lookahead < self.num_terminals());
        rule.item_base + item.dot + rule.stride() * item.lookahead
    }

    pub fn item(&self, id: ItemId) -> Item {
        let rules = self.rules();
        // Last rule whose block starts at or before `id`.
        let rule = rules.partition_point(|r| r.item_base <= id) - 1;
        let r = &rules[rule];
        let offset = id - r.item_base;
        Item {
            rule,
            dot: offset % r.stride(),
            lookahead: offset / r.stride(),
        }
    }

    /// Symbol right after the dot, if any.
    #[inline]
    pub fn next_symbol(&self, item: Item) -> Option<usize> {
        self.rules()[item.rule].rhs.get(item.dot).copied()
    }
}

/// Subset construction over LR(1) items.
pub struct LrBuilder<'g> {
    grammar: &'g Grammar,
    kind: TableKind,
    /// `first[token]`: terminals a token can start with. Single-token only;
    /// empty productions contribute nothing.
    first: Vec<Vec<usize>>,
}

impl<'g> LrBuilder<'g> {
    pub fn new(grammar: &'g Grammar, kind: TableKind) -> Self {
        let n = grammar.num_tokens();
        let mut first = vec![Vec::new(); n];
        for token in 0..n {
            let mut seen = vec![false; n];
            let mut out = Vec::new();
            Self::collect_first(grammar, token, &mut seen, &mut out);
            out.sort_unstable();
            out.dedup();
            first[token] = out;
        }
        Self {
            grammar,
            kind,
            first,
        }
    }

    fn collect_first(g: &Grammar, token: usize, seen: &mut [bool], out: &mut Vec<usize>) {
        if g.is_terminal(token) {
            out.push(token);
            return;
        }
        if std::mem::replace(&mut seen[token], true) {
            return;
        }
        for &p in g.productions(token) {
            if let Some(&head) = g.rules()[p].rhs.first() {
                Self::collect_first(g, head, seen, out);
            }
        }
    }

    pub fn first(&self, token: usize) -> &[usize] {
        &self.first[token]
    }
}

impl SubsetBuilder for LrBuilder<'_> {
    fn num_items(&self) -> usize {
        self.grammar.num_tokens()
    }

    fn enclose(&self, state: &mut State) {
        let g = self.grammar;
        let mut stack: Vec<ItemId> = state.iter().collect();
        while let Some(id) = stack.pop() {
            let item = g.item(id);
            let Some(b) = g.next_symbol(item) else {
                continue;
            };
            if g.is_terminal(b) {
                continue;
            }
            let rhs = &g.rules()[item.rule].rhs;
            let ahead = rhs.get(item.dot + 1).copied().unwrap_or(item.lookahead);
            for &p in g.productions(b) {
                for &la in self.first(ahead) {
                    let new = g.item_id(Item {
                        rule: p,
                        dot: 0,
                        lookahead: la,
                    });
                    if state.insert(new) {
                        stack.push(new);
                    }
                }
            }
        }
    }

    fn step(&self, state: &State, token: usize) -> State {
        let g = self.grammar;
        State::from_items(state.iter().filter_map(|id| {
            let item = g.item(id);
            (g.next_symbol(item) == Some(token)).then(|| {
                g.item_id(Item {
                    dot: item.dot + 1,
                    ..item
                })
            })
        }))
    }

    fn followups(&self, state: &State, out: &mut [bool]) {
        for id in state.iter() {
            if let Some(b) = self.grammar.next_symbol(self.grammar.item(id)) {
                out[b] = true;
            }
        }
    }

    fn label(&self, _state: &State) -> i64 {
        0
    }

    /// `Merged` keys a state by its core: every lookahead folded onto terminal 0.
    fn canonicalize<'a>(&self, state: &'a State) -> Cow<'a, State> {
        match self.kind {
            TableKind::Canonical => Cow::Borrowed(state),
            TableKind::Merged => {
                let g = self.grammar;
                Cow::Owned(State::from_items(state.iter().map(|id| {
                    g.item_id(Item {
                        lookahead: 0,
                        ..g.item(id)
                    })
                })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> Grammar {
        // a=0 b=1 $=2 | S'=3 X=4 S=5
        let mut g = Grammar::new(3, 6);
        g.add_rule(5, &[3, 2]);
        g.add_rule(3, &[4, 4]);
        g.add_rule(4, &[0, 4]);
        g.add_rule(4, &[1]);
        g
    }

    #[test]
    fn item_ids_decode_back() {
        let g = textbook();
        for id in 0..g.num_items() {
            assert_eq!(g.item_id(g.item(id)), id);
        }
        let it = Item {
            rule: 2,
            dot: 1,
            lookahead: 2,
        };
        assert_eq!(g.item(g.item_id(it)), it);
    }

    #[test]
    fn closure_of_start_item_uses_next_symbol_lookaheads() {
        let g = textbook();
        let b = LrBuilder::new(&g, TableKind::Canonical);
        let mut s = State::from_items([g.item_id(Item {
            rule: 0,
            dot: 0,
            lookahead: 0,
        })]);
        b.enclose(&mut s);
        // S->.S'$ ; S'->.XX,$ ; X->.aX,{a,b} ; X->.b,{a,b}
        assert_eq!(s.len(), 1 + 1 + 2 + 2);
        assert_eq!(b.first(3), &[0, 1]);
        for la in [0, 1] {
            assert!(s.contains(g.item_id(Item {
                rule: 3,
                dot: 0,
                lookahead: la,
            })));
        }
    }
}
