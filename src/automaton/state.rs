// src/automaton/state.rs
//
// A state is a set of item ids. Subset construction needs two things from it:
// membership that can grow (closure, merging) and a canonical identity that can
// be looked up cheaply. Items are kept sorted, so the identity is just the
// sequence, and the trie walks it one item at a time.

use hashbrown::HashMap;

use crate::arena::{Arena, Id};

/// Opaque, dense item identifier (an NFA node, or an encoded LR item).
pub type ItemId = usize;

/// Strictly ascending set of item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    items: Vec<ItemId>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<I: IntoIterator<Item = ItemId>>(items: I) -> Self {
        let mut s = Self::new();
        for it in items {
            s.insert(it);
        }
        s
    }

    /// Inserts keeping sort order. Returns false if `item` was already present.
    pub fn insert(&mut self, item: ItemId) -> bool {
        match self.items.binary_search(&item) {
            Ok(_) => false,
            Err(at) => {
                self.items.insert(at, item);
                true
            }
        }
    }

    /// `self += additions`. Returns true if anything was added.
    pub fn join(&mut self, additions: &State) -> bool {
        if additions.items.is_empty() {
            return false;
        }
        let mut merged = Vec::with_capacity(self.items.len() + additions.items.len());
        let (mut i, mut j) = (0, 0);
        let (a, b) = (&self.items, &additions.items);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        let grew = merged.len() > self.items.len();
        self.items = merged;
        grew
    }

    #[inline]
    pub fn contains(&self, item: ItemId) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    #[inline]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Default)]
struct TrieNode {
    value: Option<usize>,
    children: HashMap<ItemId, Id<TrieNode>>,
}

/// Maps a state (by structural identity) to an automaton node index.
pub struct StateTrie {
    nodes: Arena<TrieNode>,
    root: Id<TrieNode>,
    len: usize,
}

impl StateTrie {
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(TrieNode::default());
        Self {
            nodes,
            root,
            len: 0,
        }
    }

    pub fn put(&mut self, state: &State, index: usize) {
        let mut at = self.root;
        for item in state.iter() {
            at = match self.nodes[at].children.get(&item) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.alloc(TrieNode::default());
                    self.nodes[at].children.insert(item, next);
                    next
                }
            };
        }
        if self.nodes[at].value.replace(index).is_none() {
            self.len += 1;
        }
    }

    pub fn get(&self, state: &State) -> Option<usize> {
        let mut at = self.root;
        for item in state.iter() {
            at = *self.nodes[at].children.get(&item)?;
        }
        self.nodes[at].value
    }

    /// Number of states stored (not trie nodes).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for StateTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_ignores_duplicates() {
        let mut s = State::new();
        for it in [5, 1, 3, 1, 5, 0] {
            s.insert(it);
        }
        assert_eq!(s.items(), &[0, 1, 3, 5]);
        assert!(!s.insert(3));
    }

    #[test]
    fn join_accumulates_and_reports_growth() {
        let mut base = State::from_items([1, 4, 9]);
        assert!(base.join(&State::from_items([0, 4, 10])));
        assert_eq!(base.items(), &[0, 1, 4, 9, 10]);
        assert!(!base.join(&State::from_items([1, 9])));
        assert!(!base.join(&State::new()));
    }

    #[test]
    fn trie_is_keyed_on_structure() {
        let mut trie = StateTrie::new();
        trie.put(&State::from_items([1, 2, 3]), 7);
        trie.put(&State::from_items([1, 2]), 8);
        trie.put(&State::new(), 0);

        assert_eq!(trie.get(&State::from_items([3, 2, 1])), Some(7));
        assert_eq!(trie.get(&State::from_items([1, 2])), Some(8));
        assert_eq!(trie.get(&State::from_items([1])), None, "prefix is not a member");
        assert_eq!(trie.get(&State::new()), Some(0));
        assert_eq!(trie.len(), 3);

        trie.put(&State::from_items([1, 2]), 9);
        assert_eq!(trie.get(&State::from_items([1, 2])), Some(9));
        assert_eq!(trie.len(), 3);
    }
}
