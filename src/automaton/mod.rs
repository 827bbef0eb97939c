//! Generic subset construction.
//!
//! `build::build` turns any non-deterministic "set of items" space into a dense
//! deterministic transition table. What an item is, how a set is closed and how
//! it moves on a token is supplied by a [`SubsetBuilder`]; the regex facade and
//! the LR table generator are the two implementors in this crate.

use std::borrow::Cow;

pub mod build;
pub mod state;

pub use build::build;
pub use state::{ItemId, State, StateTrie};

/// Link value meaning "no transition". Any link `>= num_nodes` is treated the same.
pub const REJECT: u32 = u32::MAX;

/// The five operations subset construction is parametrized by.
pub trait SubsetBuilder {
    /// Width of the token alphabet; every node gets this many links.
    fn num_items(&self) -> usize;

    /// Extends `state` in place to its closure.
    fn enclose(&self, state: &mut State);

    /// One-token move, without closure.
    fn step(&self, state: &State, token: usize) -> State;

    /// Marks in `out` every token that could leave `state`. `out` arrives cleared
    /// and is `num_items()` long.
    fn followups(&self, state: &State, out: &mut [bool]);

    /// Per-node payload stored in [`DfaNode::label`].
    fn label(&self, state: &State) -> i64;

    /// Key under which `state` is deduplicated. Identity unless a variant merges
    /// structurally different states.
    fn canonicalize<'a>(&self, state: &'a State) -> Cow<'a, State> {
        Cow::Borrowed(state)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep the item set behind every node (merged states are joined).
    pub save_states: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaNode {
    /// `links[token]` is a node index or [`REJECT`].
    pub links: Vec<u32>,
    pub label: i64,
    /// Only populated with `save_states`.
    pub state: Option<State>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub nodes: Vec<DfaNode>,
    pub num_items: usize,
}

impl Dfa {
    pub fn new(num_items: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(32),
            num_items,
        }
    }

    pub(crate) fn add_node(&mut self, label: i64) -> usize {
        self.nodes.push(DfaNode {
            links: vec![REJECT; self.num_items],
            label,
            state: None,
        });
        self.nodes.len() - 1
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Follows `node --token-->`; `None` for rejects and out-of-range targets.
    #[inline]
    pub fn link(&self, node: usize, token: usize) -> Option<usize> {
        let to = *self.nodes.get(node)?.links.get(token)? as usize;
        (to < self.nodes.len()).then_some(to)
    }

    #[inline]
    pub fn label(&self, node: usize) -> i64 {
        self.nodes[node].label
    }

    /// Equality on `(num_nodes, labels, transitions)`, ignoring retained states.
    pub fn same_table(&self, other: &Dfa) -> bool {
        self.num_items == other.num_items
            && self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(&other.nodes)
                .all(|(a, b)| a.label == b.label && a.links == b.links)
    }
}
