//! Epsilon-NFA over the byte alphabet.
//!
//! Node ids are dense indices into `Nfa::nodes`, which is exactly what the
//! subset construction uses as item ids.

use std::ops::Range;

/// Byte alphabet size. The epsilon pseudo-symbol is kept apart in `NfaNode::epsilon`.
pub const NUM_CHARS: usize = 256;

pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
pub struct NfaNode {
    /// Rule accepted when this node is reached (`Some(0)` for a plain regex).
    pub accept: Option<u32>,
    /// Byte-labelled edges.
    pub transitions: Vec<(u8, NodeId)>,
    pub epsilon: Vec<NodeId>,
}

impl NfaNode {
    pub fn targets(&self, byte: u8) -> impl Iterator<Item = NodeId> + '_ {
        self.transitions
            .iter()
            .filter(move |(b, _)| *b == byte)
            .map(|&(_, to)| to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: NodeId,
    pub end: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct Nfa {
    pub nodes: Vec<NfaNode>,
    pub start: NodeId,
}

impl Nfa {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(32),
            start: 0,
        }
    }

    pub fn add_node(&mut self) -> NodeId {
        self.nodes.push(NfaNode::default());
        self.nodes.len() - 1
    }

    #[inline]
    pub fn add_epsilon(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from].epsilon.push(to);
    }

    #[inline]
    pub fn add_byte(&mut self, from: NodeId, to: NodeId, byte: u8) {
        self.nodes[from].transitions.push((byte, to));
    }

    /// One fresh fragment whose two nodes are joined by every byte in `set`.
    pub fn add_set(&mut self, set: &[bool; NUM_CHARS]) -> Fragment {
        let start = self.add_node();
        let end = self.add_node();
        for (b, _) in set.iter().enumerate().filter(|(_, on)| **on) {
            self.add_byte(start, end, b as u8);
        }
        Fragment { start, end }
    }

    /// Copies the nodes in `span` (a compiled fragment that only links within
    /// itself) and returns the copy of `frag`. Must run before `frag` is linked.
    pub fn duplicate(&mut self, span: Range<NodeId>, frag: Fragment) -> Fragment {
        let offset = self.nodes.len() - span.start;
        for id in span {
            let mut node = self.nodes[id].clone();
            for (_, to) in node.transitions.iter_mut() {
                *to += offset;
            }
            for to in node.epsilon.iter_mut() {
                *to += offset;
            }
            self.nodes.push(node);
        }
        Fragment {
            start: frag.start + offset,
            end: frag.end + offset,
        }
    }

    /// `frag*`, `frag+` and `frag?` share one wrapper shape.
    pub fn repeat(&mut self, frag: Fragment, skip: bool, again: bool) -> Fragment {
        let start = self.add_node();
        let end = self.add_node();
        self.add_epsilon(start, frag.start);
        self.add_epsilon(frag.end, end);
        if again {
            self.add_epsilon(frag.end, frag.start);
        }
        if skip {
            self.add_epsilon(start, end);
        }
        Fragment { start, end }
    }

    pub fn concat(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.add_epsilon(a.end, b.start);
        Fragment {
            start: a.start,
            end: b.end,
        }
    }

    pub fn alternate(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start = self.add_node();
        let end = self.add_node();
        self.add_epsilon(start, a.start);
        self.add_epsilon(start, b.start);
        self.add_epsilon(a.end, end);
        self.add_epsilon(b.end, end);
        Fragment { start, end }
    }

    pub fn empty(&mut self) -> Fragment {
        let n = self.add_node();
        Fragment { start: n, end: n }
    }
}
