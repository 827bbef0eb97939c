// src/automaton/build.rs
use log::{debug, trace};

use super::{BuildOptions, Dfa, REJECT, State, StateTrie, SubsetBuilder};
use crate::arena::{Arena, Id};

/// Breadth-first subset construction, batched by round.
///
/// Node 0 is the closure of `initial`. A node's outgoing link for a token is
/// written once; later discoveries of the same `(node, token)` edge are ignored.
/// With `save_states`, a state that canonicalizes onto an existing node is
/// joined into that node's item set, and queued again if the set grew so the
/// new members reach its successors too.
pub fn build<B: SubsetBuilder>(builder: &B, initial: State, opts: BuildOptions) -> Dfa {
    let num_items = builder.num_items();
    let mut dfa = Dfa::new(num_items);
    let mut trie = StateTrie::new();

    let mut unchecked: Arena<State> = Arena::new();
    let mut queue: Vec<(Id<State>, usize)> = Vec::new();

    let mut initial = initial;
    builder.enclose(&mut initial);
    let root = dfa.add_node(builder.label(&initial));
    trie.put(builder.canonicalize(&initial).as_ref(), root);
    if opts.save_states {
        dfa.nodes[root].state = Some(initial.clone());
    }
    queue.push((unchecked.alloc(initial), root));

    // Caller-owned scratch for followups, reused across every state.
    let mut followups = vec![false; num_items];
    let mut round = 0usize;

    while !queue.is_empty() {
        // Scratch states for the next round live here; the arena of the round
        // just processed is dropped wholesale at the end of the iteration.
        let mut next: Arena<State> = Arena::new();
        let mut next_queue: Vec<(Id<State>, usize)> = Vec::new();

        for &(id, from) in &queue {
            let state = &unchecked[id];
            followups.fill(false);
            builder.followups(state, &mut followups);

            for token in 0..num_items {
                if !followups[token] {
                    continue;
                }
                let target_id = next.alloc(builder.step(state, token));
                let target = &mut next[target_id];
                builder.enclose(target);

                let (to, fresh) = {
                    let key = builder.canonicalize(target);
                    match trie.get(&key) {
                        Some(n) => (n, false),
                        None => {
                            let n = dfa.add_node(builder.label(target));
                            trie.put(&key, n);
                            (n, true)
                        }
                    }
                };

                let link = &mut dfa.nodes[from].links[token];
                if *link == REJECT {
                    *link = to as u32;
                }

                let requeue = if fresh {
                    if opts.save_states {
                        dfa.nodes[to].state = Some(target.clone());
                    }
                    true
                } else if opts.save_states {
                    let node = &mut dfa.nodes[to];
                    let grew = match node.state.as_mut() {
                        Some(saved) => saved.join(target),
                        None => false,
                    };
                    if grew {
                        trace!("[automaton] node {to} grew by merge from node {from}");
                        if let Some(saved) = node.state.as_ref() {
                            node.label = builder.label(saved);
                        }
                    }
                    grew
                } else {
                    false
                };

                if requeue {
                    next_queue.push((target_id, to));
                } else {
                    next.free(target_id);
                }
            }
        }

        round += 1;
        debug!(
            "[automaton] round {round}: nodes={} queued={}",
            dfa.nodes.len(),
            next_queue.len()
        );

        unchecked = next;
        queue = next_queue;
    }

    dfa
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    /// Items are integers mod `n`; token `t` adds `t + 1`; closure adds `i + n/2`.
    /// Canonical form folds each item onto `i % (n/2)` when `merge` is set.
    struct Modular {
        n: usize,
        merge: bool,
    }

    impl SubsetBuilder for Modular {
        fn num_items(&self) -> usize {
            2
        }
        fn enclose(&self, state: &mut State) {
            let extra: Vec<_> = state.iter().map(|i| (i + self.n / 2) % self.n).collect();
            for i in extra {
                state.insert(i);
            }
        }
        fn step(&self, state: &State, token: usize) -> State {
            State::from_items(state.iter().map(|i| (i + token + 1) % self.n))
        }
        fn followups(&self, _state: &State, out: &mut [bool]) {
            out.fill(true);
        }
        fn label(&self, state: &State) -> i64 {
            state.len() as i64
        }
        fn canonicalize<'a>(&self, state: &'a State) -> Cow<'a, State> {
            if self.merge {
                Cow::Owned(State::from_items(state.iter().map(|i| i % (self.n / 2))))
            } else {
                Cow::Borrowed(state)
            }
        }
    }

    #[test]
    fn links_stay_in_range_and_node_zero_is_initial() {
        let b = Modular { n: 8, merge: false };
        let dfa = build(&b, State::from_items([0]), BuildOptions::default());
        assert!(dfa.num_nodes() > 1);
        for (i, node) in dfa.nodes.iter().enumerate() {
            assert!(node.state.is_none());
            for t in 0..2 {
                assert!(dfa.link(i, t).is_some(), "total function expected");
            }
        }
        assert_eq!(dfa.label(0), 2, "closure of {{0}} is {{0, 4}}");
    }

    #[test]
    fn merging_canonicalizer_collapses_nodes_and_joins_states() {
        let plain = build(
            &Modular { n: 8, merge: false },
            State::from_items([0]),
            BuildOptions { save_states: true },
        );
        let merged = build(
            &Modular { n: 8, merge: true },
            State::from_items([0]),
            BuildOptions { save_states: true },
        );
        assert!(merged.num_nodes() <= plain.num_nodes());
        for node in &merged.nodes {
            let saved = node.state.as_ref().expect("save_states keeps items");
            assert_eq!(node.label, saved.len() as i64);
        }
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let b = Modular { n: 12, merge: false };
        let one = build(&b, State::from_items([1]), BuildOptions::default());
        let two = build(&b, State::from_items([1]), BuildOptions::default());
        assert!(one.same_table(&two));
    }
}
