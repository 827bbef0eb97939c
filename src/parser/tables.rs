// src/parser/tables.rs
// LR action/goto table derived from the item automaton.

use std::{fmt, str::FromStr};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{
    TableKind,
    grammar::Grammar,
    items::{Item, LrBuilder},
};
use crate::automaton::{self, BuildOptions, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Shift a terminal, or goto after reducing to a nonterminal.
    Transition(usize),
    /// Reduce by the rule with this index.
    Reduce(usize),
    Error,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Transition(s) => write!(f, "s{s}"),
            Entry::Reduce(r) => write!(f, "r{r}"),
            Entry::Error => f.write_str("."),
        }
    }
}

impl FromStr for Entry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|e| format!("bad table entry {s:?}: {e}"))
        };
        match s.as_bytes().first() {
            Some(b's') => num(&s[1..]).map(Entry::Transition),
            Some(b'r') => num(&s[1..]).map(Entry::Reduce),
            _ if s == "." => Ok(Entry::Error),
            _ => Err(format!("bad table entry {s:?}")),
        }
    }
}

/// What an emitter or driver needs to know about a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub lhs: usize,
    /// Right-hand side length: entries popped on reduce.
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// One row per state; `None` marks the accept state.
    pub rows: Vec<Option<Vec<Entry>>>,
    pub num_terminals: usize,
    pub num_tokens: usize,
    pub rules: Vec<RuleInfo>,
}

impl Table {
    pub fn num_states(&self) -> usize {
        self.rows.len()
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    pub fn num_terminals(&self) -> usize {
        self.num_terminals
    }

    pub fn row(&self, state: usize) -> Option<&[Entry]> {
        self.rows.get(state)?.as_deref()
    }

    pub fn is_accept(&self, state: usize) -> bool {
        matches!(self.rows.get(state), Some(None))
    }

    /// `Error` for accept rows and out-of-range coordinates.
    pub fn entry(&self, state: usize, token: usize) -> Entry {
        self.row(state)
            .and_then(|r| r.get(token).copied())
            .unwrap_or(Entry::Error)
    }

    pub fn rule_len(&self, rule: usize) -> usize {
        self.rules[rule].len
    }

    pub fn rule_lhs(&self, rule: usize) -> usize {
        self.rules[rule].lhs
    }

    /// Multi-line textbook rendering, one state per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!("{i:>4}:"));
            match row {
                None => out.push_str(" acc"),
                Some(cells) => {
                    for c in cells {
                        out.push_str(&format!(" {:>4}", c.to_string()));
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Grammar {
    /// Builds the table for the augmented start token `start`, merging states
    /// with equal cores. Grammars that are LR(1) but not LALR(1) come out with
    /// reduce/reduce collisions resolved toward the lower rule, so some valid
    /// sentences are rejected; use `TableKind::Canonical` for those.
    pub fn compile(&self, start: usize) -> Option<Table> {
        self.compile_with(start, TableKind::default())
    }

    /// `None` unless `start` is a nonterminal with exactly one production.
    pub fn compile_with(&self, start: usize, kind: TableKind) -> Option<Table> {
        if self.num_terminals() == 0 || !self.is_nonterminal(start) {
            debug!("[lr] start token {start} is not a nonterminal");
            return None;
        }
        let start_rule = match self.productions(start) {
            [only] => *only,
            other => {
                debug!(
                    "[lr] start token {start} has {} productions, expected 1",
                    other.len()
                );
                return None;
            }
        };

        let builder = LrBuilder::new(self, kind);
        let initial = State::from_items([self.item_id(Item {
            rule: start_rule,
            dot: 0,
            lookahead: 0,
        })]);
        let dfa = automaton::build(&builder, initial, BuildOptions { save_states: true });

        let mut rows = Vec::with_capacity(dfa.num_nodes());
        for (n, node) in dfa.nodes.iter().enumerate() {
            let mut row: Vec<Entry> = (0..self.num_tokens())
                .map(|t| dfa.link(n, t).map_or(Entry::Error, Entry::Transition))
                .collect();
            let mut accept = false;

            for id in node.state.iter().flat_map(|s| s.iter()) {
                let item = self.item(id);
                let rule = &self.rules()[item.rule];
                if item.dot != rule.rhs.len() {
                    continue;
                }
                if rule.lhs == start {
                    accept = true;
                    break;
                }
                match row[item.lookahead] {
                    Entry::Error => row[item.lookahead] = Entry::Reduce(item.rule),
                    kept => trace!(
                        "[lr] state {n}, token {}: {kept} kept over r{}",
                        item.lookahead, item.rule
                    ),
                }
            }
            rows.push((!accept).then_some(row));
        }

        debug!(
            "[lr] {:?} table: {} states, {} tokens, {} rules",
            kind,
            rows.len(),
            self.num_tokens(),
            self.rules().len()
        );
        Some(Table {
            rows,
            num_terminals: self.num_terminals(),
            num_tokens: self.num_tokens(),
            rules: self
                .rules()
                .iter()
                .map(|r| RuleInfo {
                    lhs: r.lhs,
                    len: r.rhs.len(),
                })
                .collect(),
        })
    }
}
