// src/parser/mod.rs
pub mod bnf;
pub mod driver;
pub mod grammar;
pub mod io;
pub mod items;
pub mod tables;

pub use grammar::{Grammar, Rule};
pub use io::{load_table_json_bytes, save_table_json};
pub use items::{Item, LrBuilder};
pub use tables::{Entry, RuleInfo, Table};

/// How LR(1) states are deduplicated during construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableKind {
    /// States with the same core share a node; their lookaheads are joined.
    #[default]
    Merged,
    /// Full canonical LR(1): states differing only in lookahead stay apart.
    Canonical,
}
