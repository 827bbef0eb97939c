// src/lib.rs
pub mod arena;
pub mod automaton;
pub mod dev;
pub mod lexer;
pub mod parser;

pub use automaton::{BuildOptions, Dfa, DfaNode, REJECT, State, SubsetBuilder};
pub use lexer::{Regex, Scanner};
pub use parser::{Entry, Grammar, Table, TableKind};
