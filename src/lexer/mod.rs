// src/lexer/mod.rs
pub mod io;
pub mod nfa;
pub mod parse;
pub mod regex;
pub mod scanner;

pub use io::{load_dfa_bin_bytes, load_dfa_json_bytes, save_dfa_bin, save_dfa_json};
pub use parse::RegexError;
pub use regex::Regex;
pub use scanner::{Scanner, Token};
