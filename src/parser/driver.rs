// src/parser/driver.rs
// Table-driven shift/reduce loop.

use log::trace;

use super::tables::{Entry, Table};

/// Runs `tokens` (terminal ids, without the end marker) through `table`, feeding
/// `eof` once the input is exhausted. Returns the rules reduced, in order;
/// accepting before the whole input is consumed is an error.
pub fn parse(table: &Table, tokens: &[usize], eof: usize) -> Result<Vec<usize>, String> {
    let mut stack: Vec<usize> = vec![0];
    let mut reduced = Vec::new();
    let mut pos = 0usize;

    loop {
        let top = *stack.last().ok_or("parse stack underflow")?;
        if table.is_accept(top) {
            if pos != tokens.len() + 1 {
                return Err(format!(
                    "accepted at position {}, {} token(s) left over",
                    pos.saturating_sub(1),
                    (tokens.len() + 1).saturating_sub(pos)
                ));
            }
            return Ok(reduced);
        }
        let tok = tokens.get(pos).copied().unwrap_or(eof);
        match table.entry(top, tok) {
            Entry::Transition(next) => {
                if pos > tokens.len() {
                    return Err(format!("state {top} shifts the end marker twice"));
                }
                trace!("[driver] shift {tok} -> {next}");
                stack.push(next);
                pos += 1;
            }
            Entry::Reduce(rule) => {
                let len = table.rule_len(rule);
                if stack.len() <= len {
                    return Err(format!(
                        "reduce by r{rule} needs {len} entries, stack has {}",
                        stack.len() - 1
                    ));
                }
                stack.truncate(stack.len() - len);
                reduced.push(rule);

                let under = *stack.last().ok_or("parse stack underflow")?;
                let lhs = table.rule_lhs(rule);
                match table.entry(under, lhs) {
                    Entry::Transition(next) => {
                        trace!("[driver] reduce r{rule}, goto {lhs} -> {next}");
                        stack.push(next);
                    }
                    other => {
                        return Err(format!(
                            "no goto on {lhs} from state {under} after r{rule} (found {other})"
                        ));
                    }
                }
            }
            Entry::Error => {
                let what = if pos < tokens.len() {
                    format!("token {tok} at position {pos}")
                } else {
                    "end of input".to_string()
                };
                return Err(format!("syntax error: unexpected {what} in state {top}"));
            }
        }
    }
}
