// src/bin/gen_parse_tables.rs
// BNF grammar -> LR table JSON.
// Usage:
//   cargo run --bin gen_parse_tables -- <grammar.bnf> [out.json] [start]
//
// `start` names the start nonterminal (default: lhs of the first production).
// LREX_CANONICAL=1 builds full canonical LR(1) instead of merging equal cores.

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use lrex::parser::{Entry, TableKind, bnf, save_table_json};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let grammar_path = args
        .next()
        .ok_or_else(|| anyhow!("usage: gen_parse_tables <grammar.bnf> [out.json] [start]"))?;
    let out_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "tables/parse_tables.json".to_string()),
    );
    let start = args.next();

    let src = fs::read_to_string(&grammar_path)
        .with_context(|| format!("failed to read grammar at {grammar_path}"))?;
    let loaded = bnf::load(&src, start.as_deref()).map_err(|e| anyhow!(e))?;

    let kind = if env::var("LREX_CANONICAL").is_ok_and(|v| v == "1") {
        TableKind::Canonical
    } else {
        TableKind::Merged
    };
    let table = loaded
        .grammar
        .compile_with(loaded.start, kind)
        .ok_or_else(|| anyhow!("grammar has no usable start rule"))?;

    let (mut shifts, mut reduces) = (0usize, 0usize);
    for cell in table.rows.iter().flatten().flatten() {
        match cell {
            Entry::Transition(_) => shifts += 1,
            Entry::Reduce(_) => reduces += 1,
            Entry::Error => {}
        }
    }
    println!(
        "[gen_parse_tables] {kind:?}: {} states, {} tokens, {} rules, {shifts} transitions, {reduces} reduces",
        table.num_states(),
        table.num_tokens(),
        table.rules.len()
    );

    if let Some(parent) = out_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    save_table_json(&out_path, &table)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_parse_tables] wrote {}", out_path.display());
    Ok(())
}
