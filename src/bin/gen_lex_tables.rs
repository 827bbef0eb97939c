// src/bin/gen_lex_tables.rs
// Compile one or more patterns into a single scanner DFA and write it to disk.
// Usage:
//   cargo run --bin gen_lex_tables -- <out.json|out.bin> <pattern> [pattern ...]
//
// Rule i is the i-th pattern; node labels are the lowest rule accepted there.
// LREX_FORMAT=json|bin overrides the format implied by the extension.

use std::{env, fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use lrex::lexer::{Scanner, save_dfa_bin, save_dfa_json};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let out = args
        .next()
        .ok_or_else(|| anyhow!("usage: gen_lex_tables <out.json|out.bin> <pattern>..."))?;
    let patterns: Vec<String> = args.collect();
    if patterns.is_empty() {
        bail!("no patterns given");
    }
    let out_path = Path::new(&out);

    let format = env::var("LREX_FORMAT").unwrap_or_else(|_| {
        out_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json")
            .to_string()
    });

    println!("[gen_lex_tables] compiling {} rules…", patterns.len());
    let scanner = Scanner::new(&patterns).ok_or_else(|| anyhow!("a pattern failed to compile"))?;
    let dfa = scanner.dfa();
    let accepting = dfa.nodes.iter().filter(|n| n.label >= 0).count();
    println!(
        "[gen_lex_tables] {} nodes ({} accepting), {} links per node",
        dfa.num_nodes(),
        accepting,
        dfa.num_items
    );

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    match format.as_str() {
        "json" => save_dfa_json(out_path, dfa),
        "bin" => save_dfa_bin(out_path, dfa),
        other => bail!("unknown format {other:?} (expected json or bin)"),
    }
    .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_lex_tables] wrote {}", out_path.display());
    Ok(())
}
