// src/main.rs
// Usage:
//   lrex <pattern> [text ...]     # texts default to stdin lines
//
// Prints the shortest and longest accepting prefix of each text.

use std::{
    env,
    io::{self, BufRead},
};

use anyhow::{Context, Result, anyhow};
use lrex::Regex;

fn report(re: &Regex, text: &str) {
    let show = |m: Option<usize>| m.map_or_else(|| "-".to_string(), |n| n.to_string());
    let greedy = re.greedy_match(text);
    println!(
        "{text:?}\tnongreedy={}\tgreedy={}\t{}",
        show(re.nongreedy_match(text)),
        show(greedy),
        match greedy {
            Some(n) if n == text.len() => "full",
            Some(_) => "prefix",
            None => "no match",
        }
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let pattern = args
        .next()
        .ok_or_else(|| anyhow!("usage: lrex <pattern> [text ...]"))?;
    let re = Regex::compile(&pattern).ok_or_else(|| anyhow!("invalid pattern {pattern:?}"))?;
    println!("[lrex] {pattern:?}: {} dfa nodes", re.num_nodes());

    let texts: Vec<String> = args.collect();
    if !texts.is_empty() {
        for t in &texts {
            report(&re, t);
        }
        return Ok(());
    }
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        report(&re, &line);
    }
    Ok(())
}
