// src/bin/fuzz_regex.rs
// Random patterns x random texts, checked for internal consistency:
//   - greedy match is never shorter than the non-greedy one
//   - a match length never exceeds the text
//   - recompiling a pattern yields the same table
// Knobs: FUZZ_SEED (default 1), FUZZ_CASES (default 2000), FUZZ_LEN (default 24).

use std::time::Instant;

use anyhow::{Result, bail};
use lrex::{
    Regex,
    dev::generator::{gen_pattern, gen_text},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn check_case(seed: u64, max_len: usize) -> Result<(), String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let pattern = gen_pattern(&mut rng, 2);
    let Some(re) = Regex::compile(&pattern) else {
        return Err(format!("generated pattern {pattern:?} did not compile"));
    };
    let Some(again) = Regex::compile(&pattern) else {
        return Err(format!("{pattern:?} compiled once but not twice"));
    };
    if !re.dfa().same_table(again.dfa()) {
        return Err(format!("{pattern:?} is not deterministic across compiles"));
    }
    for _ in 0..8 {
        let len = rng.random_range(0..=max_len);
        let text = gen_text(&mut rng, len);
        let lazy = re.nongreedy_match(&text);
        let greedy = re.greedy_match(&text);
        match (lazy, greedy) {
            (Some(l), Some(g)) if l > g => {
                return Err(format!("{pattern:?} on {text:?}: nongreedy {l} > greedy {g}"));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(format!(
                    "{pattern:?} on {text:?}: nongreedy={lazy:?} greedy={greedy:?}"
                ));
            }
            _ => {}
        }
        if greedy.is_some_and(|g| g > text.len()) {
            return Err(format!("{pattern:?} on {text:?}: match past end"));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let seed = env_u64("FUZZ_SEED", 1);
    let cases = env_u64("FUZZ_CASES", 2000);
    let max_len = env_u64("FUZZ_LEN", 24) as usize;

    println!("[fuzz_regex] seed={seed} cases={cases} max_len={max_len}");
    let t0 = Instant::now();
    let failures: Vec<(u64, String)> = (0..cases)
        .into_par_iter()
        .filter_map(|i| {
            let case_seed = seed.wrapping_mul(1_000_003).wrapping_add(i);
            check_case(case_seed, max_len).err().map(|e| (case_seed, e))
        })
        .collect();

    println!(
        "[fuzz_regex] {} cases in {} ms, {} failures",
        cases,
        t0.elapsed().as_millis(),
        failures.len()
    );
    for (s, e) in failures.iter().take(10) {
        eprintln!("[fuzz_regex] seed {s}: {e}");
    }
    if !failures.is_empty() {
        bail!("{} failing cases", failures.len());
    }
    Ok(())
}
