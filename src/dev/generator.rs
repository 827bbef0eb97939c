// src/dev/generator.rs
// Random well-formed patterns and texts over a tiny alphabet, so that random
// texts actually hit the patterns often enough to be interesting.

use rand::Rng;

const ALPHABET: &[u8] = b"abc";

/// A pattern that always compiles. `depth` bounds the nesting.
pub fn gen_pattern<R: Rng>(rng: &mut R, depth: u32) -> String {
    let mut out = String::new();
    push_alternation(rng, depth, &mut out);
    out
}

fn push_alternation<R: Rng>(rng: &mut R, depth: u32, out: &mut String) {
    push_sequence(rng, depth, out);
    while depth > 0 && rng.random_bool(0.2) {
        out.push('|');
        push_sequence(rng, depth, out);
    }
}

fn push_sequence<R: Rng>(rng: &mut R, depth: u32, out: &mut String) {
    for _ in 0..rng.random_range(1..=3) {
        push_atom(rng, depth, out);
        match rng.random_range(0..10) {
            0 => out.push('*'),
            1 => out.push('+'),
            2 => out.push('?'),
            3 => {
                let lo = rng.random_range(0..3);
                match rng.random_range(0..3) {
                    0 => out.push_str(&format!("{{{lo}}}")),
                    1 => out.push_str(&format!("{{{lo},}}")),
                    _ => out.push_str(&format!("{{{lo},{}}}", lo + rng.random_range(0..3))),
                }
            }
            _ => {}
        }
    }
}

fn push_atom<R: Rng>(rng: &mut R, depth: u32, out: &mut String) {
    let pick = rng.random_range(0..8);
    if depth > 0 && pick == 0 {
        out.push('(');
        push_alternation(rng, depth - 1, out);
        out.push(')');
        return;
    }
    match pick {
        1 => out.push('.'),
        2 => out.push_str(if rng.random_bool(0.5) { "[ab]" } else { "[^a]" }),
        _ => out.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char),
    }
}

/// `len` bytes drawn from the pattern alphabet.
pub fn gen_text<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
