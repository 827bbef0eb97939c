// src/dev/mod.rs
// Helpers shared by the fuzz binary and the randomized tests.
pub mod generator;
