//! Fitch-style natural deduction proofs: loading them from indented text,
//! checking every line against the rules of propositional logic, searching
//! for missing justifications and editing them without breaking citations.

pub mod config;
pub mod diagnostics;
pub mod edit;
pub mod formula;
pub mod parse;
pub mod proof;
pub mod report;
pub mod semant;
pub mod strings;
pub mod util;
