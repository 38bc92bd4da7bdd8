//! Unification algorithm for propositional formulas

mod matching;
mod mgu;
mod substitution;

#[cfg(test)]
mod proptest_tests;

pub use matching::match_expression;
pub use mgu::{
    rename_apart, unify, unify_apart, unify_with_depth, UnificationError, UnificationResult,
    DEFAULT_CHAIN_DEPTH,
};
pub use substitution::Substitution;
