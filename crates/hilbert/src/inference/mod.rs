//! Inference rules for Hilbert-style proof search

pub mod deduction;
pub mod derivation;
pub mod equality;
pub mod modus_ponens;
pub mod standardize;

pub use deduction::{deduction_decompose, split_conjunctions, Decomposition};
pub use derivation::{Derivation, Rule};
pub use equality::{entails, is_equal, is_instance};
pub use modus_ponens::modus_ponens;
pub use standardize::{is_standard, standardize, standardized};
