//! Hilbert: forward-chaining proof search for propositional logic
//!
//! This library searches for derivations in a Hilbert-style axiomatic
//! system. Axiom schemas are combined by modus ponens with unification,
//! the target is first split into hypotheses with the deduction theorem,
//! and every proof found is reconstructed into numbered, checkable lines.

pub mod config;
pub mod error;
pub mod inference;
pub mod json;
pub mod log;
pub mod logic;
pub mod parser;
pub mod proof;
pub mod prover;
pub mod state;
pub mod unification;

pub use config::ProverConfig;
pub use error::{ProverError, Result};

// Re-export commonly used types from logic
pub use logic::{AtomId, Connective, Expression, NegationSpread, Node, Term};

// Re-export inference types
pub use inference::{
    deduction_decompose, entails, is_equal, is_instance, modus_ponens, split_conjunctions,
    standardize, standardized, Decomposition, Derivation, Rule,
};

pub use parser::{parse_formula, SyntaxError};

pub use proof::{
    reconstruct, Justification, Proof, ProofLine, ReconstructionError, VerificationError,
};

pub use prover::profile::SearchProfile;
pub use prover::{Prover, STANDARD_AXIOMS};

pub use state::{Candidate, EventLog, Phase, ProofResult, SearchEvent, SearchState};

pub use unification::{
    match_expression, rename_apart, unify, unify_apart, Substitution, UnificationError,
    UnificationResult,
};
