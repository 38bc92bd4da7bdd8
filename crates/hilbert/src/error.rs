//! Error types for the prover

use crate::parser::SyntaxError;
use crate::proof::{ReconstructionError, VerificationError};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProverError {
    #[error("Parse error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Not enough axioms: {required} required, {supplied} supplied")]
    NotEnoughAxioms { required: usize, supplied: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Proof reconstruction failed: {0}")]
    Reconstruction(#[from] ReconstructionError),

    #[error("Proof verification failed: {0}")]
    Verification(#[from] VerificationError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProverError>;
