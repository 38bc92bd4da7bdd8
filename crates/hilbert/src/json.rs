//! JSON serialization types for proof data

use crate::proof::{Proof, ProofLine};
use crate::prover::profile::SearchProfile;
use crate::state::ProofResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JSON representation of a proof line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLineJson {
    pub number: usize,
    pub rule: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<usize>,
    pub formula: String,
}

impl From<&ProofLine> for ProofLineJson {
    fn from(line: &ProofLine) -> Self {
        ProofLineJson {
            number: line.number,
            rule: line.justification.rule().to_string(),
            references: line.justification.references(),
            formula: line.formula.to_string(),
        }
    }
}

/// JSON representation of a proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    pub lines: Vec<ProofLineJson>,
}

impl From<&Proof> for ProofJson {
    fn from(proof: &Proof) -> Self {
        ProofJson {
            lines: proof.lines.iter().map(ProofLineJson::from).collect(),
        }
    }
}

/// JSON representation of a search result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum SearchResultJson {
    Proved {
        proof: ProofJson,
        time_seconds: f64,
    },
    Timeout {
        known: usize,
        time_seconds: f64,
    },
    Saturated {
        known: usize,
        time_seconds: f64,
    },
    ResourceLimit {
        known: usize,
        time_seconds: f64,
    },
}

impl SearchResultJson {
    /// `known` is the size of the known set when the search stopped
    pub fn new(result: &ProofResult, known: usize, elapsed: Duration) -> Self {
        let time_seconds = elapsed.as_secs_f64();
        match result {
            ProofResult::Proved(proof) => SearchResultJson::Proved {
                proof: ProofJson::from(proof),
                time_seconds,
            },
            ProofResult::Timeout => SearchResultJson::Timeout {
                known,
                time_seconds,
            },
            ProofResult::Saturated => SearchResultJson::Saturated {
                known,
                time_seconds,
            },
            ProofResult::ResourceLimit => SearchResultJson::ResourceLimit {
                known,
                time_seconds,
            },
        }
    }
}

/// Result plus optional profile, as printed by the `hilbert` binary
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport<'a> {
    pub target: String,
    #[serde(flatten)]
    pub result: SearchResultJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<&'a SearchProfile>,
}
