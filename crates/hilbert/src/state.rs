//! Core state types for forward-chaining proof search.
//!
//! This module holds the search containers (known set, frontier, deferred
//! list, seen keys, provenance), the phase machine, the event log and the
//! result type. The search algorithm itself lives in `Prover`.

use crate::inference::{Derivation, Rule};
use crate::logic::Expression;
use crate::proof::Proof;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Write;

// =============================================================================
// Candidate
// =============================================================================

/// A normalized formula waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical key of `formula`
    pub key: String,
    pub formula: Expression,
}

impl Candidate {
    pub fn new(mut formula: Expression) -> Self {
        formula.normalize();
        Candidate {
            key: formula.to_string(),
            formula,
        }
    }
}

// =============================================================================
// Phase
// =============================================================================

/// Where the search is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Axioms not yet loaded
    Init,
    /// Target not yet decomposed into hypotheses
    Decompose,
    /// Running batches
    Expand,
    Proved,
    TimedOut,
    /// Nothing left to examine and no deepening possible
    Saturated,
    /// `max_known` reached
    ResourceLimit,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Phase::Proved | Phase::TimedOut | Phase::Saturated | Phase::ResourceLimit
        )
    }
}

// =============================================================================
// SearchEvent & EventLog
// =============================================================================

/// Atomic operations on the search state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchEvent {
    /// Axiom, hypothesis or conjunct placed in the frontier
    Seed { formula: String, rule: Rule },
    /// Candidate moved into the known set
    Admit { formula: String },
    /// New formula produced by modus ponens
    Derive {
        formula: String,
        premise: String,
        implication: String,
    },
    /// Size budget raised
    Deepen { max_len: usize, requeued: usize },
}

/// Type alias for the event log
pub type EventLog = Vec<SearchEvent>;

/// Write one JSON object per line
pub fn write_event_log<W: Write>(events: &[SearchEvent], mut writer: W) -> crate::Result<()> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

// =============================================================================
// ProofResult
// =============================================================================

/// Result of a proof search
#[derive(Debug, Clone)]
pub enum ProofResult {
    /// A target was derived
    Proved(Proof),
    /// Deadline passed
    Timeout,
    /// Frontier exhausted and no deepening possible
    Saturated,
    /// Known-set limit reached
    ResourceLimit,
}

impl ProofResult {
    pub fn is_proved(&self) -> bool {
        matches!(self, ProofResult::Proved(_))
    }

    /// Search ended without a proof
    pub fn is_exhausted(&self) -> bool {
        !self.is_proved()
    }

    pub fn proof(&self) -> Option<&Proof> {
        match self {
            ProofResult::Proved(proof) => Some(proof),
            _ => None,
        }
    }

    /// Short status name
    pub fn status(&self) -> &'static str {
        match self {
            ProofResult::Proved(_) => "proved",
            ProofResult::Timeout => "timeout",
            ProofResult::Saturated => "saturated",
            ProofResult::ResourceLimit => "resource_limit",
        }
    }
}

// =============================================================================
// SearchState
// =============================================================================

/// Lean data container for the search.
///
/// Every formula that ever entered the frontier has its key in `seen` and its
/// first derivation in `provenance`, so nothing is enqueued twice.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Admitted formulas in admission order
    pub known: IndexMap<String, Expression>,
    /// Candidates awaiting examination
    pub frontier: VecDeque<Candidate>,
    /// Candidates over the current size budget
    pub deferred: Vec<Candidate>,
    /// Keys of every formula ever enqueued
    pub seen: HashSet<String>,
    /// First derivation of every seen formula
    pub provenance: HashMap<String, Derivation>,
    /// Formulas needed by proofs that may never be admitted (seeds, goals)
    pub extra: HashMap<String, Expression>,
    /// Current size budget; candidates above twice this are deferred
    pub max_len: usize,
    /// Raw event log
    pub event_log: EventLog,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a candidate unless its key was seen before.
    ///
    /// Returns `true` when the candidate is new. The provenance of an already
    /// seen key is never replaced.
    pub fn enqueue(&mut self, candidate: Candidate, derivation: Derivation) -> bool {
        if !self.seen.insert(candidate.key.clone()) {
            return false;
        }
        self.provenance
            .entry(candidate.key.clone())
            .or_insert(derivation);
        self.frontier.push_back(candidate);
        true
    }

    /// Move a candidate into the known set
    pub fn admit(&mut self, candidate: Candidate) {
        self.known.insert(candidate.key, candidate.formula);
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.known.contains_key(key)
    }

    /// Keep a formula available for proof reconstruction
    pub fn remember(&mut self, key: &str, formula: &Expression) {
        if !self.known.contains_key(key) {
            self.extra
                .entry(key.to_string())
                .or_insert_with(|| formula.clone());
        }
    }

    /// Formula for a key, admitted or remembered
    pub fn formula(&self, key: &str) -> Option<&Expression> {
        self.known.get(key).or_else(|| self.extra.get(key))
    }

    /// Raise the size budget and return fitting deferred candidates to the
    /// frontier. Returns how many were requeued.
    pub fn deepen(&mut self, new_max_len: usize) -> usize {
        self.max_len = new_max_len;
        let limit = 2 * new_max_len;
        let (fits, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|c| c.formula.len() <= limit);
        self.deferred = rest;
        let requeued = fits.len();
        self.frontier.extend(fits);
        requeued
    }

    /// Nothing left in the frontier or the deferred list
    pub fn is_drained(&self) -> bool {
        self.frontier.is_empty() && self.deferred.is_empty()
    }
}
