//! Prover: orchestrates forward-chaining proof search.
//!
//! The `Prover` loads axiom schemas, decomposes the target with the deduction
//! theorem and conjunction splitting, then expands the known set in batches:
//! every admitted formula is combined with every known formula by modus
//! ponens, in both argument orders. Candidates larger than twice the current
//! size budget are deferred; a batch that admits nothing raises the budget
//! (iterative deepening).
//!
//! Use `prove()` to run to completion, or `step()` for incremental execution.

pub mod profile;

use self::profile::SearchProfile;
use crate::config::ProverConfig;
use crate::error::{ProverError, Result};
use crate::inference::{
    deduction_decompose, entails, is_equal, is_instance, modus_ponens, split_conjunctions,
    standardize, Derivation,
};
use crate::log::targets;
use crate::logic::Expression;
use crate::parser::parse_formula;
use crate::proof::{self, Proof, VerificationError};
use crate::state::{Candidate, Phase, ProofResult, SearchEvent, SearchState};
use log::{debug, info};
use std::io::Write;
use std::time::Instant;

/// The three Łukasiewicz axiom schemas
pub const STANDARD_AXIOMS: [&str; 3] = [
    "a>(b>a)",
    "(a>(b>c))>((a>b)>(a>c))",
    "(!a>!b)>((!a>b)>a)",
];

/// Per-problem search engine.
pub struct Prover {
    /// Prover configuration (limits, timeouts, etc.)
    pub config: ProverConfig,
    /// Search containers and event log
    pub state: SearchState,
    phase: Phase,
    /// Axiom schemas, generalized, standardized and normalized
    axioms: Vec<Expression>,
    /// Target with variables frozen, standardized
    target: Expression,
    /// Hypotheses and conjuncts from decomposition
    hypotheses: Vec<Expression>,
    /// Residual target and the whole target
    targets: Vec<Expression>,
    /// `targets` with frozen constants read back as variables
    schemas: Vec<Expression>,
    schema_keys: Vec<String>,
    /// Profiling data (None if profiling disabled)
    profile: Option<SearchProfile>,
    start_time: Option<Instant>,
    deadline: Option<Instant>,
    outcome: Option<ProofResult>,
}

impl Prover {
    /// Create a prover for `target` from the given axioms.
    ///
    /// Constants in axioms are read as schema variables; variables in the
    /// target are frozen into fresh constants.
    pub fn new(axioms: Vec<Expression>, target: Expression, config: ProverConfig) -> Result<Self> {
        config.validate()?;
        if axioms.len() < config.min_axioms {
            return Err(ProverError::NotEnoughAxioms {
                required: config.min_axioms,
                supplied: axioms.len(),
            });
        }

        let axioms = axioms
            .into_iter()
            .map(|mut axiom| {
                axiom.generalize();
                standardize(&mut axiom);
                axiom.normalize();
                axiom
            })
            .collect();

        let mut target = target;
        target.freeze();
        standardize(&mut target);

        let profile = if config.enable_profiling {
            Some(SearchProfile::default())
        } else {
            None
        };

        Ok(Prover {
            config,
            state: SearchState::new(),
            phase: Phase::Init,
            axioms,
            target,
            hypotheses: Vec::new(),
            targets: Vec::new(),
            schemas: Vec::new(),
            schema_keys: Vec::new(),
            profile,
            start_time: None,
            deadline: None,
            outcome: None,
        })
    }

    /// Parse axioms and target, then create the prover
    pub fn from_strings(axioms: &[&str], target: &str, config: ProverConfig) -> Result<Self> {
        let axioms = axioms
            .iter()
            .map(|a| parse_formula(a))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let target = parse_formula(target)?;
        Prover::new(axioms, target, config)
    }

    /// Prover over [`STANDARD_AXIOMS`]
    pub fn with_standard_axioms(target: &str, config: ProverConfig) -> Result<Self> {
        Prover::from_strings(&STANDARD_AXIOMS, target, config)
    }

    /// Run the search to completion.
    pub fn prove(&mut self) -> Result<ProofResult> {
        loop {
            if let Some(result) = self.step()? {
                return Ok(result);
            }
        }
    }

    /// Execute one step of the search.
    ///
    /// Returns `Some(result)` once the search is complete, `None` to continue.
    /// Loading axioms and decomposing the target take one step each; after
    /// that every step is one batch. The deadline is only checked between
    /// batches.
    pub fn step(&mut self) -> Result<Option<ProofResult>> {
        if let Some(result) = &self.outcome {
            return Ok(Some(result.clone()));
        }
        if self.start_time.is_none() {
            let now = Instant::now();
            self.start_time = Some(now);
            self.deadline = now.checked_add(self.config.timeout);
        }

        match self.phase {
            Phase::Init => {
                self.init();
                Ok(None)
            }
            Phase::Decompose => {
                self.decompose();
                Ok(None)
            }
            Phase::Expand => {
                if self.deadline.is_some_and(|d| Instant::now() >= d) {
                    return Ok(Some(self.finish(ProofResult::Timeout)));
                }
                self.expand_batch()
            }
            _ => Ok(self.outcome.clone()),
        }
    }

    // =========================================================================
    // Public accessors
    // =========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn axioms(&self) -> &[Expression] {
        &self.axioms
    }

    pub fn hypotheses(&self) -> &[Expression] {
        &self.hypotheses
    }

    /// Prepared target (frozen and standardized)
    pub fn target(&self) -> &Expression {
        &self.target
    }

    /// Formulas whose derivation ends the search
    pub fn targets(&self) -> &[Expression] {
        &self.targets
    }

    /// Get the event log (empty unless `record_events` is set).
    pub fn event_log(&self) -> &[SearchEvent] {
        &self.state.event_log
    }

    /// Get profiling data (None if profiling was not enabled).
    pub fn profile(&self) -> Option<&SearchProfile> {
        self.profile.as_ref()
    }

    /// Append the event log to `writer` as JSON lines
    pub fn write_event_log<W: Write>(&self, writer: W) -> Result<()> {
        crate::state::write_event_log(&self.state.event_log, writer)
    }

    /// Replay a proof against this prover's axioms, hypotheses and targets
    pub fn verify_proof(&self, proof: &Proof) -> std::result::Result<(), VerificationError> {
        let goals: Vec<Expression> = self.targets.iter().chain(&self.schemas).cloned().collect();
        proof.verify(&self.axioms, &self.hypotheses, &goals)
    }

    // =========================================================================
    // Phases
    // =========================================================================

    fn init(&mut self) {
        let t = self.profile.as_ref().map(|_| Instant::now());
        let axioms = std::mem::take(&mut self.axioms);
        for axiom in &axioms {
            self.seed(axiom.clone(), Derivation::axiom());
        }
        self.axioms = axioms;
        debug!(target: targets::SEARCH, "loaded {} axioms", self.axioms.len());

        if let (Some(p), Some(t)) = (self.profile.as_mut(), t) {
            p.init_time = t.elapsed();
        }
        self.phase = Phase::Decompose;
    }

    fn decompose(&mut self) {
        let t = self.profile.as_ref().map(|_| Instant::now());

        let (mut hypotheses, residual) = if self.config.deduction {
            let decomposition = deduction_decompose(&self.target);
            (decomposition.hypotheses, decomposition.target)
        } else {
            (Vec::new(), self.target.clone())
        };
        let sources = if self.config.split_conjunctions {
            split_conjunctions(&mut hypotheses)
        } else {
            vec![None; hypotheses.len()]
        };

        let keys: Vec<String> = hypotheses.iter().map(|h| h.canonical_key()).collect();
        for (hypothesis, source) in hypotheses.iter().zip(&sources) {
            let derivation = match source {
                None => Derivation::hypothesis(),
                Some(src) => Derivation::conjunct(keys[*src].clone()),
            };
            self.seed(hypothesis.clone(), derivation);
        }
        self.hypotheses = hypotheses;

        self.targets = vec![residual];
        if !is_equal(&self.targets[0], &self.target) {
            self.targets.push(self.target.clone());
        }
        self.schemas = self
            .targets
            .iter()
            .map(|target| {
                let mut schema = target.clone();
                schema.generalize();
                schema.normalize();
                schema
            })
            .collect();
        self.schema_keys = self.schemas.iter().map(Expression::canonical_key).collect();

        let largest_seed = self
            .state
            .frontier
            .iter()
            .map(|c| c.formula.len())
            .chain(self.targets.iter().map(Expression::len))
            .max()
            .unwrap_or(1);
        self.state.max_len = self.config.initial_max_len.unwrap_or(largest_seed);
        if self.config.max_len_limit != 0 {
            self.state.max_len = self.state.max_len.min(self.config.max_len_limit);
        }

        debug!(
            target: targets::SEARCH,
            "target {} -> {} hypotheses, residual {}, max_len {}",
            self.target,
            self.hypotheses.len(),
            self.targets[0],
            self.state.max_len
        );

        if let (Some(p), Some(t)) = (self.profile.as_mut(), t) {
            p.decompose_time = t.elapsed();
        }
        self.phase = Phase::Expand;
    }

    /// Process one frontier snapshot
    fn expand_batch(&mut self) -> Result<Option<ProofResult>> {
        let t = self.profile.as_ref().map(|_| Instant::now());
        let available = self.state.frontier.len();
        let budget = match self.config.batch_limit {
            0 => available,
            limit => limit.min(available),
        };

        let mut examined = 0;
        let mut admitted = 0;
        for _ in 0..budget {
            let Some(candidate) = self.state.frontier.pop_front() else {
                break;
            };
            examined += 1;
            if let Some(p) = self.profile.as_mut() {
                p.candidates_examined += 1;
            }

            if candidate.formula.len() > 2 * self.state.max_len {
                if let Some(p) = self.profile.as_mut() {
                    p.deferred += 1;
                }
                self.state.deferred.push(candidate);
                continue;
            }

            if self.state.is_known(&candidate.key) {
                if let Some(p) = self.profile.as_mut() {
                    p.duplicates += 1;
                }
                continue;
            }

            if let Some(proof) = self.goal_test(&candidate)? {
                return Ok(Some(self.finish(ProofResult::Proved(proof))));
            }

            if self.config.max_known != 0 && self.state.known.len() >= self.config.max_known {
                self.state.frontier.push_front(candidate);
                return Ok(Some(self.finish(ProofResult::ResourceLimit)));
            }

            self.admit(candidate);
            admitted += 1;
        }

        if let (Some(p), Some(t)) = (self.profile.as_mut(), t) {
            p.batches += 1;
            p.expand_time += t.elapsed();
            p.max_frontier_size = p.max_frontier_size.max(self.state.frontier.len());
        }
        debug!(
            target: targets::SEARCH,
            "batch: examined {}, admitted {}, known {}, frontier {}, deferred {}",
            examined,
            admitted,
            self.state.known.len(),
            self.state.frontier.len(),
            self.state.deferred.len()
        );

        // With a capped batch, unexamined candidates may still fit the budget.
        if admitted == 0 && self.state.frontier.is_empty() {
            if !self.deepen() {
                return Ok(Some(self.finish(ProofResult::Saturated)));
            }
        } else if self.state.is_drained() {
            return Ok(Some(self.finish(ProofResult::Saturated)));
        }
        Ok(None)
    }

    /// Does `candidate` close the search? Returns the reconstructed proof.
    fn goal_test(&mut self, candidate: &Candidate) -> Result<Option<Proof>> {
        let hit = self
            .targets
            .iter()
            .zip(&self.schema_keys)
            .find_map(|(target, schema_key)| {
                if is_equal(&candidate.formula, target) {
                    Some(None)
                } else if self.config.match_instances && is_instance(&candidate.formula, target) {
                    Some(Some((target.clone(), Derivation::instance(candidate.key.clone()))))
                } else if self.config.entailment && entails(&candidate.formula, target) {
                    Some(Some((target.clone(), Derivation::entailment(candidate.key.clone()))))
                } else if candidate.key == *schema_key {
                    // A derived schema whose variables stand for the frozen constants
                    Some(None)
                } else {
                    None
                }
            });
        let Some(closing) = hit else {
            return Ok(None);
        };

        self.state.remember(&candidate.key, &candidate.formula);
        let goal = match closing {
            None => candidate.key.clone(),
            Some((target, derivation)) => {
                let key = target.canonical_key();
                self.state.remember(&key, &target);
                self.state.provenance.entry(key.clone()).or_insert(derivation);
                key
            }
        };

        let state = &self.state;
        let proof = proof::reconstruct(&goal, &state.provenance, |key| {
            state.formula(key).cloned()
        })?;
        Ok(Some(proof))
    }

    /// Add a candidate to the known set and enqueue its modus ponens results
    fn admit(&mut self, candidate: Candidate) {
        let key = candidate.key.clone();
        let formula = candidate.formula.clone();
        self.state.admit(candidate);
        self.record(SearchEvent::Admit {
            formula: key.clone(),
        });
        if let Some(p) = self.profile.as_mut() {
            p.admitted += 1;
        }

        let mut derived = Vec::new();
        for (other_key, other) in &self.state.known {
            let t = self.profile.as_ref().map(|_| Instant::now());
            let forward = modus_ponens(&formula, other);
            if let (Some(p), Some(t)) = (self.profile.as_mut(), t) {
                p.record_rule("modus_ponens", forward.is_some(), t.elapsed());
            }
            if let Some(result) = forward {
                derived.push((result, key.clone(), other_key.clone()));
            }

            // Pairing with itself needs only one order.
            if *other_key == key {
                continue;
            }
            let t = self.profile.as_ref().map(|_| Instant::now());
            let backward = modus_ponens(other, &formula);
            if let (Some(p), Some(t)) = (self.profile.as_mut(), t) {
                p.record_rule("modus_ponens", backward.is_some(), t.elapsed());
            }
            if let Some(result) = backward {
                derived.push((result, other_key.clone(), key.clone()));
            }
        }

        for (result, premise, implication) in derived {
            let candidate = Candidate::new(result);
            let new_key = candidate.key.clone();
            let derivation = Derivation::modus_ponens(premise.clone(), implication.clone());
            if self.state.enqueue(candidate, derivation) {
                if let Some(p) = self.profile.as_mut() {
                    p.derived += 1;
                }
                self.record(SearchEvent::Derive {
                    formula: new_key,
                    premise,
                    implication,
                });
            }
        }
    }

    /// Raise the size budget. Returns false when that cannot help.
    fn deepen(&mut self) -> bool {
        if self.state.deferred.is_empty() {
            return false;
        }
        let limit = self.config.max_len_limit;
        if limit != 0 && self.state.max_len >= limit {
            return false;
        }
        let mut next = self.state.max_len + self.config.max_len_step;
        if limit != 0 {
            next = next.min(limit);
        }
        let requeued = self.state.deepen(next);
        debug!(
            target: targets::SEARCH,
            "deepening to max_len {} ({} requeued)", next, requeued
        );
        if let Some(p) = self.profile.as_mut() {
            p.deepenings += 1;
        }
        self.record(SearchEvent::Deepen {
            max_len: next,
            requeued,
        });
        true
    }

    /// Place a seed formula in the frontier
    fn seed(&mut self, formula: Expression, derivation: Derivation) {
        let candidate = Candidate::new(formula);
        let key = candidate.key.clone();
        let rule = derivation.rule;
        self.state.remember(&key, &candidate.formula);
        if self.state.enqueue(candidate, derivation) {
            self.record(SearchEvent::Seed { formula: key, rule });
        }
    }

    fn record(&mut self, event: SearchEvent) {
        if self.config.record_events {
            self.state.event_log.push(event);
        }
    }

    fn finish(&mut self, result: ProofResult) -> ProofResult {
        self.phase = match result {
            ProofResult::Proved(_) => Phase::Proved,
            ProofResult::Timeout => Phase::TimedOut,
            ProofResult::Saturated => Phase::Saturated,
            ProofResult::ResourceLimit => Phase::ResourceLimit,
        };
        let elapsed = self.start_time.map(|t| t.elapsed()).unwrap_or_default();
        if let Some(p) = self.profile.as_mut() {
            p.total_time = elapsed;
            p.final_max_len = self.state.max_len;
        }
        info!(
            target: targets::SEARCH,
            "{}: {} after {:.3}s ({} known, {} seen)",
            self.target,
            result.status(),
            elapsed.as_secs_f64(),
            self.state.known.len(),
            self.state.seen.len()
        );
        self.outcome = Some(result.clone());
        result
    }
}
