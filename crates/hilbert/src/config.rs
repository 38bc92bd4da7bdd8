//! Prover configuration types.

use crate::error::{ProverError, Result};
use std::time::Duration;

/// Configuration for the search loop
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// Wall-clock budget, checked between batches
    pub timeout: Duration,
    /// Initial size budget; `None` uses the largest seed formula
    pub initial_max_len: Option<usize>,
    /// Growth of the size budget when a batch admits nothing
    pub max_len_step: usize,
    /// Largest size budget deepening may reach (0 means no limit)
    pub max_len_limit: usize,
    /// Cap on admitted formulas (0 means no limit)
    pub max_known: usize,
    /// Candidates examined per batch (0 means the whole frontier)
    pub batch_limit: usize,
    /// Fewest axioms accepted by `Prover::new`
    pub min_axioms: usize,
    /// Peel target implications into hypotheses
    pub deduction: bool,
    /// Add the conjuncts of conjunctive hypotheses
    pub split_conjunctions: bool,
    /// Accept a derived schema when a target is an instance of it
    pub match_instances: bool,
    /// Accept a formula from which a target follows immediately
    pub entailment: bool,
    /// Record the derivation event log
    pub record_events: bool,
    /// Enable structured profiling (zero overhead when false)
    pub enable_profiling: bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            timeout: Duration::from_secs(10),
            initial_max_len: None,
            max_len_step: 2,
            max_len_limit: 0,    // 0 means no limit
            max_known: 20_000,
            batch_limit: 0,
            min_axioms: 1,
            deduction: true,
            split_conjunctions: true,
            match_instances: true,
            entailment: true,
            record_events: false,
            enable_profiling: false,
        }
    }
}

impl ProverConfig {
    /// Reject settings under which the search cannot make progress
    pub fn validate(&self) -> Result<()> {
        if self.max_len_step == 0 {
            return Err(ProverError::InvalidConfig(
                "max_len_step must be positive".into(),
            ));
        }
        if self.initial_max_len == Some(0) {
            return Err(ProverError::InvalidConfig(
                "initial_max_len must be positive".into(),
            ));
        }
        if let Some(initial) = self.initial_max_len {
            if self.max_len_limit != 0 && initial > self.max_len_limit {
                return Err(ProverError::InvalidConfig(format!(
                    "initial_max_len {} exceeds max_len_limit {}",
                    initial, self.max_len_limit
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ProverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_budgets() {
        let config = ProverConfig {
            max_len_step: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ProverError::InvalidConfig(_))));

        let config = ProverConfig {
            initial_max_len: Some(20),
            max_len_limit: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ProverConfig {
            initial_max_len: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
