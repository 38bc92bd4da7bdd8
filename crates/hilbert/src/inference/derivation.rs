//! Formula derivation tracking.
//!
//! Records how each formula entered the search (rule + premise keys).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The rule that produced a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Supplied axiom schema
    Axiom,
    /// Antecedent peeled off the target by the deduction theorem
    Hypothesis,
    /// Conjunct of a hypothesis
    Conjunct,
    /// Modus ponens; premises are `[premise, implication]`
    ModusPonens,
    /// Substitution instance of a derived schema
    Instance,
    /// Immediate consequence (`entails`)
    Entailment,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Axiom => "axiom",
            Rule::Hypothesis => "hypothesis",
            Rule::Conjunct => "split",
            Rule::ModusPonens => "mp",
            Rule::Instance => "subst",
            Rule::Entailment => "follows",
        };
        f.write_str(name)
    }
}

/// How a formula was derived.
///
/// Premises are canonical keys of formulas derived earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub rule: Rule,
    pub premises: Vec<String>,
}

impl Derivation {
    pub fn axiom() -> Self {
        Derivation {
            rule: Rule::Axiom,
            premises: vec![],
        }
    }

    pub fn hypothesis() -> Self {
        Derivation {
            rule: Rule::Hypothesis,
            premises: vec![],
        }
    }

    pub fn conjunct(source: String) -> Self {
        Derivation {
            rule: Rule::Conjunct,
            premises: vec![source],
        }
    }

    pub fn modus_ponens(premise: String, implication: String) -> Self {
        Derivation {
            rule: Rule::ModusPonens,
            premises: vec![premise, implication],
        }
    }

    pub fn instance(schema: String) -> Self {
        Derivation {
            rule: Rule::Instance,
            premises: vec![schema],
        }
    }

    pub fn entailment(source: String) -> Self {
        Derivation {
            rule: Rule::Entailment,
            premises: vec![source],
        }
    }

    /// Axioms and hypotheses need no premises
    pub fn is_leaf(&self) -> bool {
        self.premises.is_empty()
    }
}
