//! Proof reconstruction and checking
//!
//! The search records, for every formula it has seen, the first derivation
//! that produced it (keyed by canonical string). A proof is recovered by a
//! post-order walk from the goal through those records: premises are emitted
//! before the formulas derived from them, and every formula appears once.

use crate::inference::{entails, is_equal, is_instance, modus_ponens, Derivation, Rule};
use crate::log::targets;
use crate::logic::{Connective, Expression};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Why a line holds. Numbers refer to earlier lines (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Axiom,
    Hypothesis,
    /// Conjunct of the given line
    Split(usize),
    /// `(premise, implication)`
    ModusPonens(usize, usize),
    /// Substitution instance of the given line
    Instance(usize),
    /// Immediate consequence of the given line
    Follows(usize),
}

impl Justification {
    fn from_rule(rule: Rule, refs: &[usize]) -> Option<Self> {
        let justification = match (rule, refs) {
            (Rule::Axiom, []) => Justification::Axiom,
            (Rule::Hypothesis, []) => Justification::Hypothesis,
            (Rule::Conjunct, [i]) => Justification::Split(*i),
            (Rule::ModusPonens, [i, j]) => Justification::ModusPonens(*i, *j),
            (Rule::Instance, [i]) => Justification::Instance(*i),
            (Rule::Entailment, [i]) => Justification::Follows(*i),
            _ => return None,
        };
        Some(justification)
    }

    pub fn rule(&self) -> Rule {
        match self {
            Justification::Axiom => Rule::Axiom,
            Justification::Hypothesis => Rule::Hypothesis,
            Justification::Split(_) => Rule::Conjunct,
            Justification::ModusPonens(_, _) => Rule::ModusPonens,
            Justification::Instance(_) => Rule::Instance,
            Justification::Follows(_) => Rule::Entailment,
        }
    }

    /// Line numbers this justification depends on
    pub fn references(&self) -> Vec<usize> {
        match *self {
            Justification::Axiom | Justification::Hypothesis => vec![],
            Justification::Split(i) | Justification::Instance(i) | Justification::Follows(i) => {
                vec![i]
            }
            Justification::ModusPonens(i, j) => vec![i, j],
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Justification::ModusPonens(i, j) => write!(f, "mp({},{})", i, j),
            Justification::Split(i) | Justification::Instance(i) | Justification::Follows(i) => {
                write!(f, "{}({})", self.rule(), i)
            }
            Justification::Axiom | Justification::Hypothesis => write!(f, "{}", self.rule()),
        }
    }
}

/// One numbered proof line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofLine {
    pub number: usize,
    pub justification: Justification,
    pub formula: Expression,
}

impl fmt::Display for ProofLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}: {}", self.number, self.justification, self.formula)
    }
}

/// A proof is a sequence of numbered lines ending in the goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub lines: Vec<ProofLine>,
}

impl Proof {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The proved formula
    pub fn conclusion(&self) -> Option<&Expression> {
        self.lines.last().map(|line| &line.formula)
    }

    /// Lines are numbered 1, 2, ... and only refer to earlier lines
    pub fn check_references(&self) -> bool {
        self.lines.iter().enumerate().all(|(pos, line)| {
            line.number == pos + 1
                && line
                    .justification
                    .references()
                    .iter()
                    .all(|&r| r >= 1 && r < line.number)
        })
    }

    /// Replay every line against the rules.
    ///
    /// Axiom and hypothesis lines must equal one of the given formulas, every
    /// other line must follow from the lines it cites, and the last line must
    /// equal one of `targets`.
    pub fn verify(
        &self,
        axioms: &[Expression],
        hypotheses: &[Expression],
        targets: &[Expression],
    ) -> Result<(), VerificationError> {
        for (pos, line) in self.lines.iter().enumerate() {
            if line.number != pos + 1 {
                return Err(VerificationError::Numbering { line: pos + 1 });
            }
            for r in line.justification.references() {
                if r == 0 || r >= line.number {
                    return Err(VerificationError::ForwardReference {
                        line: line.number,
                        reference: r,
                    });
                }
            }
            let cited = |r: usize| &self.lines[r - 1].formula;
            let valid = match line.justification {
                Justification::Axiom => axioms.iter().any(|a| is_equal(a, &line.formula)),
                Justification::Hypothesis => {
                    hypotheses.iter().any(|h| is_equal(h, &line.formula))
                }
                Justification::Split(i) => {
                    let source = cited(i);
                    source.root_connective() == Some(Connective::Conjunction)
                        && [source.left_operand(), source.right_operand()]
                            .iter()
                            .flatten()
                            .any(|c| is_equal(c, &line.formula))
                }
                Justification::ModusPonens(i, j) => modus_ponens(cited(i), cited(j))
                    .is_some_and(|derived| is_equal(&derived, &line.formula)),
                Justification::Instance(i) => is_instance(cited(i), &line.formula),
                Justification::Follows(i) => entails(cited(i), &line.formula),
            };
            if !valid {
                return Err(VerificationError::InvalidStep {
                    line: line.number,
                    rule: line.justification.rule(),
                });
            }
        }

        match self.conclusion() {
            Some(last) if targets.iter().any(|t| is_equal(t, last)) => Ok(()),
            _ => Err(VerificationError::GoalMismatch),
        }
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Provenance records that do not form a proof
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructionError {
    #[error("no derivation recorded for {0}")]
    MissingDerivation(String),
    #[error("no formula stored for {0}")]
    MissingFormula(String),
    #[error("derivation of {0} has the wrong number of premises")]
    MalformedDerivation(String),
    #[error("derivation cycle through {0}")]
    Cycle(String),
}

/// A proof line that does not replay
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("line {line} is out of sequence")]
    Numbering { line: usize },
    #[error("line {line} refers to line {reference}")]
    ForwardReference { line: usize, reference: usize },
    #[error("line {line} is not a valid {rule} step")]
    InvalidStep { line: usize, rule: Rule },
    #[error("proof does not end in a target")]
    GoalMismatch,
}

/// Build the proof of `goal` from the provenance records.
///
/// `formula_of` maps a canonical key back to its formula.
pub fn reconstruct<F>(
    goal: &str,
    provenance: &HashMap<String, Derivation>,
    formula_of: F,
) -> Result<Proof, ReconstructionError>
where
    F: Fn(&str) -> Option<Expression>,
{
    let mut numbers: HashMap<&str, usize> = HashMap::new();
    let mut in_progress: HashSet<&str> = HashSet::new();
    let mut lines = Vec::new();
    let mut stack: Vec<(&str, bool)> = vec![(goal, false)];

    while let Some((key, expanded)) = stack.pop() {
        if numbers.contains_key(key) {
            continue;
        }
        let (stored_key, derivation) = provenance
            .get_key_value(key)
            .ok_or_else(|| ReconstructionError::MissingDerivation(key.to_string()))?;
        let key = stored_key.as_str();

        if !expanded {
            if !in_progress.insert(key) {
                return Err(ReconstructionError::Cycle(key.to_string()));
            }
            stack.push((key, true));
            for premise in derivation.premises.iter().rev() {
                if numbers.contains_key(premise.as_str()) {
                    continue;
                }
                if in_progress.contains(premise.as_str()) {
                    return Err(ReconstructionError::Cycle(premise.clone()));
                }
                stack.push((premise.as_str(), false));
            }
            continue;
        }

        in_progress.remove(key);
        let refs = derivation
            .premises
            .iter()
            .map(|p| {
                numbers
                    .get(p.as_str())
                    .copied()
                    .ok_or_else(|| ReconstructionError::MissingDerivation(p.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let justification = Justification::from_rule(derivation.rule, &refs)
            .ok_or_else(|| ReconstructionError::MalformedDerivation(key.to_string()))?;
        let formula =
            formula_of(key).ok_or_else(|| ReconstructionError::MissingFormula(key.to_string()))?;

        let number = lines.len() + 1;
        lines.push(ProofLine {
            number,
            justification,
            formula,
        });
        numbers.insert(key, number);
    }

    debug!(target: targets::PROOF, "reconstructed {} lines for {}", lines.len(), goal);
    Ok(Proof { lines })
}
