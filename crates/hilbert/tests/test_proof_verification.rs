//! Integration tests for proof verification.
//!
//! Every test that expects a proof also runs verify_proof() to check soundness.

use hilbert::json::{ProofJson, SearchResultJson};
use hilbert::{
    parse_formula, Justification, ProofResult, Prover, ProverConfig, Rule, VerificationError,
    STANDARD_AXIOMS,
};
use std::time::Duration;

fn prove_target(target: &str) -> (ProofResult, Prover) {
    prove_with(
        target,
        ProverConfig {
            timeout: Duration::from_secs(5),
            ..Default::default()
        },
    )
}

fn prove_with(target: &str, config: ProverConfig) -> (ProofResult, Prover) {
    let mut prover = Prover::from_strings(&STANDARD_AXIOMS, target, config).unwrap();
    let result = prover.prove().unwrap();
    (result, prover)
}

fn assert_proof_verified(result: &ProofResult, prover: &Prover, name: &str) {
    match result {
        ProofResult::Proved(proof) => {
            assert!(proof.check_references(), "{}: bad references", name);
            prover
                .verify_proof(proof)
                .unwrap_or_else(|e| panic!("{}: proof verification failed: {}", name, e));
        }
        other => panic!("{}: expected proof, got {:?}", name, other),
    }
}

// =========================================================================
// Proofs from hypotheses
// =========================================================================

#[test]
fn test_verify_weakening() {
    let (result, prover) = prove_target("a>(b>a)");
    assert_proof_verified(&result, &prover, "weakening");
}

#[test]
fn test_verify_distribution() {
    // An instance of the second axiom
    let (result, prover) = prove_target("(a>(b>c))>((a>b)>(a>c))");
    assert_proof_verified(&result, &prover, "distribution");
    let proof = result.proof().unwrap();
    assert_eq!(proof.len(), 2);
    assert_eq!(proof.lines[0].justification, Justification::Axiom);
    assert_eq!(proof.lines[1].justification, Justification::Instance(1));
}

#[test]
fn test_verify_distribution_as_schema() {
    let config = ProverConfig {
        timeout: Duration::from_secs(5),
        match_instances: false,
        entailment: false,
        ..Default::default()
    };
    let (result, prover) = prove_with("(a>(b>c))>((a>b)>(a>c))", config);
    assert_proof_verified(&result, &prover, "distribution as schema");
    assert_eq!(
        result.proof().unwrap().to_string(),
        "1. axiom: (A>(B>C))>((A>B)>(A>C))\n"
    );
}

#[test]
fn test_verify_chained_hypotheses() {
    let config = ProverConfig {
        timeout: Duration::from_secs(5),
        match_instances: false,
        entailment: false,
        ..Default::default()
    };
    let (result, prover) = prove_with("(a>(b>c))>((a>b)>(a>(d>c)))", config);
    assert_proof_verified(&result, &prover, "chained hypotheses");
    let proof = result.proof().unwrap();
    assert_eq!(proof.conclusion().unwrap().to_string(), "c");
    let mp_lines = proof
        .lines
        .iter()
        .filter(|l| l.justification.rule() == Rule::ModusPonens)
        .count();
    assert!(mp_lines >= 3);
}

#[test]
fn test_verify_excluded_middle_as_implication() {
    // a|!a standardizes to !a>!a
    let (result, prover) = prove_target("a|!a");
    assert_proof_verified(&result, &prover, "excluded middle");
    assert_eq!(prover.target().to_string(), "!a>!a");
}

#[test]
fn test_verify_equivalence_hypothesis() {
    let (result, prover) = prove_target("(a=b)>(a=b)");
    assert_proof_verified(&result, &prover, "equivalence");
}

#[test]
fn test_verify_split_conjunction() {
    let (result, prover) = prove_target("(a*(b*c))>c");
    assert_proof_verified(&result, &prover, "split");
    let proof = result.proof().unwrap();
    assert_eq!(proof.lines[0].justification, Justification::Hypothesis);
    assert_eq!(proof.conclusion().unwrap().to_string(), "c");
}

// =========================================================================
// Tampered proofs
// =========================================================================

#[test]
fn test_tampered_formula_rejected() {
    let (result, prover) = prove_target("(a>b)>((b>c)>(a>c))");
    let mut proof = result.proof().unwrap().clone();
    let mp = proof
        .lines
        .iter()
        .position(|l| l.justification.rule() == Rule::ModusPonens)
        .expect("proof uses modus ponens");
    proof.lines[mp].formula = parse_formula("d").unwrap();

    match prover.verify_proof(&proof) {
        Err(VerificationError::InvalidStep { line, rule }) => {
            assert_eq!(line, mp + 1);
            assert_eq!(rule, Rule::ModusPonens);
        }
        other => panic!("expected InvalidStep, got {:?}", other),
    }
}

#[test]
fn test_truncated_proof_rejected() {
    let (result, prover) = prove_target("(a>b)>((b>c)>(a>c))");
    let mut proof = result.proof().unwrap().clone();
    proof.lines.pop();
    assert_eq!(
        prover.verify_proof(&proof),
        Err(VerificationError::GoalMismatch)
    );
}

#[test]
fn test_unknown_hypothesis_rejected() {
    let (result, prover) = prove_target("a>a");
    let mut proof = result.proof().unwrap().clone();
    proof.lines[0].formula = parse_formula("b").unwrap();
    assert!(matches!(
        prover.verify_proof(&proof),
        Err(VerificationError::InvalidStep {
            line: 1,
            rule: Rule::Hypothesis
        })
    ));
}

// =========================================================================
// Export
// =========================================================================

#[test]
fn test_proof_exports_to_json() {
    let (result, prover) = prove_target("(a>b)>((b>c)>(a>c))");
    let proof = result.proof().unwrap();

    let json = ProofJson::from(proof);
    assert_eq!(json.lines.len(), proof.len());
    for (line, exported) in proof.lines.iter().zip(&json.lines) {
        assert_eq!(exported.number, line.number);
        assert_eq!(exported.formula, line.formula.to_string());
        assert_eq!(exported.references, line.justification.references());
    }

    let value = serde_json::to_value(SearchResultJson::new(
        &result,
        prover.state.known.len(),
        Duration::from_secs(1),
    ))
    .unwrap();
    assert_eq!(value["result"], "Proved");
    assert_eq!(value["proof"]["lines"].as_array().unwrap().len(), proof.len());
}
