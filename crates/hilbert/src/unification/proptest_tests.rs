//! Property-based tests for unification and matching using proptest.

use super::{match_expression, rename_apart, unify};
use crate::logic::proptest_tests::{
    arb_expression, arb_ground_expression, arb_standard_expression,
};
use crate::logic::{Connective, Expression};
use proptest::prelude::*;

// =========================================================================
// Unification properties
// =========================================================================

proptest! {
    /// Soundness: if unify(s, t) = σ, then sσ = tσ
    #[test]
    fn unification_soundness(
        s in arb_standard_expression(3),
        t in arb_standard_expression(3),
    ) {
        let t = rename_apart(&s, &t);
        if let Ok(sigma) = unify(&s, &t) {
            prop_assert!(sigma.is_idempotent());
            prop_assert_eq!(sigma.apply_to(&s), sigma.apply_to(&t), "unifier must make formulas equal");
        }
        // If unification fails, that's fine, no property to check
    }

    /// Against a ground formula the unifier instantiates the other side to it
    #[test]
    fn unification_against_ground(
        g in arb_ground_expression(3),
        t in arb_standard_expression(3),
    ) {
        if let Ok(sigma) = unify(&g, &t) {
            prop_assert_eq!(sigma.apply_to(&t), g);
        }
    }

    /// Every formula is an instance of its own generalization
    #[test]
    fn unification_generalized_ground(g in arb_ground_expression(3)) {
        let mut schema = g.clone();
        schema.generalize();
        let sigma = unify(&g, &schema);
        prop_assert!(sigma.is_ok());
        if let Ok(sigma) = sigma {
            prop_assert_eq!(sigma.apply_to(&schema), g);
        }
    }

    /// Occurs check: unify(X, f(...X...)) should always fail
    #[test]
    fn unification_occurs_check(depth in 1..4usize, op_idx in 0..4usize) {
        let ops = [
            Connective::Conjunction,
            Connective::Implication,
            Connective::Xor,
            Connective::Equivalence,
        ];
        let x = Expression::variable(1);
        let b = Expression::constant(2);
        let mut e = x.clone();
        for _ in 0..depth {
            e = Expression::construct(&b, ops[op_idx], &e);
        }
        prop_assert!(unify(&x, &e).is_err(), "occurs check should prevent X = f(...X...)");
    }

    /// Identity: unify(t, t) succeeds with an empty substitution
    #[test]
    fn unification_identity(e in arb_expression(4)) {
        let result = unify(&e, &e);
        prop_assert!(result.is_ok(), "formula should unify with itself");
        if let Ok(sigma) = result {
            prop_assert!(sigma.is_empty());
        }
    }
}

// =========================================================================
// Matching properties
// =========================================================================

proptest! {
    /// Soundness: if match(p, t) = σ, then pσ = t
    #[test]
    fn matching_soundness(
        p in arb_standard_expression(3),
        t in arb_standard_expression(3),
    ) {
        if let Ok(sigma) = match_expression(&p, &t) {
            prop_assert_eq!(sigma.apply_to(&p), t);
        }
    }

    /// A formula always matches an instance of itself
    #[test]
    fn matching_own_instance(p in arb_standard_expression(3), g in arb_ground_expression(2)) {
        let mut instance = p.clone();
        instance.replace(1, &g);
        prop_assert!(match_expression(&p, &instance).is_ok());
    }
}
