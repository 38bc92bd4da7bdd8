//! Modus ponens over schemas

use crate::logic::{Connective, Expression, Term};
use crate::unification::{rename_apart, unify};

/// From `premise` and `A > B` derive `σ(B)` where σ unifies `premise` with `A`.
///
/// The implication is renamed apart from the premise first, so the two never
/// share variables. Returns the normalized consequent, or `None` when the root
/// is not an implication or unification fails. Neither input is modified.
pub fn modus_ponens(premise: &Expression, implication: &Expression) -> Option<Expression> {
    if implication.root_connective() != Some(Connective::Implication) {
        return None;
    }
    let antecedent_root = implication.root().left?;
    if !heads_compatible(premise.root().term, implication.node(antecedent_root).term) {
        return None;
    }

    let renamed = rename_apart(premise, implication);
    let antecedent = renamed.left_operand()?;
    let sigma = unify(premise, &antecedent).ok()?;

    let mut consequent = renamed.right_operand()?;
    consequent.apply(&sigma);
    consequent.normalize();
    Some(consequent)
}

/// Cheap root-symbol test that rules out most failing unifications
fn heads_compatible(a: Term, b: Term) -> bool {
    match (a, b) {
        (Term::Variable { .. }, _) | (_, Term::Variable { .. }) => true,
        (Term::Connective(x), Term::Connective(y)) => x == y,
        (Term::Constant { .. }, Term::Constant { .. }) => a == b,
        _ => false,
    }
}
