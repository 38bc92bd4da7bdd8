//! Goal tests: syntactic equality, instances and immediate consequence

use crate::logic::{Connective, Expression};
use crate::unification::match_expression;

/// Equal up to variable renaming. `a|b` and `b|a` are different formulas.
pub fn is_equal(a: &Expression, b: &Expression) -> bool {
    a.len() == b.len() && a.canonical_key() == b.canonical_key()
}

/// `target` is a substitution instance of `schema`
pub fn is_instance(schema: &Expression, target: &Expression) -> bool {
    schema.len() <= target.len() && match_expression(schema, target).is_ok()
}

/// `b` follows from `a` in one obvious step:
///
/// 1. `A ⊢ A`
/// 2. `A ⊢ A|B`
/// 3. `A ⊢ B|A`
/// 4. `A ⊢ B>A`
/// 5. `A ⊢ !A>B`
pub fn entails(a: &Expression, b: &Expression) -> bool {
    if is_equal(a, b) {
        return true;
    }
    let (Some(left), Some(right)) = (b.left_operand(), b.right_operand()) else {
        return false;
    };
    match b.root_connective() {
        Some(Connective::Disjunction) => is_equal(a, &left) || is_equal(a, &right),
        Some(Connective::Implication) => {
            let mut negated = left;
            negated.negate(0);
            is_equal(a, &right) || is_equal(a, &negated)
        }
        _ => false,
    }
}
