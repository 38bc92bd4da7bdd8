//! One-way matching for instance tests

use super::{Substitution, UnificationError};
use crate::logic::{Expression, Term};

/// One-way match: find a substitution σ such that pattern σ = target.
///
/// Only variables in the pattern can be substituted; variables of the target
/// are rigid, even when they share an id with a pattern variable.
pub fn match_expression(
    pattern: &Expression,
    target: &Expression,
) -> Result<Substitution, UnificationError> {
    let mut subst = Substitution::new();
    let mut stack = vec![(0usize, 0usize)];

    while let Some((p, t)) = stack.pop() {
        let pn = pattern.node(p);
        let tn = target.node(t);
        match (pn.term, tn.term) {
            // Variable in pattern matches anything
            (Term::Variable { id, positive }, _) => {
                let mut value = target.subtree_copy(t);
                if !positive {
                    value.negate(0);
                }
                match subst.get(id) {
                    Some(bound) if *bound != value => {
                        return Err(UnificationError::BindingConflict(id));
                    }
                    Some(_) => {}
                    None => subst.insert(id, value),
                }
            }
            (Term::Connective(x), Term::Connective(y)) => {
                if x != y {
                    return Err(UnificationError::ConnectiveClash(x, y));
                }
                if let (Some(l1), Some(l2)) = (pn.left, tn.left) {
                    stack.push((l1, l2));
                }
                if let (Some(r1), Some(r2)) = (pn.right, tn.right) {
                    stack.push((r1, r2));
                }
            }
            // Constants must match exactly
            (pc @ Term::Constant { .. }, tc) if tc.is_leaf() => {
                if pc != tc {
                    return Err(UnificationError::ConstantClash(pc, tc));
                }
            }
            (pt, tt) => return Err(UnificationError::ShapeClash(pt, tt)),
        }
    }

    Ok(subst)
}
