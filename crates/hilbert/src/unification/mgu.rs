//! Most General Unifier (MGU) computation
//!
//! Unification walks both formulas in lockstep over a queue of node pairs.
//! Each side of a pair is a [`Slot`]: an expression in the pool plus a node
//! index. The pool starts with the two inputs (borrowed) and grows with owned
//! copies whenever a negated variable forces a negated subtree to exist.
//!
//! Bindings refer to slots, not copies, so nothing is materialized until the
//! walk succeeds. Before two slots are compared, bound variables on either
//! side are dereferenced; a negative occurrence `!X` dereferences to the
//! negation of `X`'s binding.

use super::Substitution;
use crate::log::targets;
use crate::logic::{AtomId, Connective, Expression, Term};
use log::trace;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet, VecDeque};

/// Rounds of chain resolution before a binding chain counts as cyclic
pub const DEFAULT_CHAIN_DEPTH: usize = 256;

/// Result of a unification attempt
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Errors that can occur during unification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnificationError {
    /// Different connectives at corresponding nodes
    ConnectiveClash(Connective, Connective),
    /// Constants with different ids or polarities
    ConstantClash(Term, Term),
    /// `X` met `!X`
    PolarityClash(AtomId),
    /// A constant met a compound formula
    ShapeClash(Term, Term),
    /// Occurs check failed - variable occurs in the formula it would be bound to
    OccursCheck(AtomId),
    /// Binding chain did not resolve within the depth bound
    CyclicBinding(AtomId),
    /// One-sided matching bound a pattern variable to two different formulas
    BindingConflict(AtomId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    expr: usize,
    node: usize,
}

struct Unifier<'a> {
    pool: Vec<Cow<'a, Expression>>,
    bindings: HashMap<AtomId, Slot>,
    queue: VecDeque<(Slot, Slot)>,
    depth: usize,
}

/// Copy of `rhs` whose variables are shifted above every variable of `lhs`
pub fn rename_apart(lhs: &Expression, rhs: &Expression) -> Expression {
    let mut renamed = rhs.clone();
    renamed.shift_variables(lhs.max_variable());
    renamed
}

/// Unify two formulas, returning a most general unifier (MGU) if one exists.
///
/// Both sides share one variable space: a variable id means the same variable
/// in `lhs` and `rhs`. Use [`rename_apart`] or [`unify_apart`] when they must
/// be treated as independent.
pub fn unify(lhs: &Expression, rhs: &Expression) -> UnificationResult {
    unify_with_depth(lhs, rhs, DEFAULT_CHAIN_DEPTH)
}

/// Rename `rhs` apart from `lhs`, then unify. Returns the renamed copy of
/// `rhs` with the unifier.
pub fn unify_apart(
    lhs: &Expression,
    rhs: &Expression,
) -> Result<(Expression, Substitution), UnificationError> {
    let renamed = rename_apart(lhs, rhs);
    let subst = unify(lhs, &renamed)?;
    Ok((renamed, subst))
}

/// [`unify`] with an explicit bound on dereferencing and chain resolution
pub fn unify_with_depth(lhs: &Expression, rhs: &Expression, depth: usize) -> UnificationResult {
    let mut unifier = Unifier {
        pool: vec![Cow::Borrowed(lhs), Cow::Borrowed(rhs)],
        bindings: HashMap::new(),
        queue: VecDeque::new(),
        depth,
    };
    unifier
        .queue
        .push_back((Slot { expr: 0, node: 0 }, Slot { expr: 1, node: 0 }));
    let result = unifier.run();
    if let Err(e) = &result {
        trace!(target: targets::UNIFY, "{} vs {}: {:?}", lhs, rhs, e);
    }
    result
}

impl<'a> Unifier<'a> {
    fn term(&self, slot: Slot) -> Term {
        self.pool[slot.expr].node(slot.node).term
    }

    fn run(mut self) -> UnificationResult {
        while let Some((a, b)) = self.queue.pop_front() {
            let a = self.resolve(a)?;
            let b = self.resolve(b)?;
            if a == b {
                continue;
            }
            self.unify_pair(a, b)?;
        }
        self.materialize()
    }

    fn unify_pair(&mut self, a: Slot, b: Slot) -> Result<(), UnificationError> {
        match (self.term(a), self.term(b)) {
            (Term::Connective(x), Term::Connective(y)) => {
                if x != y {
                    return Err(UnificationError::ConnectiveClash(x, y));
                }
                let na = *self.pool[a.expr].node(a.node);
                let nb = *self.pool[b.expr].node(b.node);
                if let (Some(l1), Some(l2)) = (na.left, nb.left) {
                    self.queue.push_back((
                        Slot { expr: a.expr, node: l1 },
                        Slot { expr: b.expr, node: l2 },
                    ));
                }
                if let (Some(r1), Some(r2)) = (na.right, nb.right) {
                    self.queue.push_back((
                        Slot { expr: a.expr, node: r1 },
                        Slot { expr: b.expr, node: r2 },
                    ));
                }
                Ok(())
            }

            (ta @ Term::Constant { .. }, tb @ Term::Constant { .. }) => {
                if ta == tb {
                    Ok(())
                } else {
                    Err(UnificationError::ConstantClash(ta, tb))
                }
            }

            (
                Term::Variable { id: x, positive: px },
                Term::Variable { id: y, positive: py },
            ) if x == y => {
                if px == py {
                    Ok(())
                } else {
                    Err(UnificationError::PolarityClash(x))
                }
            }

            (Term::Variable { id, positive }, _) => self.bind(id, positive, b),
            (_, Term::Variable { id, positive }) => self.bind(id, positive, a),

            (ta, tb) => Err(UnificationError::ShapeClash(ta, tb)),
        }
    }

    /// Follow bindings until an unbound variable or a non-variable node
    fn resolve(&mut self, mut slot: Slot) -> Result<Slot, UnificationError> {
        let mut hops = 0;
        loop {
            let Term::Variable { id, positive } = self.term(slot) else {
                return Ok(slot);
            };
            let Some(&bound) = self.bindings.get(&id) else {
                return Ok(slot);
            };
            hops += 1;
            if hops > self.depth {
                return Err(UnificationError::CyclicBinding(id));
            }
            slot = if positive { bound } else { self.negated(bound) };
        }
    }

    /// Push the negation of the subtree at `slot` into the pool
    fn negated(&mut self, slot: Slot) -> Slot {
        let mut copy = self.pool[slot.expr].subtree_copy(slot.node);
        copy.negate(0);
        self.pool.push(Cow::Owned(copy));
        Slot {
            expr: self.pool.len() - 1,
            node: 0,
        }
    }

    fn bind(&mut self, var: AtomId, positive: bool, target: Slot) -> Result<(), UnificationError> {
        let target = if positive { target } else { self.negated(target) };
        if self.occurs(var, target) {
            return Err(UnificationError::OccursCheck(var));
        }
        self.bindings.insert(var, target);
        Ok(())
    }

    /// Does `var` occur under `slot`, looking through bound variables?
    fn occurs(&self, var: AtomId, slot: Slot) -> bool {
        let mut stack = vec![slot];
        let mut visited = HashSet::new();
        while let Some(s) = stack.pop() {
            let expr = &self.pool[s.expr];
            let end = expr.subtree_end(s.node);
            for node in &expr.nodes()[s.node..end] {
                let Some(v) = node.term.variable_id() else {
                    continue;
                };
                if v == var {
                    return true;
                }
                if visited.insert(v) {
                    if let Some(&bound) = self.bindings.get(&v) {
                        stack.push(bound);
                    }
                }
            }
        }
        false
    }

    /// Copy every binding out of the pool and close the result under itself
    fn materialize(self) -> UnificationResult {
        let mut map: HashMap<AtomId, Expression> = self
            .bindings
            .iter()
            .map(|(&var, slot)| (var, self.pool[slot.expr].subtree_copy(slot.node)))
            .collect();

        for _ in 0..self.depth {
            let pending: Vec<AtomId> = map
                .iter()
                .filter(|(_, value)| value.variables().iter().any(|v| map.contains_key(v)))
                .map(|(&var, _)| var)
                .collect();
            if pending.is_empty() {
                return Ok(Substitution { map });
            }
            let snapshot = map.clone();
            for var in pending {
                if let Some(value) = map.get_mut(&var) {
                    value.apply_bindings(&snapshot);
                }
            }
        }

        let unresolved = map
            .iter()
            .filter(|(_, value)| value.variables().iter().any(|v| map.contains_key(v)))
            .map(|(&var, _)| var)
            .min();
        match unresolved {
            Some(var) => Err(UnificationError::CyclicBinding(var)),
            None => Ok(Substitution { map }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn expr(s: &str) -> Expression {
        parse_formula(s).unwrap()
    }

    #[test]
    fn test_unify_identical_is_empty() {
        let e = expr("(A>B)>(!A>c)");
        let result = unify(&e, &e).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unify_variables() {
        let result = unify(&expr("A"), &expr("B")).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_unify_constant_variable() {
        let result = unify(&expr("A"), &expr("a")).unwrap();
        assert_eq!(result.get(1), Some(&expr("a")));

        let result = unify(&expr("!a"), &expr("B")).unwrap();
        assert_eq!(result.get(2), Some(&expr("!a")));
    }

    #[test]
    fn test_negated_variable_binds_negation() {
        let result = unify(&expr("!A"), &expr("b>c")).unwrap();
        assert_eq!(result.get(1).unwrap().to_string(), "b*!c");

        let result = unify(&expr("!A"), &expr("!b")).unwrap();
        assert_eq!(result.get(1), Some(&expr("b")));
    }

    #[test]
    fn test_unify_compound() {
        let lhs = expr("A>(B>A)");
        let rhs = expr("c>(D>c)");
        let sigma = unify(&lhs, &rhs).unwrap();
        assert_eq!(sigma.apply_to(&lhs), sigma.apply_to(&rhs));
        assert_eq!(sigma.get(1), Some(&expr("c")));
    }

    #[test]
    fn test_conflicting_binding_surfaces_as_clash() {
        let result = unify(&expr("A>A"), &expr("b>c"));
        assert!(matches!(result, Err(UnificationError::ConstantClash(_, _))));
    }

    #[test]
    fn test_connective_clash() {
        let result = unify(&expr("A>B"), &expr("a*b"));
        assert_eq!(
            result,
            Err(UnificationError::ConnectiveClash(
                Connective::Implication,
                Connective::Conjunction
            ))
        );
    }

    #[test]
    fn test_shape_clash() {
        let result = unify(&expr("a"), &expr("b>c"));
        assert!(matches!(result, Err(UnificationError::ShapeClash(_, _))));
    }

    #[test]
    fn test_polarity_clash() {
        let result = unify(&expr("A>A"), &expr("A>!A"));
        assert_eq!(result, Err(UnificationError::PolarityClash(1)));
    }

    #[test]
    fn test_occurs_check() {
        let result = unify(&expr("A"), &expr("A>b"));
        assert_eq!(result, Err(UnificationError::OccursCheck(1)));
    }

    #[test]
    fn test_occurs_check_through_bindings() {
        // A := B, then B := (A>c) would close a cycle through A.
        let result = unify(&expr("A>A"), &expr("B>(B>c)"));
        assert!(matches!(result, Err(UnificationError::OccursCheck(_))));
    }

    #[test]
    fn test_chains_are_closed() {
        let lhs = expr("A>(B>C)");
        let rhs = expr("B>(C>d)");
        let sigma = unify(&lhs, &rhs).unwrap();
        assert!(sigma.is_idempotent());
        for (_, value) in sigma.iter() {
            assert_eq!(value, &expr("d"));
        }
        assert_eq!(sigma.apply_to(&lhs), sigma.apply_to(&rhs));
    }

    #[test]
    fn test_depth_bound_reports_cycle() {
        let result = unify_with_depth(&expr("A>(B>C)"), &expr("B>(C>d)"), 0);
        assert!(matches!(result, Err(UnificationError::CyclicBinding(_))));
    }

    #[test]
    fn test_rename_apart() {
        let lhs = expr("A>B");
        let renamed = rename_apart(&lhs, &expr("A>(B>a)"));
        assert_eq!(renamed.to_string(), "C>(D>a)");

        let (renamed, sigma) = unify_apart(&lhs, &expr("B>B")).unwrap();
        assert_eq!(renamed.to_string(), "D>D");
        assert_eq!(sigma.apply_to(&lhs), sigma.apply_to(&renamed));
    }
}
