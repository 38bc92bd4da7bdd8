//! Variable substitutions

use crate::logic::{AtomId, Expression, Term};
use std::collections::HashMap;
use std::fmt;

/// A substitution mapping variable IDs to formulas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    pub map: HashMap<AtomId, Expression>,
}

impl Substitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Substitution {
            map: HashMap::new(),
        }
    }

    /// Add a variable -> formula mapping
    pub fn insert(&mut self, var: AtomId, value: Expression) {
        self.map.insert(var, value);
    }

    /// Get the formula for a variable ID, if bound
    pub fn get(&self, var: AtomId) -> Option<&Expression> {
        self.map.get(&var)
    }

    /// Check if a variable ID is bound
    pub fn contains(&self, var: AtomId) -> bool {
        self.map.contains_key(&var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AtomId, &Expression)> {
        self.map.iter()
    }

    /// Apply this substitution to a copy of `expr`
    pub fn apply_to(&self, expr: &Expression) -> Expression {
        let mut result = expr.clone();
        result.apply(self);
        result
    }

    /// No bound variable occurs in any bound value
    pub fn is_idempotent(&self) -> bool {
        self.map
            .values()
            .all(|value| value.variables().iter().all(|&v| !self.contains(v)))
    }
}

impl Expression {
    /// Apply a substitution in place
    pub fn apply(&mut self, subst: &Substitution) {
        self.apply_bindings(&subst.map);
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        write!(f, "{{")?;
        for (i, (id, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", Term::variable(*id), value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    #[test]
    fn test_apply_to_leaves_original_untouched() {
        let mut subst = Substitution::new();
        subst.insert(1, parse_formula("b*c").unwrap());
        let original = parse_formula("A>!A").unwrap();
        let result = subst.apply_to(&original);
        assert_eq!(result.to_string(), "(b*c)>(b>!c)");
        assert_eq!(original.to_string(), "A>!A");
    }

    #[test]
    fn test_display_sorted() {
        let mut subst = Substitution::new();
        subst.insert(2, parse_formula("a").unwrap());
        subst.insert(1, parse_formula("b>C").unwrap());
        assert_eq!(subst.to_string(), "{A -> b>C, B -> a}");
    }

    #[test]
    fn test_idempotence_check() {
        let mut subst = Substitution::new();
        subst.insert(1, parse_formula("B>c").unwrap());
        assert!(subst.is_idempotent());
        assert!(subst.contains(1));
        assert!(!subst.contains(2));
        subst.insert(2, parse_formula("a").unwrap());
        assert!(!subst.is_idempotent());
    }
}
