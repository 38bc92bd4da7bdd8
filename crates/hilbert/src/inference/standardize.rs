//! Disjunction elimination

use crate::logic::{Connective, Expression, Term};

/// Rewrite every disjunction `A|B` into `!A>B`, in place.
///
/// Node positions never change: the disjunction node becomes an implication
/// and its left operand is negated in place. Negation never produces a
/// disjunction, so disjunctions left untouched by it are reached later in the
/// same forward scan.
pub fn standardize(expr: &mut Expression) {
    for idx in 0..expr.len() {
        let node = *expr.node(idx);
        if node.term != Term::Connective(Connective::Disjunction) {
            continue;
        }
        expr.set_term(idx, Term::Connective(Connective::Implication));
        if let Some(left) = node.left {
            expr.negate(left);
        }
    }
}

/// Standardized copy
pub fn standardized(expr: &Expression) -> Expression {
    let mut copy = expr.clone();
    standardize(&mut copy);
    copy
}

/// True when no disjunction remains
pub fn is_standard(expr: &Expression) -> bool {
    expr.nodes()
        .iter()
        .all(|n| n.term != Term::Connective(Connective::Disjunction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn std_str(s: &str) -> String {
        standardized(&parse_formula(s).unwrap()).to_string()
    }

    #[test]
    fn test_standardize_simple() {
        assert_eq!(std_str("a|b"), "!a>b");
        assert_eq!(std_str("!a|b"), "a>b");
        assert_eq!(std_str("a>b"), "a>b");
    }

    #[test]
    fn test_standardize_nested() {
        assert_eq!(std_str("(a|b)|c"), "(!a*!b)>c");
        assert_eq!(std_str("a|(b|c)"), "!a>(!b>c)");
        assert_eq!(std_str("(a|b)*c"), "(!a>b)*c");
        assert_eq!(std_str("(a>(b|c))|d"), "(a*(!b*!c))>d");
    }

    #[test]
    fn test_standardize_removes_all_disjunctions() {
        for s in ["(a|b)|(c|d)", "((a|b)>c)|!(d|e)", "a=(b|c)"] {
            let e = standardized(&parse_formula(s).unwrap());
            assert!(is_standard(&e), "{} -> {}", s, e);
            assert!(e.is_well_formed());
        }
    }
}
