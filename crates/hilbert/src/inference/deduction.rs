//! Deduction theorem and conjunction splitting
//!
//! `Γ ⊢ A > B` holds iff `Γ, A ⊢ B`, so a target implication can be traded for
//! an extra hypothesis. A hypothesis `A * B` contributes `A` and `B` on its
//! own.

use crate::logic::{Connective, Expression};

/// Result of peeling implications off a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Antecedents, outermost first
    pub hypotheses: Vec<Expression>,
    /// What remains to be proved
    pub target: Expression,
}

/// Peel `A1 > (A2 > ... > B)` into hypotheses `A1, A2, ...` and target `B`
pub fn deduction_decompose(target: &Expression) -> Decomposition {
    let mut hypotheses = Vec::new();
    let mut rest = target.clone();
    while rest.root_connective() == Some(Connective::Implication) {
        let (Some(left), Some(right)) = (rest.left_operand(), rest.right_operand()) else {
            break;
        };
        hypotheses.push(left);
        rest = right;
    }
    Decomposition {
        hypotheses,
        target: rest,
    }
}

/// Append both conjuncts of every conjunction in `hypotheses`.
///
/// Appended conjuncts are split in turn. Returns, for every entry of the
/// extended list, the index of the conjunction it was taken from (`None` for
/// the original entries).
pub fn split_conjunctions(hypotheses: &mut Vec<Expression>) -> Vec<Option<usize>> {
    let mut sources = vec![None; hypotheses.len()];
    let mut next = 0;
    while next < hypotheses.len() {
        let current = &hypotheses[next];
        if current.root_connective() == Some(Connective::Conjunction) {
            if let (Some(left), Some(right)) = (current.left_operand(), current.right_operand()) {
                hypotheses.push(left);
                hypotheses.push(right);
                sources.push(Some(next));
                sources.push(Some(next));
            }
        }
        next += 1;
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn expr(s: &str) -> Expression {
        parse_formula(s).unwrap()
    }

    fn strings(v: &[Expression]) -> Vec<String> {
        v.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_decompose_chain() {
        let d = deduction_decompose(&expr("a>(b*c)>d"));
        assert_eq!(strings(&d.hypotheses), vec!["a", "b*c"]);
        assert_eq!(d.target.to_string(), "d");
    }

    #[test]
    fn test_decompose_keeps_left_nested_implication() {
        let d = deduction_decompose(&expr("(a>b)>c"));
        assert_eq!(strings(&d.hypotheses), vec!["a>b"]);
        assert_eq!(d.target.to_string(), "c");
    }

    #[test]
    fn test_decompose_non_implication() {
        let d = deduction_decompose(&expr("a*b"));
        assert!(d.hypotheses.is_empty());
        assert_eq!(d.target, expr("a*b"));
    }

    #[test]
    fn test_split_nested_conjunctions() {
        let mut hyps = vec![expr("(a*b)*c"), expr("d")];
        let sources = split_conjunctions(&mut hyps);
        assert_eq!(strings(&hyps), vec!["(a*b)*c", "d", "a*b", "c", "a", "b"]);
        assert_eq!(
            sources,
            vec![None, None, Some(0), Some(0), Some(2), Some(2)]
        );
    }

    #[test]
    fn test_split_without_conjunctions() {
        let mut hyps = vec![expr("a>b")];
        let sources = split_conjunctions(&mut hyps);
        assert_eq!(hyps.len(), 1);
        assert_eq!(sources, vec![None]);
    }
}
