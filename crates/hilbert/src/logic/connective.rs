//! Logical connectives and their fixed metadata tables
//!
//! Operator metadata (symbol, binding strength, De Morgan opposite and the
//! operands a negation is pushed into) lives in process-wide immutable tables
//! indexed by the connective's discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An n-ary logical operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Connective {
    /// Unary `!`, operand stored as the right child
    Negation = 0,
    /// `*`
    Conjunction = 1,
    /// `|`
    Disjunction = 2,
    /// `>`
    Implication = 3,
    /// `+`
    Xor = 4,
    /// `=`
    Equivalence = 5,
}

/// Which operands a negation is pushed into when the connective is negated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegationSpread {
    pub left: bool,
    pub right: bool,
}

const ALL: [Connective; 6] = [
    Connective::Negation,
    Connective::Conjunction,
    Connective::Disjunction,
    Connective::Implication,
    Connective::Xor,
    Connective::Equivalence,
];

static SYMBOLS: [char; 6] = ['!', '*', '|', '>', '+', '='];

/// Higher binds tighter.
static PRECEDENCE: [u8; 6] = [5, 4, 3, 1, 2, 2];

static OPPOSITE: [Connective; 6] = [
    Connective::Negation,
    Connective::Implication,
    Connective::Conjunction,
    Connective::Conjunction,
    Connective::Equivalence,
    Connective::Xor,
];

static SPREAD: [NegationSpread; 6] = [
    NegationSpread { left: false, right: true },
    NegationSpread { left: false, right: true },
    NegationSpread { left: true, right: true },
    NegationSpread { left: false, right: true },
    NegationSpread { left: false, right: false },
    NegationSpread { left: false, right: false },
];

impl Connective {
    /// All connectives in table order
    pub fn all() -> &'static [Connective] {
        &ALL
    }

    /// Infix (or prefix, for negation) symbol
    pub fn symbol(self) -> char {
        SYMBOLS[self as usize]
    }

    /// Look up a connective by its symbol
    pub fn from_symbol(symbol: char) -> Option<Connective> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(|idx| ALL[idx])
    }

    /// Binding strength: negation > conjunction > disjunction > xor = equivalence > implication
    pub fn precedence(self) -> u8 {
        PRECEDENCE[self as usize]
    }

    /// The connective a negated formula with this root is rewritten to.
    ///
    /// `!(A>B)` becomes `A*!B`, `!(A*B)` becomes `A>!B`, `!(A|B)` becomes
    /// `!A*!B` and xor/equivalence swap without touching their operands.
    pub fn opposite(self) -> Connective {
        OPPOSITE[self as usize]
    }

    /// Operands that receive the negation when this connective is negated
    pub fn negation_spread(self) -> NegationSpread {
        SPREAD[self as usize]
    }

    pub fn is_unary(self) -> bool {
        self == Connective::Negation
    }

    /// Only implication groups to the right: `a>b>c` is `a>(b>c)`
    pub fn is_right_associative(self) -> bool {
        self == Connective::Implication
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for &op in Connective::all() {
            assert_eq!(Connective::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Connective::from_symbol('a'), None);
    }

    #[test]
    fn test_precedence_order() {
        use Connective::*;
        assert!(Negation.precedence() > Conjunction.precedence());
        assert!(Conjunction.precedence() > Disjunction.precedence());
        assert!(Disjunction.precedence() > Xor.precedence());
        assert_eq!(Xor.precedence(), Equivalence.precedence());
        assert!(Equivalence.precedence() > Implication.precedence());
    }

    #[test]
    fn test_opposite_table() {
        use Connective::*;
        assert_eq!(Negation.opposite(), Negation);
        assert_eq!(Disjunction.opposite(), Conjunction);
        assert_eq!(Implication.opposite(), Conjunction);
        assert_eq!(Conjunction.opposite(), Implication);
        assert_eq!(Xor.opposite(), Equivalence);
        assert_eq!(Equivalence.opposite(), Xor);
    }

    #[test]
    fn test_negation_spread() {
        use Connective::*;
        assert!(Disjunction.negation_spread().left);
        assert!(!Implication.negation_spread().left);
        assert!(Implication.negation_spread().right);
        assert!(!Conjunction.negation_spread().left);
        assert_eq!(
            Xor.negation_spread(),
            NegationSpread { left: false, right: false }
        );
    }
}
