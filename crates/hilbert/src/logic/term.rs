//! Node payloads: constants, variables and connectives

use super::connective::Connective;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer id of an atom (constant or variable). Ids start at 1.
pub type AtomId = u32;

/// What a single tree node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Fixed atom, never substituted
    Constant { id: AtomId, positive: bool },
    /// Schema placeholder, substitutable
    Variable { id: AtomId, positive: bool },
    Connective(Connective),
}

impl Term {
    pub fn constant(id: AtomId) -> Self {
        Term::Constant { id, positive: true }
    }

    pub fn variable(id: AtomId) -> Self {
        Term::Variable { id, positive: true }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Term::Connective(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable { .. })
    }

    /// The connective at this node, if any
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Term::Connective(op) => Some(*op),
            _ => None,
        }
    }

    /// Variable id, if this is a variable leaf
    pub fn variable_id(&self) -> Option<AtomId> {
        match self {
            Term::Variable { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Polarity of a leaf; connectives count as positive
    pub fn is_positive(&self) -> bool {
        match self {
            Term::Constant { positive, .. } | Term::Variable { positive, .. } => *positive,
            Term::Connective(_) => true,
        }
    }

    /// Flip the polarity of a leaf. Connectives are returned unchanged.
    pub fn flipped(self) -> Self {
        match self {
            Term::Constant { id, positive } => Term::Constant { id, positive: !positive },
            Term::Variable { id, positive } => Term::Variable { id, positive: !positive },
            op @ Term::Connective(_) => op,
        }
    }
}

fn letter(base: u8, id: AtomId) -> Option<char> {
    (1..=26).contains(&id).then(|| (base + (id - 1) as u8) as char)
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Term::Connective(op) => write!(f, "{}", op),
            Term::Constant { id, positive } => {
                if !positive {
                    write!(f, "!")?;
                }
                match letter(b'a', id) {
                    Some(c) => write!(f, "{}", c),
                    None => write!(f, "p{}", id),
                }
            }
            Term::Variable { id, positive } => {
                if !positive {
                    write!(f, "!")?;
                }
                match letter(b'A', id) {
                    Some(c) => write!(f, "{}", c),
                    None => write!(f, "X{}", id),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_leaves() {
        assert_eq!(Term::constant(1).to_string(), "a");
        assert_eq!(Term::constant(26).to_string(), "z");
        assert_eq!(Term::constant(27).to_string(), "p27");
        assert_eq!(Term::variable(2).to_string(), "B");
        assert_eq!(Term::variable(30).to_string(), "X30");
        assert_eq!(Term::constant(3).flipped().to_string(), "!c");
        assert_eq!(Term::Connective(Connective::Xor).to_string(), "+");
    }

    #[test]
    fn test_flip_is_involution() {
        let t = Term::variable(4);
        assert!(!t.flipped().is_positive());
        assert_eq!(t.flipped().flipped(), t);
        let op = Term::Connective(Connective::Implication);
        assert_eq!(op.flipped(), op);
    }
}
