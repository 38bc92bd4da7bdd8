//! Propositional formula representation
//!
//! This module provides the fundamental types for representing formulas:
//! connectives with their operator tables, node terms, and the arena-backed
//! expression tree that every other component manipulates.

pub mod connective;
pub mod expression;
pub mod term;


pub use connective::{Connective, NegationSpread};
pub use expression::{Expression, Node};
pub use term::{AtomId, Term};
