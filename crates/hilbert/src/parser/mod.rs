//! Formula parser

pub mod formula;

pub use formula::{parse_formula, SyntaxError};
