//! Infix formula parser
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! implication := equivalence ( '>' implication )?
//! equivalence := disjunction ( ('+' | '=') disjunction )*
//! disjunction := conjunction ( '|' conjunction )*
//! conjunction := unary ( '*' unary )*
//! unary       := '!' unary | primary
//! primary     := atom | '(' implication ')'
//! atom        := [a-z] | [A-Z] | 'p' digits | 'X' digits
//! ```
//!
//! Lowercase letters are constants and uppercase letters are variables, both
//! numbered from 1. `p<n>` and `X<n>` name atoms past the alphabet. Whitespace
//! between tokens is ignored.

use crate::logic::{AtomId, Connective, Expression, Term};
use nom::{
    branch::alt,
    character::complete::{anychar, char, digit0, multispace0, satisfy},
    combinator::{all_consuming, cut, map, map_opt, opt},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};
use std::str::FromStr;
use thiserror::Error;

/// Malformed formula text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "syntax error at position {position}: {}",
    .found.map_or_else(|| "unexpected end of input".to_string(), |c| format!("unexpected '{}'", c))
)]
pub struct SyntaxError {
    /// Byte offset of the offending input
    pub position: usize,
    /// Offending character, `None` at end of input
    pub found: Option<char>,
}

/// Parse a complete formula
pub fn parse_formula(input: &str) -> Result<Expression, SyntaxError> {
    match all_consuming(implication)(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(syntax_error(input, e.input))
        }
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError {
            position: input.len(),
            found: None,
        }),
    }
}

fn syntax_error(source: &str, rest: &str) -> SyntaxError {
    SyntaxError {
        position: source.len() - rest.len(),
        found: rest.chars().next(),
    }
}

impl FromStr for Expression {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_formula(s)
    }
}

/// Wrap a parser so that surrounding whitespace is skipped
fn token<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// One of the given binary connective symbols
fn connective<'a>(ops: &'static [Connective]) -> impl FnMut(&'a str) -> IResult<&'a str, Connective> {
    token(map_opt(anychar, move |c| {
        Connective::from_symbol(c).filter(|op| ops.contains(op))
    }))
}

/// Left-associative chain of `operand`s joined by `ops`
fn chain<'a>(
    operand: fn(&'a str) -> IResult<&'a str, Expression>,
    ops: &'static [Connective],
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression> {
    map(
        pair(operand, many0(pair(connective(ops), cut(operand)))),
        |(first, rest)| {
            rest.into_iter()
                .fold(first, |acc, (op, rhs)| Expression::construct(&acc, op, &rhs))
        },
    )
}

fn implication(input: &str) -> IResult<&str, Expression> {
    let (input, lhs) = equivalence(input)?;
    let (input, rhs) = opt(preceded(
        connective(&[Connective::Implication]),
        cut(implication),
    ))(input)?;
    let expr = match rhs {
        Some(rhs) => Expression::construct(&lhs, Connective::Implication, &rhs),
        None => lhs,
    };
    Ok((input, expr))
}

fn equivalence(input: &str) -> IResult<&str, Expression> {
    chain(disjunction, &[Connective::Xor, Connective::Equivalence])(input)
}

fn disjunction(input: &str) -> IResult<&str, Expression> {
    chain(conjunction, &[Connective::Disjunction])(input)
}

fn conjunction(input: &str) -> IResult<&str, Expression> {
    chain(unary, &[Connective::Conjunction])(input)
}

fn unary(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(token(char('!')), cut(unary)), |operand| {
            Expression::negation(&operand)
        }),
        primary,
    ))(input)
}

fn primary(input: &str) -> IResult<&str, Expression> {
    alt((
        token(atom),
        delimited(
            token(char('(')),
            cut(implication),
            cut(token(char(')'))),
        ),
    ))(input)
}

fn atom(input: &str) -> IResult<&str, Expression> {
    let (rest, (letter, digits)) = pair(satisfy(|c| c.is_ascii_alphabetic()), digit0)(input)?;
    let term = if digits.is_empty() {
        if letter.is_ascii_lowercase() {
            Term::constant(letter as AtomId - 'a' as AtomId + 1)
        } else {
            Term::variable(letter as AtomId - 'A' as AtomId + 1)
        }
    } else {
        let number = &input[1..];
        let id = match digits.parse::<AtomId>() {
            Ok(id) if id > 0 => id,
            _ => return Err(nom::Err::Failure(Error::new(number, ErrorKind::Digit))),
        };
        match letter {
            'p' => Term::constant(id),
            'X' => Term::variable(id),
            _ => return Err(nom::Err::Failure(Error::new(number, ErrorKind::Digit))),
        }
    };
    Ok((rest, Expression::leaf(term)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(s: &str) -> String {
        parse_formula(s).unwrap().to_string()
    }

    #[test]
    fn test_parse_atoms() {
        assert_eq!(printed("a"), "a");
        assert_eq!(printed("Z"), "Z");
        assert_eq!(printed("!b"), "!b");
        assert_eq!(printed("p27"), "p27");
        assert_eq!(printed("X40"), "X40");

        let e = parse_formula("c").unwrap();
        assert_eq!(e.root().term, Term::constant(3));
        let v = parse_formula("C").unwrap();
        assert_eq!(v.root().term, Term::variable(3));
    }

    #[test]
    fn test_implication_is_right_associative() {
        assert_eq!(printed("a>b>c"), "a>(b>c)");
        assert_eq!(printed("(a>b)>c"), "(a>b)>c");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(printed("a*b|c"), "(a*b)|c");
        assert_eq!(printed("a|b*c"), "a|(b*c)");
        assert_eq!(printed("a|b+c"), "(a|b)+c");
        assert_eq!(printed("a+b>c"), "(a+b)>c");
        assert_eq!(printed("a>b=c"), "a>(b=c)");
        assert_eq!(printed("!a*b"), "!a*b");
        assert_eq!(printed("!(a*b)"), "!(a*b)");
    }

    #[test]
    fn test_xor_and_equivalence_share_a_level() {
        assert_eq!(printed("a+b=c"), "(a+b)=c");
        assert_eq!(printed("a=b+c"), "(a=b)+c");
        assert_eq!(printed("a*b*c"), "(a*b)*c");
    }

    #[test]
    fn test_double_negation_of_atom() {
        assert_eq!(printed("!!a"), "a");
        assert_eq!(printed("!!!A"), "!A");
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(printed("  a >\t( b * ! c ) "), "a>(b*!c)");
    }

    #[test]
    fn test_printed_form_round_trips() {
        for s in [
            "((a*b)|!c)>(a*b)",
            "(A>(B>C))>((A>B)>(A>C))",
            "(!A>!B)>((!A>B)>A)",
            "(!(a>b))=(a*!b)",
            "p30>(X27+a)",
        ] {
            let e = parse_formula(s).unwrap();
            assert_eq!(e.to_string(), s);
            assert_eq!(s.parse::<Expression>().unwrap(), e);
            assert!(e.is_well_formed());
        }
    }

    #[test]
    fn test_syntax_errors_report_position() {
        let err = parse_formula("a>").unwrap_err();
        assert_eq!(err, SyntaxError { position: 2, found: None });

        let err = parse_formula("a?b").unwrap_err();
        assert_eq!(err, SyntaxError { position: 1, found: Some('?') });

        let err = parse_formula("(a").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.found, None);

        let err = parse_formula("a b").unwrap_err();
        assert_eq!(err, SyntaxError { position: 2, found: Some('b') });

        assert_eq!(parse_formula("").unwrap_err().position, 0);
        assert_eq!(parse_formula(")").unwrap_err().found, Some(')'));
    }

    #[test]
    fn test_bad_numbered_atom() {
        let err = parse_formula("q12").unwrap_err();
        assert_eq!(err.position, 1);
        assert!(parse_formula("p0").is_err());
    }

    #[test]
    fn test_error_message() {
        let err = parse_formula("a>").unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error at position 2: unexpected end of input"
        );
        let err = parse_formula("a?").unwrap_err();
        assert_eq!(err.to_string(), "syntax error at position 1: unexpected '?'");
    }
}
