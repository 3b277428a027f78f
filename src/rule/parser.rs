//! Rule text parser
//!
//! ```text
//! expr := and ('|' and)*
//! and  := atom ('&' atom)*
//! atom := ident '[' ident ']' | '(' expr ')'
//! ```
//!
//! `&` binds tighter than `|`; both fold left.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{all_consuming, map, recognize},
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded},
};

use super::{Antecedent, TermRef};
use crate::error::FuzzyError;

/// Parser error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleParseError {
    #[error("syntax error at position {position} in \"{input}\": {message}")]
    Syntax {
        input: String,
        position: usize,
        message: String,
    },

    #[error("empty rule expression")]
    Empty,
}

impl From<RuleParseError> for FuzzyError {
    fn from(err: RuleParseError) -> Self {
        FuzzyError::rule_syntax(err.to_string())
            .with_hint("write terms as variable[term], combined with & (and), | (or) and parentheses")
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// `variable[term]`
fn term_ref(input: &str) -> IResult<&str, TermRef> {
    map(
        pair(
            identifier,
            delimited(
                preceded(multispace0, char('[')),
                delimited(multispace0, identifier, multispace0),
                char(']'),
            ),
        ),
        |(variable, term)| TermRef::new(variable, term),
    )(input)
}

fn atom(input: &str) -> IResult<&str, Antecedent> {
    delimited(
        multispace0,
        alt((
            map(term_ref, Antecedent::Term),
            delimited(char('('), expression, preceded(multispace0, char(')'))),
        )),
        multispace0,
    )(input)
}

fn conjunction(input: &str) -> IResult<&str, Antecedent> {
    let (input, first) = atom(input)?;
    let (input, rest) = many0(preceded(char('&'), atom))(input)?;
    Ok((input, rest.into_iter().fold(first, Antecedent::and)))
}

fn expression(input: &str) -> IResult<&str, Antecedent> {
    let (input, first) = conjunction(input)?;
    let (input, rest) = many0(preceded(char('|'), conjunction))(input)?;
    Ok((input, rest.into_iter().fold(first, Antecedent::or)))
}

fn syntax_error(input: &str, err: nom::Err<nom::error::Error<&str>>) -> RuleParseError {
    let remaining = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => "",
    };
    let message = match remaining.trim_start().chars().next() {
        Some(c) => format!("unexpected '{}'", c),
        None => "unexpected end of input".to_string(),
    };
    RuleParseError::Syntax {
        input: input.to_string(),
        position: input.len() - remaining.trim_start().len(),
        message,
    }
}

pub(crate) fn parse_antecedent(input: &str) -> Result<Antecedent, RuleParseError> {
    if input.trim().is_empty() {
        return Err(RuleParseError::Empty);
    }
    all_consuming(expression)(input)
        .map(|(_, expr)| expr)
        .map_err(|e| syntax_error(input, e))
}

pub(crate) fn parse_term_ref(input: &str) -> Result<TermRef, RuleParseError> {
    if input.trim().is_empty() {
        return Err(RuleParseError::Empty);
    }
    all_consuming(delimited(multispace0, term_ref, multispace0))(input)
        .map(|(_, r)| r)
        .map_err(|e| syntax_error(input, e))
}
