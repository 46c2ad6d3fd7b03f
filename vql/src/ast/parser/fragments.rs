// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sub-token grammars built with nom
//!
//! The lexer keeps punctuation attached to words, so the pieces a clause
//! parser works with (`VECTOR.embedding`, `COUNT(*)`, `title=Foo`) still carry
//! internal structure. These parsers take such a piece apart.

use nom::{
    bytes::complete::{take_till1, take_while, take_while1},
    character::complete::{char, digit1, satisfy},
    combinator::{all_consuming, map_res, recognize, rest, verify},
    sequence::{delimited, pair, separated_pair},
    IResult,
};

use crate::ast::{AggregateFunction, Modality, Projection};

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, '(' | ')' | ',') && !c.is_whitespace())(input)
}

/// `MODALITY.field`; the field may itself contain dots
fn field_path(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(identifier, char('.'), field_name)(input)
}

/// `FUNC(operand)` with no nested parentheses in the operand
fn call(input: &str) -> IResult<&str, (&str, &str)> {
    pair(identifier, group)(input)
}

fn unsigned(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |digits: &str| digits.parse::<u64>())(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        verify(take_till1(|c: char| c == '='), |field: &str| !field.trim().is_empty()),
        char('='),
        rest,
    )(input)
}

/// `VECTOR.embedding` -> Projection(Vector, "embedding")
pub(crate) fn projection(piece: &str) -> Option<Projection> {
    all_consuming(field_path)(piece)
        .ok()
        .map(|(_, (modality, field))| Projection::new(Modality::new(modality), field))
}

/// Operand of an aggregate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AggregateOperand {
    Star,
    Field(Projection),
    Other,
}

pub(crate) fn aggregate_operand(operand: &str) -> AggregateOperand {
    let operand = operand.trim();
    if operand == "*" {
        AggregateOperand::Star
    } else if let Some(projection) = projection(operand) {
        AggregateOperand::Field(projection)
    } else {
        AggregateOperand::Other
    }
}

/// `SUM(VECTOR.score)` -> (Sum, Field(..)); None unless the name is an
/// aggregate function
pub(crate) fn aggregate_call(piece: &str) -> Option<(AggregateFunction, AggregateOperand)> {
    let (_, (name, operand)) = all_consuming(call)(piece).ok()?;
    let function = AggregateFunction::from_name(name)?;
    Some((function, aggregate_operand(operand)))
}

fn group(input: &str) -> IResult<&str, &str> {
    delimited(char('('), take_till1(|c: char| c == '(' || c == ')'), char(')'))(input)
}

/// Non-negative decimal integer, nothing else
pub(crate) fn unsigned_integer(text: &str) -> Option<u64> {
    all_consuming(unsigned)(text).ok().map(|(_, value)| value)
}

/// `field=value`, both sides trimmed
pub(crate) fn field_assignment(text: &str) -> Option<(String, String)> {
    all_consuming(assignment)(text)
        .ok()
        .map(|(_, (field, value))| (field.trim().to_string(), value.trim().to_string()))
}

/// Split a token on commas and drop empty pieces (`GRAPH,` -> `GRAPH`)
pub(crate) fn comma_pieces(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|piece| !piece.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection() {
        assert_eq!(
            projection("VECTOR.embedding"),
            Some(Projection::new(Modality::vector(), "embedding"))
        );
        assert_eq!(
            projection("document.meta.author"),
            Some(Projection::new(Modality::document(), "meta.author"))
        );
        assert_eq!(projection("GRAPH"), None);
        assert_eq!(projection(".field"), None);
        assert_eq!(projection("GRAPH."), None);
        assert_eq!(projection("COUNT(x.y)"), None);
    }

    #[test]
    fn test_aggregate_call() {
        assert_eq!(
            aggregate_call("COUNT(*)"),
            Some((AggregateFunction::Count, AggregateOperand::Star))
        );
        assert_eq!(
            aggregate_call("avg(VECTOR.score)"),
            Some((
                AggregateFunction::Avg,
                AggregateOperand::Field(Projection::new(Modality::vector(), "score"))
            ))
        );
        assert_eq!(
            aggregate_call("MAX(score)"),
            Some((AggregateFunction::Max, AggregateOperand::Other))
        );
        assert_eq!(aggregate_call("MEDIAN(VECTOR.score)"), None);
        assert_eq!(aggregate_call("COUNT()"), None);
        assert_eq!(aggregate_call("COUNT(*)x"), None);
    }

    #[test]
    fn test_unsigned_integer() {
        assert_eq!(unsigned_integer("10"), Some(10));
        assert_eq!(unsigned_integer("0"), Some(0));
        assert_eq!(unsigned_integer("abc"), None);
        assert_eq!(unsigned_integer("-1"), None);
        assert_eq!(unsigned_integer("5x"), None);
        assert_eq!(unsigned_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_field_assignment() {
        assert_eq!(
            field_assignment("title=Foo"),
            Some(("title".to_string(), "Foo".to_string()))
        );
        assert_eq!(
            field_assignment(" title = Foo bar "),
            Some(("title".to_string(), "Foo bar".to_string()))
        );
        assert_eq!(
            field_assignment("expr=a=b"),
            Some(("expr".to_string(), "a=b".to_string()))
        );
        assert_eq!(field_assignment("title"), None);
        assert_eq!(field_assignment("=Foo"), None);
    }

    #[test]
    fn test_comma_pieces() {
        let pieces: Vec<&str> = comma_pieces("GRAPH,VECTOR.embedding,").collect();
        assert_eq!(pieces, vec!["GRAPH", "VECTOR.embedding"]);
        assert_eq!(comma_pieces(",").count(), 0);
    }
}
