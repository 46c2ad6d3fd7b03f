// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query clause grammar
//!
//! SELECT items FROM source [WHERE raw] [GROUP BY fields] [HAVING raw]
//! [PROOF chain] [ORDER BY fields] [LIMIT n] [OFFSET n]
//!
//! Clauses after FROM are optional but must appear in this order. Each raw or
//! list clause stops at the keywords of the clauses allowed to follow it.

use log::{trace, warn};

use super::fragments::{self, AggregateOperand};
use super::proof::ProofRequirement;
use super::{ClauseParser, ParserError};
use crate::ast::lexer::Token;
use crate::ast::{
    Aggregate, AggregateFunction, Condition, Direction, OrderItem, Projection, Query,
    SelectedModality, Source,
};

const WHERE_TERMINATORS: &[&str] = &["PROOF", "GROUP", "HAVING", "ORDER", "LIMIT", "OFFSET"];
const GROUP_BY_TERMINATORS: &[&str] = &["HAVING", "PROOF", "ORDER", "LIMIT", "OFFSET"];
const HAVING_TERMINATORS: &[&str] = &["PROOF", "ORDER", "LIMIT", "OFFSET"];
const ORDER_BY_TERMINATORS: &[&str] = &["LIMIT", "OFFSET"];

const SELECT_ITEM: &str = "aggregate, MODALITY.field, * or modality name";

/// Items collected from the SELECT list
#[derive(Debug, Default)]
struct SelectList {
    modalities: Vec<SelectedModality>,
    projections: Vec<Projection>,
    aggregates: Vec<Aggregate>,
}

impl SelectList {
    fn register(&mut self, modality: SelectedModality) {
        if !self.modalities.contains(&modality) {
            self.modalities.push(modality);
        }
    }
}

impl<'a> ClauseParser<'a> {
    /// Parse a complete query; PROOF is optional
    pub(super) fn query(&mut self) -> Result<Query, ParserError> {
        self.query_with(ProofRequirement::Optional)
    }

    pub(super) fn query_with(&mut self, requirement: ProofRequirement) -> Result<Query, ParserError> {
        let select = self.select_clause()?;
        let source = self.from_clause()?;

        let mut query = Query::new(source);
        query.modalities = select.modalities;
        query.projections = select.projections;
        query.aggregates = select.aggregates;

        if self.stream.match_keyword("WHERE") {
            query.where_clause = Some(self.raw_condition(WHERE_TERMINATORS));
            trace!("WHERE clause: {:?}", query.where_clause);
        }

        if self.stream.check_keyword("GROUP") {
            query.group_by = self.group_by_clause()?;
        }

        if self.stream.match_keyword("HAVING") {
            query.having = Some(self.raw_condition(HAVING_TERMINATORS));
            trace!("HAVING clause: {:?}", query.having);
        }

        query.proof = self.proof_clause(requirement)?;

        if self.stream.check_keyword("ORDER") {
            query.order_by = self.order_by_clause()?;
        }

        if self.stream.match_keyword("LIMIT") {
            query.limit = Some(self.unsigned_operand("LIMIT value")?);
        }

        if self.stream.match_keyword("OFFSET") {
            query.offset = Some(self.unsigned_operand("OFFSET value")?);
        }

        self.stream.expect_end("end of statement")?;
        Ok(query)
    }

    fn select_clause(&mut self) -> Result<SelectList, ParserError> {
        self.stream.expect_keyword("SELECT")?;
        if let Some(token) = self.stream.peek() {
            if token.is_keyword("FROM") {
                return Err(ParserError::unexpected("select item", token));
            }
        }

        let mut select = SelectList::default();
        while let Some(token) = self.stream.peek() {
            if token.is_keyword("FROM") {
                break;
            }
            let token = self.stream.expect_token("select item")?;
            let pieces: Vec<&str> = fragments::comma_pieces(&token.text).collect();
            let last = pieces.len().saturating_sub(1);
            let open_call = !token.text.trim_end().ends_with(',');

            for (index, piece) in pieces.iter().enumerate() {
                // `COUNT (*)` arrives as two tokens
                if index == last && open_call && AggregateFunction::from_name(piece).is_some() {
                    if let Some(operand) = self.detached_operand() {
                        let call = format!("{}{}", piece, operand.text.trim_end_matches(','));
                        self.select_item(&call, &operand, &mut select)?;
                        continue;
                    }
                }
                self.select_item(piece, &token, &mut select)?;
            }
        }

        trace!(
            "SELECT list: {} modalities, {} projections, {} aggregates",
            select.modalities.len(),
            select.projections.len(),
            select.aggregates.len()
        );
        Ok(select)
    }

    /// Consume the next token if it is a parenthesized aggregate operand
    fn detached_operand(&mut self) -> Option<Token> {
        let opens_group = self
            .stream
            .peek()
            .is_some_and(|next| next.text.starts_with('('));
        if opens_group {
            self.stream.advance()
        } else {
            None
        }
    }

    fn select_item(
        &self,
        piece: &str,
        token: &Token,
        select: &mut SelectList,
    ) -> Result<(), ParserError> {
        if piece == "*" {
            select.register(SelectedModality::All);
            return Ok(());
        }

        if let Some((function, operand)) = fragments::aggregate_call(piece) {
            match (function, operand) {
                (AggregateFunction::Count, AggregateOperand::Star) => {
                    select.aggregates.push(Aggregate::CountAll);
                }
                (function, AggregateOperand::Field(projection)) => {
                    select.register(projection.modality.clone().into());
                    select.aggregates.push(Aggregate::AggregateField {
                        function,
                        modality: projection.modality,
                        field: projection.field,
                    });
                }
                _ => return self.unrecognized_select_item(piece, token),
            }
            return Ok(());
        }

        if let Some(projection) = fragments::projection(piece) {
            select.register(projection.modality.clone().into());
            select.projections.push(projection);
            return Ok(());
        }

        if let Some(modality) = self.config.modalities.resolve(piece) {
            select.register(modality.into());
            return Ok(());
        }

        self.unrecognized_select_item(piece, token)
    }

    fn unrecognized_select_item(&self, piece: &str, token: &Token) -> Result<(), ParserError> {
        if self.config.is_strict() {
            return Err(ParserError::UnexpectedToken {
                expected: SELECT_ITEM.to_string(),
                found: piece.to_string(),
                position: token.position,
            });
        }
        warn!(
            "Dropping unrecognized SELECT item '{}' at position {}",
            piece, token.position
        );
        Ok(())
    }

    fn from_clause(&mut self) -> Result<Source, ParserError> {
        self.stream.expect_keyword("FROM")?;
        let kind = self.stream.expect_token("source kind")?;

        let source = match kind.upper().as_str() {
            "HEXAD" => Source::Hexad {
                id: self.stream.expect_operand("hexad identifier")?.text,
            },
            "STORE" => Source::Store {
                name: self.stream.expect_operand("store name")?.text,
            },
            "FEDERATION" => {
                let pattern = self.stream.expect_operand("federation pattern")?.text;
                let drift_policy = if self.stream.match_keyword("WITH") {
                    self.stream.expect_keyword("DRIFT")?;
                    Some(self.stream.expect_operand("drift policy")?.upper())
                } else {
                    None
                };
                Source::Federation {
                    pattern,
                    drift_policy,
                }
            }
            _ => {
                return Err(ParserError::UnknownSourceKind {
                    token: kind.text,
                    position: kind.position,
                })
            }
        };

        trace!("FROM clause: {:?}", source);
        Ok(source)
    }

    /// Capture tokens verbatim up to the next terminator, single-space joined
    fn raw_condition(&mut self, terminators: &[&str]) -> Condition {
        let tokens = self.stream.take_until(terminators);
        let text = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Condition::raw(text)
    }

    fn group_by_clause(&mut self) -> Result<Vec<Projection>, ParserError> {
        self.stream.expect_keyword("GROUP")?;
        self.stream.expect_keyword("BY")?;

        let mut fields = Vec::new();
        for token in self.stream.take_until(GROUP_BY_TERMINATORS) {
            for piece in fragments::comma_pieces(&token.text) {
                match fragments::projection(piece) {
                    Some(projection) => fields.push(projection),
                    None => trace!("Skipping GROUP BY item '{}'", piece),
                }
            }
        }
        Ok(fields)
    }

    fn order_by_clause(&mut self) -> Result<Vec<OrderItem>, ParserError> {
        self.stream.expect_keyword("ORDER")?;
        self.stream.expect_keyword("BY")?;

        let mut items = Vec::new();
        let mut pending: Option<Projection> = None;

        for token in self.stream.take_until(ORDER_BY_TERMINATORS) {
            for piece in fragments::comma_pieces(&token.text) {
                let direction = match piece.to_ascii_uppercase().as_str() {
                    "ASC" => Some(Direction::Asc),
                    "DESC" => Some(Direction::Desc),
                    _ => None,
                };

                match (direction, fragments::projection(piece)) {
                    (Some(direction), _) => {
                        if let Some(projection) = pending.take() {
                            items.push(OrderItem {
                                projection,
                                direction,
                            });
                        }
                    }
                    (None, Some(projection)) => {
                        if let Some(previous) = pending.replace(projection) {
                            items.push(OrderItem {
                                projection: previous,
                                direction: Direction::Asc,
                            });
                        }
                    }
                    (None, None) => trace!("Skipping ORDER BY item '{}'", piece),
                }
            }
        }

        if let Some(projection) = pending {
            items.push(OrderItem {
                projection,
                direction: Direction::Asc,
            });
        }
        Ok(items)
    }

    fn unsigned_operand(&mut self, expected: &str) -> Result<u64, ParserError> {
        let token = self.stream.expect_token(expected)?;
        fragments::unsigned_integer(&token.text).ok_or(ParserError::MalformedNumber {
            token: token.text,
            position: token.position,
        })
    }
}
