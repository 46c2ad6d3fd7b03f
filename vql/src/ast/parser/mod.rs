// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Recursive-descent parser for VQL statements
//!
//! Entry points:
//! - [`parse_statement`]: dispatch on the first keyword (query or mutation)
//! - [`parse_query`] / [`parse_mutation`]: a known statement family
//! - [`Parser::parse_slipstream`] / [`Parser::parse_dependent_type`]: the query
//!   grammar for the unverified and the proof-carrying execution paths
//!
//! The first grammar violation aborts the parse; no partial AST is returned.

mod fragments;
mod mutation;
mod proof;
mod query;
mod stream;

use log::debug;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ast::{Mutation, Query, Statement};
use super::lexer::{tokenize, Token};
use super::pretty_printer::pretty_print_ast;
use crate::config::ParserConfig;
use stream::TokenStream;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    #[error("Expected {expected}, found '{found}' at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("Expected {expected}, found end of input at position {position}")]
    UnexpectedEnd { expected: String, position: usize },
    #[error("Unknown source kind '{token}' at position {position}. Expected HEXAD, STORE or FEDERATION")]
    UnknownSourceKind { token: String, position: usize },
    #[error("Unknown statement kind '{token}' at position {position}. Expected INSERT, UPDATE or DELETE")]
    UnknownStatementKind { token: String, position: usize },
    #[error("Malformed number '{token}' at position {position}. Expected a non-negative integer")]
    MalformedNumber { token: String, position: usize },
    #[error("Dangling AND at position {position}. Expected a proof specification after AND")]
    DanglingProofChain { position: usize },
    #[error("Missing PROOF clause at position {position}. Dependent-type queries must carry at least one proof")]
    MissingProofClause { position: usize },
    #[error("Unexpected PROOF clause at position {position}. Slipstream queries cannot carry proofs")]
    UnexpectedProofClause { position: usize },
}

impl ParserError {
    pub(crate) fn unexpected(expected: &str, found: &Token) -> Self {
        ParserError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.text.clone(),
            position: found.position,
        }
    }

    /// Token index at which matching failed
    pub fn position(&self) -> usize {
        match self {
            ParserError::UnexpectedToken { position, .. }
            | ParserError::UnexpectedEnd { position, .. }
            | ParserError::UnknownSourceKind { position, .. }
            | ParserError::UnknownStatementKind { position, .. }
            | ParserError::MalformedNumber { position, .. }
            | ParserError::DanglingProofChain { position }
            | ParserError::MissingProofClause { position }
            | ParserError::UnexpectedProofClause { position } => *position,
        }
    }
}

/// Entry grammar selector; the clause grammar is shared by all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Query,
    Slipstream,
    DependentType,
    Mutation,
    Statement,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Query,
        Action::Slipstream,
        Action::DependentType,
        Action::Mutation,
        Action::Statement,
    ];

    /// Name used on the wire and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Action::Query => "parse",
            Action::Slipstream => "parseSlipstream",
            Action::DependentType => "parseDependentType",
            Action::Mutation => "parseMutation",
            Action::Statement => "parseStatement",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Result of [`StatementParser::parse_with_action`]; serializes as the inner node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedAst {
    Query(Query),
    Mutation(Mutation),
    Statement(Statement),
}

impl ParsedAst {
    /// Wrap into the statement envelope regardless of the entry point used
    pub fn into_statement(self) -> Statement {
        match self {
            ParsedAst::Query(query) => Statement::Query(query),
            ParsedAst::Mutation(mutation) => Statement::Mutation(mutation),
            ParsedAst::Statement(statement) => statement,
        }
    }
}

/// Capability interface for turning VQL text into an AST
pub trait StatementParser {
    fn parse_statement(&self, input: &str) -> Result<Statement, ParserError>;
    fn parse_query(&self, input: &str) -> Result<Query, ParserError>;
    fn parse_mutation(&self, input: &str) -> Result<Mutation, ParserError>;
    fn parse_slipstream(&self, input: &str) -> Result<Query, ParserError>;
    fn parse_dependent_type(&self, input: &str) -> Result<Query, ParserError>;

    fn parse_with_action(&self, action: Action, input: &str) -> Result<ParsedAst, ParserError> {
        match action {
            Action::Query => self.parse_query(input).map(ParsedAst::Query),
            Action::Slipstream => self.parse_slipstream(input).map(ParsedAst::Query),
            Action::DependentType => self.parse_dependent_type(input).map(ParsedAst::Query),
            Action::Mutation => self.parse_mutation(input).map(ParsedAst::Mutation),
            Action::Statement => self.parse_statement(input).map(ParsedAst::Statement),
        }
    }
}

/// Shared state of one parse: the configuration and the token cursor
pub(crate) struct ClauseParser<'a> {
    config: &'a ParserConfig,
    stream: TokenStream,
}

impl<'a> ClauseParser<'a> {
    fn new(config: &'a ParserConfig, input: &str) -> Self {
        Self {
            config,
            stream: TokenStream::new(tokenize(input)),
        }
    }
}

/// The VQL parser. Holds only immutable configuration, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl StatementParser for Parser {
    fn parse_statement(&self, input: &str) -> Result<Statement, ParserError> {
        let mut parser = ClauseParser::new(&self.config, input);
        let is_mutation = match parser.stream.peek() {
            Some(first) => first.is_any_keyword(mutation::MUTATION_KEYWORDS),
            None => return Err(parser.stream.unexpected_end("statement")),
        };
        let statement = if is_mutation {
            Statement::Mutation(parser.mutation()?)
        } else {
            Statement::Query(parser.query()?)
        };

        debug!("Successfully parsed {} statement into AST", statement.kind());
        pretty_print_ast(&statement);
        Ok(statement)
    }

    fn parse_query(&self, input: &str) -> Result<Query, ParserError> {
        let query = ClauseParser::new(&self.config, input).query()?;
        debug!(
            "Successfully parsed query into AST: {} modalities, {} proofs",
            query.modalities.len(),
            query.proof.len()
        );
        pretty_print_ast(&query);
        Ok(query)
    }

    fn parse_mutation(&self, input: &str) -> Result<Mutation, ParserError> {
        let mutation = ClauseParser::new(&self.config, input).mutation()?;
        debug!("Successfully parsed {} mutation into AST", mutation.keyword());
        pretty_print_ast(&mutation);
        Ok(mutation)
    }

    fn parse_slipstream(&self, input: &str) -> Result<Query, ParserError> {
        let mut parser = ClauseParser::new(&self.config, input);
        let query = parser.query_with(proof::ProofRequirement::Forbidden)?;
        debug!("Successfully parsed slipstream query into AST");
        pretty_print_ast(&query);
        Ok(query)
    }

    fn parse_dependent_type(&self, input: &str) -> Result<Query, ParserError> {
        let mut parser = ClauseParser::new(&self.config, input);
        let query = parser.query_with(proof::ProofRequirement::Required)?;
        debug!(
            "Successfully parsed dependent-type query into AST with {} proofs",
            query.proof.len()
        );
        pretty_print_ast(&query);
        Ok(query)
    }
}

static DEFAULT_PARSER: Lazy<Parser> = Lazy::new(Parser::default);

/// Parse a query or mutation with the default configuration
pub fn parse_statement(input: &str) -> Result<Statement, ParserError> {
    DEFAULT_PARSER.parse_statement(input)
}

/// Parse a read query with the default configuration
pub fn parse_query(input: &str) -> Result<Query, ParserError> {
    DEFAULT_PARSER.parse_query(input)
}

/// Parse an INSERT, UPDATE or DELETE with the default configuration
pub fn parse_mutation(input: &str) -> Result<Mutation, ParserError> {
    DEFAULT_PARSER.parse_mutation(input)
}
