// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! VQL - parsing front end for a federated multi-modal query language
//!
//! VQL addresses *hexads*: entities with synchronized representations across
//! several modalities (graph, vector, tensor, semantic, document, temporal).
//! This crate turns VQL text into a typed AST for a downstream planner. It
//! does not plan or execute anything.
//!
//! # Quick Start
//!
//! ```no_run
//! use vql::{parse_statement, Statement};
//!
//! let statement = parse_statement("SELECT GRAPH, VECTOR.embedding FROM HEXAD entity-42")?;
//! if let Statement::Query(query) = &statement {
//!     assert_eq!(query.modalities.len(), 2);
//! }
//! println!("{}", serde_json::to_string(&statement)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Layout
//!
//! - [`ast::lexer`]: whitespace tokenizer
//! - [`ast::parser`]: clause grammar for queries, mutations and proof chains
//! - [`ast::validator`]: modality membership checks above the parser
//! - [`ast::pretty_printer`]: canonical VQL rendering
//! - [`config`]: SELECT strictness and the modality registry
//! - [`bridge`]: JSON-lines request/response framing

pub mod ast;
pub mod bridge;
pub mod config;

pub use ast::parser::{
    parse_mutation, parse_query, parse_statement, Action, ParsedAst, Parser, ParserError,
    StatementParser,
};
pub use ast::validator::{validate_statement, ValidationError};
pub use ast::{
    Aggregate, AggregateFunction, Assignment, Condition, Direction, Modality, ModalityPayload,
    ModalityRegistry, Mutation, OrderItem, ProofSpec, Projection, Query, SelectedModality, Source,
    Statement,
};
pub use config::{ConfigError, ParserConfig, SelectMode};
