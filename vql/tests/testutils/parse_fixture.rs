//! Parser fixture used by the integration tests

use serde_json::Value as JsonValue;
use vql::{
    Action, Mutation, ParsedAst, Parser, ParserConfig, ParserError, Query, Statement,
    StatementParser,
};

/// A configured parser plus assertion helpers that report the failing input
pub struct ParseFixture {
    parser: Parser,
}

impl ParseFixture {
    /// Default configuration: built-in modalities, lenient SELECT
    pub fn new() -> Self {
        super::init_logging();
        Self {
            parser: Parser::default(),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        super::init_logging();
        Self {
            parser: Parser::new(config),
        }
    }

    pub fn strict() -> Self {
        Self::with_config(ParserConfig::strict())
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn assert_statement(&self, input: &str) -> Statement {
        match self.parser.parse_statement(input) {
            Ok(statement) => statement,
            Err(error) => panic!("Statement should parse: {}\n  error: {}", input, error),
        }
    }

    pub fn assert_query(&self, input: &str) -> Query {
        match self.parser.parse_query(input) {
            Ok(query) => query,
            Err(error) => panic!("Query should parse: {}\n  error: {}", input, error),
        }
    }

    pub fn assert_mutation(&self, input: &str) -> Mutation {
        match self.parser.parse_mutation(input) {
            Ok(mutation) => mutation,
            Err(error) => panic!("Mutation should parse: {}\n  error: {}", input, error),
        }
    }

    pub fn assert_action(&self, action: Action, input: &str) -> ParsedAst {
        match self.parser.parse_with_action(action, input) {
            Ok(ast) => ast,
            Err(error) => panic!("{} should accept: {}\n  error: {}", action, input, error),
        }
    }

    /// Parse with statement dispatch and expect a failure
    pub fn assert_fails(&self, input: &str) -> ParserError {
        match self.parser.parse_statement(input) {
            Ok(statement) => panic!("Statement should fail: {}\n  parsed: {:?}", input, statement),
            Err(error) => error,
        }
    }

    pub fn assert_action_fails(&self, action: Action, input: &str) -> ParserError {
        match self.parser.parse_with_action(action, input) {
            Ok(ast) => panic!("{} should reject: {}\n  parsed: {:?}", action, input, ast),
            Err(error) => error,
        }
    }

    /// JSON encoding of the statement handed to downstream consumers
    pub fn statement_json(&self, input: &str) -> JsonValue {
        let statement = self.assert_statement(input);
        serde_json::to_value(&statement).expect("Statement should serialize")
    }
}

impl Default for ParseFixture {
    fn default() -> Self {
        Self::new()
    }
}
