// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Token stream for parsing
//!
//! Tokens are consumed strictly left to right with one token of lookahead.
//! There is no backtracking across a consumed token.

use super::ParserError;
use crate::ast::lexer::Token;

/// Keywords that open a clause; never accepted as identifiers or operands
pub(crate) const CLAUSE_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "HAVING", "PROOF", "ORDER", "LIMIT", "OFFSET",
];

#[derive(Debug)]
pub(crate) struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Position of the next token; equals the token count once exhausted
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub fn check_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    pub fn check_any_keyword(&self, keywords: &[&str]) -> bool {
        self.peek().is_some_and(|t| t.is_any_keyword(keywords))
    }

    /// Consume the next token if it is `keyword`
    pub fn match_keyword(&mut self, keyword: &str) -> bool {
        if self.check_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a `,` at the front of the next token (`,VECTOR(x)` continues as
    /// `VECTOR(x)`); a bare `,` token is consumed whole
    pub fn match_leading_comma(&mut self) -> bool {
        let Some(token) = self.tokens.get_mut(self.pos) else {
            return false;
        };
        let Some(rest) = token.text.strip_prefix(',') else {
            return false;
        };
        if rest.is_empty() {
            self.pos += 1;
        } else {
            token.text = rest.to_string();
            token.offset += 1;
        }
        true
    }

    /// Consume `keyword` or fail naming it as the expected token
    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParserError> {
        match self.peek() {
            Some(token) if !token.is_keyword(keyword) => Err(ParserError::unexpected(keyword, token)),
            Some(_) => Ok(self.advance_unchecked()),
            None => Err(self.unexpected_end(keyword)),
        }
    }

    /// Consume any next token
    pub fn expect_token(&mut self, expected: &str) -> Result<Token, ParserError> {
        self.advance().ok_or_else(|| self.unexpected_end(expected))
    }

    /// Consume the next token as an operand (identifier, id, pattern); clause
    /// keywords are rejected
    pub fn expect_operand(&mut self, expected: &str) -> Result<Token, ParserError> {
        match self.peek() {
            Some(token) if token.is_any_keyword(CLAUSE_KEYWORDS) => {
                Err(ParserError::unexpected(expected, token))
            }
            Some(_) => Ok(self.advance_unchecked()),
            None => Err(self.unexpected_end(expected)),
        }
    }

    /// Consume tokens until one of `stops` is next (or input ends). A stop
    /// keyword ends the capture even when it follows an apostrophe or quote.
    pub fn take_until(&mut self, stops: &[&str]) -> Vec<Token> {
        let mut taken = Vec::new();
        while let Some(token) = self.peek() {
            if token.is_any_keyword(stops) {
                break;
            }
            taken.push(self.advance_unchecked());
        }
        taken
    }

    /// Consume tokens until the group opened by `head` is closed. `head` is
    /// the text starting at the opening `(`; it may already close the group.
    /// Only parentheses are counted, so `(author=O'Brien)` closes normally.
    pub fn take_group(&mut self, head: &str) -> Result<DelimitedGroup, ParserError> {
        let mut text = head.to_string();
        let mut scan = DelimiterScan::default();
        scan.feed(head);
        while !scan.at_top_level() {
            let token = self.advance().ok_or_else(|| self.unexpected_end("')'"))?;
            scan.feed(&token.text);
            text.push(' ');
            text.push_str(&token.text);
        }
        Ok(DelimitedGroup::split(&text))
    }

    /// Succeed only if every token was consumed
    pub fn expect_end(&self, expected: &str) -> Result<(), ParserError> {
        match self.peek() {
            Some(token) => Err(ParserError::unexpected(expected, token)),
            None => Ok(()),
        }
    }

    pub fn unexpected_end(&self, expected: &str) -> ParserError {
        ParserError::UnexpectedEnd {
            expected: expected.to_string(),
            position: self.tokens.len(),
        }
    }

    fn advance_unchecked(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }
}

/// A parenthesized span and whatever followed its closing parenthesis in the
/// same token (`(title=Foo),` -> inner `title=Foo`, trailing `,`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DelimitedGroup {
    pub inner: String,
    pub trailing: String,
}

impl DelimitedGroup {
    fn split(text: &str) -> Self {
        let mut scan = DelimiterScan::default();
        let mut close = text.len();
        for (index, ch) in text.char_indices() {
            scan.feed_char(ch);
            if index > 0 && scan.at_top_level() {
                close = index;
                break;
            }
        }
        let inner = text.get(1..close).unwrap_or_default();
        let trailing = text.get(close + 1..).unwrap_or_default();
        Self {
            inner: inner.trim().to_string(),
            trailing: trailing.trim().to_string(),
        }
    }
}

/// Tracks parenthesis nesting across token text, and quote state when built
/// with [`DelimiterScan::quote_aware`]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DelimiterScan {
    depth: i32,
    quotes: bool,
    single: bool,
    double: bool,
    prev: Option<char>,
}

impl DelimiterScan {
    /// Parentheses and commas between `'...'` or `"..."` are not counted. A
    /// quote opens only at the start of a value, so `O'Brien` stays literal.
    pub fn quote_aware() -> Self {
        Self {
            quotes: true,
            ..Self::default()
        }
    }

    pub fn feed(&mut self, text: &str) {
        for ch in text.chars() {
            self.feed_char(ch);
        }
    }

    pub fn feed_char(&mut self, ch: char) {
        match ch {
            '\'' if self.quotes && !self.double && (self.single || self.opens_value()) => {
                self.single = !self.single
            }
            '"' if self.quotes && !self.single && (self.double || self.opens_value()) => {
                self.double = !self.double
            }
            '(' if !self.in_quote() => self.depth += 1,
            ')' if !self.in_quote() => self.depth -= 1,
            _ => {}
        }
        self.prev = Some(ch);
    }

    fn opens_value(&self) -> bool {
        self.prev
            .map_or(true, |prev| prev.is_whitespace() || matches!(prev, '=' | '(' | ','))
    }

    pub fn in_quote(&self) -> bool {
        self.single || self.double
    }

    /// Outside every quote and parenthesis
    pub fn at_top_level(&self) -> bool {
        !self.in_quote() && self.depth <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::lexer::tokenize;

    #[test]
    fn test_expect_keyword() {
        let mut stream = TokenStream::new(tokenize("select *"));
        assert!(stream.expect_keyword("SELECT").is_ok());
        assert_eq!(
            stream.expect_keyword("FROM"),
            Err(ParserError::UnexpectedToken {
                expected: "FROM".to_string(),
                found: "*".to_string(),
                position: 1,
            })
        );
        stream.advance();
        assert_eq!(
            stream.expect_keyword("FROM"),
            Err(ParserError::UnexpectedEnd {
                expected: "FROM".to_string(),
                position: 2,
            })
        );
    }

    #[test]
    fn test_operand_rejects_clause_keyword() {
        let mut stream = TokenStream::new(tokenize("WHERE x"));
        assert!(matches!(
            stream.expect_operand("hexad identifier"),
            Err(ParserError::UnexpectedToken { position: 0, .. })
        ));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_take_until_stops_at_keyword() {
        let mut stream = TokenStream::new(tokenize("DOCUMENT.author = O'Brien LIMIT 5"));
        let taken = stream.take_until(&["ORDER", "LIMIT"]);
        assert_eq!(taken.len(), 3);
        assert!(stream.check_keyword("LIMIT"));

        let mut stream = TokenStream::new(tokenize("title = 'sort order by' LIMIT 3"));
        let taken = stream.take_until(&["ORDER", "LIMIT"]);
        assert_eq!(taken.len(), 3);
        assert!(stream.check_keyword("ORDER"));
    }

    #[test]
    fn test_take_group() {
        let mut stream = TokenStream::new(tokenize("title=Foo bar), VECTOR(x)"));
        let group = stream.take_group("(").unwrap();
        assert_eq!(group.inner, "title=Foo bar");
        assert_eq!(group.trailing, ",");
        assert_eq!(stream.position(), 2);

        let group = stream.take_group("(author=O'Brien)").unwrap();
        assert_eq!(group.inner, "author=O'Brien");
        assert_eq!(group.trailing, "");

        let mut stream = TokenStream::new(tokenize("d'Arc, x=(1)) PROOF"));
        let group = stream.take_group("(name=Jeanne").unwrap();
        assert_eq!(group.inner, "name=Jeanne d'Arc, x=(1)");
        assert_eq!(stream.position(), 2);

        let mut stream = TokenStream::new(tokenize("never closed"));
        assert_eq!(
            stream.take_group("(open"),
            Err(ParserError::UnexpectedEnd {
                expected: "')'".to_string(),
                position: 2,
            })
        );
    }

    #[test]
    fn test_match_leading_comma() {
        let mut stream = TokenStream::new(tokenize(",VECTOR(b=2) , GRAPH(c=3)"));
        assert!(stream.match_leading_comma());
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.peek().map(|t| t.text.as_str()), Some("VECTOR(b=2)"));
        assert_eq!(stream.peek().map(|t| t.offset), Some(1));

        stream.advance();
        assert!(stream.match_leading_comma());
        assert_eq!(stream.position(), 2);
        assert!(!stream.match_leading_comma());
    }

    #[test]
    fn test_delimiter_scan() {
        let mut scan = DelimiterScan::quote_aware();
        scan.feed("DOCUMENT(title='a)b'");
        assert!(!scan.at_top_level());
        scan.feed(")");
        assert!(scan.at_top_level());

        let mut scan = DelimiterScan::quote_aware();
        scan.feed("name=O'Brien, year=(2)");
        assert!(!scan.in_quote());
        assert!(scan.at_top_level());

        let mut scan = DelimiterScan::default();
        scan.feed("(author=O'Brien");
        assert!(!scan.in_quote());
        assert!(!scan.at_top_level());
        scan.feed(")");
        assert!(scan.at_top_level());
    }
}
