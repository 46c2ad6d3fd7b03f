// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lexer for VQL
//!
//! Splits statement text on runs of whitespace. Punctuation stays attached to
//! the word it touches (`COUNT(*)`, `GRAPH,`, `(contract)`); the clause parsers
//! strip `,`, `(` and `)` themselves.

use std::fmt;

/// A span of non-whitespace text from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Index of the token in the token sequence
    pub position: usize,
    /// Byte offset of the first character in the source text
    pub offset: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, position: usize, offset: usize) -> Self {
        Self {
            text: text.into(),
            position,
            offset,
        }
    }

    /// Case-insensitive keyword comparison
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| self.is_keyword(kw))
    }

    pub fn upper(&self) -> String {
        self.text.to_ascii_uppercase()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Tokenize a statement. Never fails; blank input yields no tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (offset, ch) in input.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                tokens.push(Token::new(&input[begin..offset], tokens.len(), begin));
            }
        } else if start.is_none() {
            start = Some(offset);
        }
    }

    if let Some(begin) = start {
        tokens.push(Token::new(&input[begin..], tokens.len(), begin));
    }

    tokens
}
