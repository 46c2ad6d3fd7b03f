// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! JSON-lines request/response bridge
//!
//! One request object per input line, one response object per output line:
//!
//! ```text
//! -> {"id": 1, "action": "parseStatement", "query": "DELETE HEXAD entity-7"}
//! <- {"id": 1, "ok": {"TAG": "Mutation", "_0": {...}}}
//! -> {"id": 2, "action": "parse", "query": "SELECT * FROM BOGUS x"}
//! <- {"id": 2, "error": "Unknown source kind 'BOGUS' at position 3. ..."}
//! ```
//!
//! A line that is not a valid request envelope is answered with id 0 and an
//! `Invalid JSON: ...` error. Requests are handled strictly in order and each
//! response is flushed before the next line is read.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

use crate::ast::parser::{Action, ParsedAst, StatementParser};

fn default_action() -> String {
    Action::Query.name().to_string()
}

/// Incoming request envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: u64,
    #[serde(default = "default_action")]
    pub action: String,
    pub query: String,
}

/// Outgoing response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Ok { id: u64, ok: ParsedAst },
    Error { id: u64, error: String },
}

impl Response {
    pub fn id(&self) -> u64 {
        match self {
            Response::Ok { id, .. } | Response::Error { id, .. } => *id,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}

/// Run one decoded request through the parser
pub fn handle_request<P: StatementParser + ?Sized>(parser: &P, request: &Request) -> Response {
    let action = match request.action.parse::<Action>() {
        Ok(action) => action,
        Err(error) => {
            return Response::Error {
                id: request.id,
                error,
            }
        }
    };

    debug!("Bridge request {} ({})", request.id, action);
    match parser.parse_with_action(action, &request.query) {
        Ok(ast) => Response::Ok {
            id: request.id,
            ok: ast,
        },
        Err(error) => Response::Error {
            id: request.id,
            error: error.to_string(),
        },
    }
}

/// Decode one input line and answer it. Blank lines yield no response.
pub fn handle_line<P: StatementParser + ?Sized>(parser: &P, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_request(parser, &request),
        Err(error) => {
            warn!("Rejected bridge line: {}", error);
            Response::Error {
                id: 0,
                error: format!("Invalid JSON: {}", error),
            }
        }
    };
    Some(response)
}

/// Serve requests from `reader` until end of input; returns the number of
/// responses written
pub fn serve<P, R, W>(parser: &P, reader: R, mut writer: W) -> io::Result<usize>
where
    P: StatementParser + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut answered = 0;
    for line in reader.lines() {
        let line = line?;
        let Some(response) = handle_line(parser, &line) else {
            continue;
        };
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        answered += 1;
    }
    debug!("Bridge input closed after {} responses", answered);
    Ok(answered)
}
