// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for VQL
//!
//! Provides one-off statement parsing, an interactive console (REPL) and the
//! JSON-lines bridge for embedding the parser in another process.

pub mod commands;
pub mod console;
pub mod output;

pub use commands::{Cli, Commands};
pub use console::{handle_bridge, handle_parse, handle_repl, handle_version};
