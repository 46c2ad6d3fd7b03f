// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! AST subsystem: lexer, parser, AST nodes, rendering and modality validation for VQL

#[allow(clippy::module_inception)]
pub mod ast;
pub mod lexer;
pub mod modality;
pub mod parser;
pub mod pretty_printer;
pub mod validator;

pub use ast::*;
pub use modality::{ModalityRegistry, BUILTIN_MODALITIES};
