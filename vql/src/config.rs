// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parser configuration
//!
//! Provides:
//! - SELECT strictness (lenient drops unrecognized items, strict rejects them)
//! - The modality registry used to recognize bare modality names
//! - JSON loading for deployments that keep the configuration on disk

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::ast::ModalityRegistry;

/// Errors raised while building or loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid modality name '{0}': expected [A-Za-z][A-Za-z0-9_]*")]
    InvalidModality(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// How SELECT treats tokens that are not an aggregate, a `MODALITY.field`
/// projection, `*`, or a registered modality name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// Drop the token and log a warning
    #[default]
    Lenient,
    /// Fail with an unexpected-token error
    Strict,
}

/// Immutable settings shared by every parse a [`Parser`](crate::Parser) runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub select_mode: SelectMode,
    pub modalities: ModalityRegistry,
}

impl ParserConfig {
    /// Built-in modalities, unrecognized SELECT items rejected
    pub fn strict() -> Self {
        Self {
            select_mode: SelectMode::Strict,
            ..Default::default()
        }
    }

    /// Built-in modalities, unrecognized SELECT items dropped
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Register an extra modality (e.g. `Provenance`, `Spatial`)
    pub fn with_modality(mut self, name: &str) -> Result<Self, ConfigError> {
        self.modalities.register(name)?;
        Ok(self)
    }

    pub fn with_select_mode(mut self, select_mode: SelectMode) -> Self {
        self.select_mode = select_mode;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.select_mode == SelectMode::Strict
    }

    /// Parse a JSON document such as
    /// `{"select_mode": "strict", "modalities": ["Graph", "Provenance"]}`
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
