// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for VQL

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vql::{Action, ParserConfig, SelectMode};

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// VQL CLI - parser for the federated multi-modal query language
#[derive(Parser)]
#[command(name = "vql")]
#[command(about = "VQL - parse federated multi-modal queries into a typed AST")]
#[command(version)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log filter; `--verbose` wins over `--log-level`
    pub fn level_filter(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            self.log_level
                .map(LogLevel::to_level_filter)
                .unwrap_or(log::LevelFilter::Warn)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Parse one VQL statement and print its AST
    Parse {
        /// The VQL statement to parse
        statement: String,

        /// Entry grammar (parse, parseSlipstream, parseDependentType, parseMutation, parseStatement)
        #[arg(short, long, default_value = "parseStatement")]
        action: Action,

        /// Output format (json, table, vql)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Check referenced modalities against the registry after parsing
        #[arg(long)]
        validate: bool,

        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Interactive VQL console (REPL)
    Repl {
        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Answer JSON-lines requests on stdin with JSON-lines responses on stdout
    Bridge {
        #[command(flatten)]
        parser: ParserArgs,
    },
}

/// Parser configuration flags shared by every parsing command
#[derive(Args, Clone, Debug, Default)]
pub struct ParserArgs {
    /// Reject unrecognized SELECT items instead of dropping them
    #[arg(long)]
    pub strict: bool,

    /// Register an additional modality (repeatable)
    #[arg(short, long = "modality", value_name = "NAME")]
    pub modalities: Vec<String>,

    /// JSON configuration file ({"select_mode": ..., "modalities": [...]})
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ParserArgs {
    /// Configuration file (or defaults) with the command-line flags applied
    pub fn to_config(&self) -> Result<ParserConfig, vql::ConfigError> {
        let mut config = match &self.config {
            Some(path) => ParserConfig::from_path(path)?,
            None => ParserConfig::default(),
        };
        if self.strict {
            config = config.with_select_mode(SelectMode::Strict);
        }
        for name in &self.modalities {
            config = config.with_modality(name)?;
        }
        Ok(config)
    }
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Vql,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "vql" => Ok(OutputFormat::Vql),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
