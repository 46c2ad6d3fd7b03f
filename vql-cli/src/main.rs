// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! VQL command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{handle_bridge, handle_parse, handle_repl, handle_version, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so bridge responses on stdout stay clean
    env_logger::Builder::new()
        .filter_level(cli.level_filter())
        .init();

    let result = match cli.command {
        Commands::Version => {
            handle_version();
            Ok(())
        }
        Commands::Parse {
            statement,
            action,
            format,
            validate,
            parser,
        } => handle_parse(statement, action, format, validate, &parser),
        Commands::Repl { parser } => handle_repl(&parser),
        Commands::Bridge { parser } => handle_bridge(&parser),
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
