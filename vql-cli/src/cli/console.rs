// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for VQL

use colored::Colorize;
use log::info;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::io;
use std::path::Path;
use vql::{validate_statement, Action, ParsedAst, Parser, StatementParser};

use super::commands::{OutputFormat, ParserArgs};
use super::output::AstFormatter;

const HISTORY_PATH: &str = ".vql/.vql_history.txt";

/// Handle the parse command (one-off statement)
pub fn handle_parse(
    statement: String,
    action: Action,
    format: OutputFormat,
    validate: bool,
    args: &ParserArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config()?;
    let parser = Parser::new(config);

    let ast = parser.parse_with_action(action, &statement)?;

    if validate {
        check_modalities(&parser, &ast)?;
    }

    println!("{}", AstFormatter::format(&ast, format));
    Ok(())
}

/// Handle the bridge command: JSON-lines over stdin/stdout until EOF
pub fn handle_bridge(args: &ParserArgs) -> Result<(), Box<dyn std::error::Error>> {
    let parser = Parser::new(args.to_config()?);
    let stdin = io::stdin();
    let stdout = io::stdout();

    let answered = vql::bridge::serve(&parser, stdin.lock(), stdout.lock())?;
    info!("Bridge answered {} requests", answered);
    Ok(())
}

/// Handle the repl command
pub fn handle_repl(args: &ParserArgs) -> Result<(), Box<dyn std::error::Error>> {
    let parser = Parser::new(args.to_config()?);
    let mut action = Action::Statement;
    let mut format = OutputFormat::Table;

    println!("{}", "VQL".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!("Multi-line statements supported - use ';' to terminate");
    if parser.config().is_strict() {
        println!("{}", "Strict SELECT mode".cyan());
    }

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    if let Some(parent) = Path::new(HISTORY_PATH).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.load_history(HISTORY_PATH);

    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() {
            format!("{}> ", "vql".cyan())
        } else {
            format!("{}> ", "...".cyan())
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if !buffer.is_empty() {
                    buffer.clear();
                    println!("{}", "\nStatement buffer cleared".yellow());
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();

        if buffer.is_empty() {
            let lowered = trimmed.to_lowercase();
            let mut words = lowered.split_whitespace();
            match (words.next(), words.next()) {
                (Some("exit" | "quit"), None) => {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                (Some("help"), None) => {
                    print_help();
                    continue;
                }
                (Some("clear"), None) => {
                    print!("\x1B[2J\x1B[1;1H");
                    std::io::Write::flush(&mut std::io::stdout())?;
                    continue;
                }
                (Some("action"), Some(name)) => {
                    match name.parse::<Action>() {
                        Ok(selected) => {
                            action = selected;
                            println!("{}", format!("Action set to {}", action).green());
                        }
                        Err(e) => eprintln!("{}", e.red()),
                    }
                    continue;
                }
                (Some("format"), Some(name)) => {
                    match name.parse::<OutputFormat>() {
                        Ok(selected) => {
                            format = selected;
                            println!("{}", format!("Output format set to {}", name).green());
                        }
                        Err(e) => eprintln!("{}", e.red()),
                    }
                    continue;
                }
                (None, _) => continue,
                _ => {}
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');

        if trimmed.ends_with(';') {
            let statement = buffer.trim().trim_end_matches(';').trim().to_string();
            rl.add_history_entry(format!("{};", statement))?;

            match parser.parse_with_action(action, &statement) {
                Ok(ast) => {
                    if let Err(e) = check_modalities(&parser, &ast) {
                        println!("{}", format!("Warning: {}", e).yellow());
                    }
                    println!("{}", AstFormatter::format(&ast, format));
                }
                Err(e) => eprintln!("{}", format!("Parse error: {}", e).red()),
            }

            buffer.clear();
        }
    }

    let _ = rl.save_history(HISTORY_PATH);

    Ok(())
}

/// Handle the version command
pub fn handle_version() {
    println!("{} {}", "vql".bold().green(), env!("CARGO_PKG_VERSION"));
    println!("Built-in modalities: {}", vql::ast::BUILTIN_MODALITIES.join(", "));
    let actions: Vec<&str> = Action::ALL.iter().map(Action::name).collect();
    println!("Actions: {}", actions.join(", "));
}

fn check_modalities(parser: &Parser, ast: &ParsedAst) -> Result<(), vql::ValidationError> {
    validate_statement(&ast.clone().into_statement(), &parser.config().modalities)
}

fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the VQL console", "exit/quit".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!(
        "  {}  - Switch entry grammar (parse, parseSlipstream, parseDependentType, parseMutation, parseStatement)",
        "action <name>".cyan()
    );
    println!("  {}  - Switch output format (table, json, vql)", "format <name>".cyan());
    println!("\n{}", "Statement syntax:".bold().green());
    println!("  Multi-line statements are supported");
    println!("  Terminate statements with semicolon (;)");
    println!("\n{}", "VQL examples:".bold().green());
    println!("  {}", "SELECT GRAPH, VECTOR.embedding FROM HEXAD entity-42;".yellow());
    println!(
        "  {}",
        "SELECT COUNT(*) FROM STORE papers GROUP BY DOCUMENT.category;".yellow()
    );
    println!(
        "  {}",
        "INSERT HEXAD WITH DOCUMENT(title=Foo) PROOF TYPE_SCHEMA (schemaV1);".yellow()
    );
    println!("  {}", "DELETE HEXAD entity-7;".yellow());
}
