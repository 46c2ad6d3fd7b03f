// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! AST formatting for the CLI

use comfy_table::{ContentArrangement, Table};
use vql::ast::pretty_printer::render_statement;
use vql::{Mutation, ParsedAst, Query, Statement};

use super::commands::OutputFormat;

pub struct AstFormatter;

impl AstFormatter {
    pub fn format(ast: &ParsedAst, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(ast).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
            }
            OutputFormat::Table => Self::format_table(ast),
            OutputFormat::Vql => render_statement(&ast.clone().into_statement()),
        }
    }

    fn format_table(ast: &ParsedAst) -> String {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Clause", "Value"]);

        let rows = match ast {
            ParsedAst::Query(query) | ParsedAst::Statement(Statement::Query(query)) => {
                query_rows(query)
            }
            ParsedAst::Mutation(mutation) | ParsedAst::Statement(Statement::Mutation(mutation)) => {
                mutation_rows(mutation)
            }
        };
        for (clause, value) in rows {
            table.add_row(vec![clause.to_string(), value]);
        }
        table.to_string()
    }
}

fn join<T: ToString>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

fn query_rows(query: &Query) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Statement", "QUERY".to_string()),
        ("Modalities", join(&query.modalities, ", ")),
    ];
    if !query.projections.is_empty() {
        rows.push(("Projections", join(&query.projections, ", ")));
    }
    if !query.aggregates.is_empty() {
        rows.push(("Aggregates", join(&query.aggregates, ", ")));
    }
    rows.push(("Source", query.source.to_string()));
    if let Some(condition) = &query.where_clause {
        rows.push(("Where", condition.text().to_string()));
    }
    if !query.group_by.is_empty() {
        rows.push(("Group By", join(&query.group_by, ", ")));
    }
    if let Some(condition) = &query.having {
        rows.push(("Having", condition.text().to_string()));
    }
    if !query.proof.is_empty() {
        rows.push(("Proof", join(&query.proof, " AND ")));
    }
    if !query.order_by.is_empty() {
        rows.push(("Order By", join(&query.order_by, ", ")));
    }
    if let Some(limit) = query.limit {
        rows.push(("Limit", limit.to_string()));
    }
    if let Some(offset) = query.offset {
        rows.push(("Offset", offset.to_string()));
    }
    rows
}

fn mutation_rows(mutation: &Mutation) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Statement", mutation.keyword().to_string())];
    match mutation {
        Mutation::Insert { modality_data, .. } => {
            for item in modality_data {
                rows.push(("Payload", format!("{}: {}", item.modality, item.payload)));
            }
        }
        Mutation::Update {
            hexad_id,
            assignments,
            ..
        } => {
            rows.push(("Hexad", hexad_id.clone()));
            for item in assignments {
                rows.push(("Set", format!("{} = {}", item.field, item.value)));
            }
        }
        Mutation::Delete { hexad_id, .. } => rows.push(("Hexad", hexad_id.clone())),
    }
    if !mutation.proof().is_empty() {
        rows.push(("Proof", join(mutation.proof(), " AND ")));
    }
    rows
}
