// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Canonical VQL rendering of the AST
//!
//! Keywords are upper-case, modalities are rendered as upper-case names and
//! tokens are separated by single spaces. Parsing the rendering with the same
//! modality registry yields an equal AST. A SELECT list emptied by lenient
//! parsing renders as nothing and does not reparse.

use log::{debug, log_enabled, Level};
use std::fmt::{self, Display, Formatter};

use super::ast::*;

/// Log the canonical rendering of a freshly parsed AST at debug level
pub fn pretty_print_ast<T: Display + ?Sized>(ast: &T) {
    if log_enabled!(Level::Debug) {
        debug!("AST: {}", ast);
    }
}

pub fn render_statement(statement: &Statement) -> String {
    statement.to_string()
}

pub fn render_query(query: &Query) -> String {
    query.to_string()
}

pub fn render_mutation(mutation: &Mutation) -> String {
    mutation.to_string()
}

fn modality_keyword(modality: &Modality) -> String {
    modality.name().to_ascii_uppercase()
}

/// Write `items` separated by `", "`
fn write_list<T>(
    f: &mut Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

fn write_proof(f: &mut Formatter<'_>, proof: &[ProofSpec]) -> fmt::Result {
    if proof.is_empty() {
        return Ok(());
    }
    f.write_str(" PROOF ")?;
    for (index, spec) in proof.iter().enumerate() {
        if index > 0 {
            f.write_str(" AND ")?;
        }
        write!(f, "{}", spec)?;
    }
    Ok(())
}

impl Display for SelectedModality {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SelectedModality::All => f.write_str("*"),
            SelectedModality::Modality(modality) => f.write_str(&modality_keyword(modality)),
        }
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", modality_keyword(&self.modality), self.field)
    }
}

impl Display for Aggregate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::CountAll => f.write_str("COUNT(*)"),
            Aggregate::AggregateField {
                function,
                modality,
                field,
            } => write!(
                f,
                "{}({}.{})",
                function.keyword(),
                modality_keyword(modality),
                field
            ),
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Source::Hexad { id } => write!(f, "HEXAD {}", id),
            Source::Store { name } => write!(f, "STORE {}", name),
            Source::Federation {
                pattern,
                drift_policy,
            } => {
                write!(f, "FEDERATION {}", pattern)?;
                if let Some(policy) = drift_policy {
                    write!(f, " WITH DRIFT {}", policy)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for ProofSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.proof_type, self.contract_name)
    }
}

impl Display for OrderItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.projection, self.direction.keyword())
    }
}

fn aggregate_modality(aggregate: &Aggregate) -> Option<&Modality> {
    match aggregate {
        Aggregate::CountAll => None,
        Aggregate::AggregateField { modality, .. } => Some(modality),
    }
}

/// SELECT items in an order that registers `modalities` the same way when
/// reparsed. A modality first named by a projection or aggregate is written
/// only there, never again as a bare name.
fn select_items(query: &Query) -> Vec<String> {
    let projections = &query.projections;
    let aggregates = &query.aggregates;
    let (mut p, mut a) = (0, 0);
    let mut items = Vec::new();

    for (index, selected) in query.modalities.iter().enumerate() {
        let mut introduced = false;
        if let SelectedModality::Modality(modality) = selected {
            if projections.get(p).is_some_and(|item| &item.modality == modality) {
                items.push(projections[p].to_string());
                p += 1;
                introduced = true;
            } else if let Some(offset) = aggregates[a..]
                .iter()
                .position(|item| aggregate_modality(item).is_some())
            {
                // COUNT(*) entries ahead of the introducing aggregate keep their place
                if aggregate_modality(&aggregates[a + offset]) == Some(modality) {
                    items.extend(aggregates[a..=a + offset].iter().map(ToString::to_string));
                    a += offset + 1;
                    introduced = true;
                }
            }
        }
        if !introduced {
            items.push(selected.to_string());
        }

        let seen = &query.modalities[..=index];
        let is_seen = |modality: &Modality| {
            seen.iter()
                .any(|entry| matches!(entry, SelectedModality::Modality(m) if m == modality))
        };
        while let Some(item) = projections.get(p).filter(|item| is_seen(&item.modality)) {
            items.push(item.to_string());
            p += 1;
        }
        while let Some(item) = aggregates
            .get(a)
            .filter(|item| aggregate_modality(item).map_or(true, |m| is_seen(m)))
        {
            items.push(item.to_string());
            a += 1;
        }
    }

    items.extend(projections[p..].iter().map(ToString::to_string));
    items.extend(aggregates[a..].iter().map(ToString::to_string));
    items
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {}", select_items(self).join(", "))?;

        write!(f, " FROM {}", self.source)?;

        if let Some(condition) = &self.where_clause {
            write!(f, " WHERE {}", condition.text())?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            write_list(f, &self.group_by, |f, item| write!(f, "{}", item))?;
        }
        if let Some(condition) = &self.having {
            write!(f, " HAVING {}", condition.text())?;
        }
        write_proof(f, &self.proof)?;
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            write_list(f, &self.order_by, |f, item| write!(f, "{}", item))?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

impl Display for Mutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Insert {
                modality_data,
                proof,
            } => {
                f.write_str("INSERT HEXAD WITH ")?;
                write_list(f, modality_data, |f, item| {
                    write!(f, "{}({})", modality_keyword(&item.modality), item.payload)
                })?;
                write_proof(f, proof)
            }
            Mutation::Update {
                hexad_id,
                assignments,
                proof,
            } => {
                write!(f, "UPDATE HEXAD {} SET ", hexad_id)?;
                write_list(f, assignments, |f, item| {
                    write!(f, "{}={}", item.field, item.value)
                })?;
                write_proof(f, proof)
            }
            Mutation::Delete { hexad_id, proof } => {
                write!(f, "DELETE HEXAD {}", hexad_id)?;
                write_proof(f, proof)
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Query(query) => query.fmt(f),
            Statement::Mutation(mutation) => mutation.fmt(f),
        }
    }
}
