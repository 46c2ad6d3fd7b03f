// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Modality membership checks for parsed statements
//!
//! The parser accepts any syntactically valid modality identifier. This layer
//! checks every modality reference against a [`ModalityRegistry`] and reports
//! the first one the deployment does not know, with the clause it came from.

use thiserror::Error;

use super::ast::*;
use super::modality::ModalityRegistry;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown modality '{modality}' in {clause}")]
    UnknownModality {
        modality: String,
        clause: &'static str,
    },
}

/// Validate a statement against the registry
pub fn validate_statement(
    statement: &Statement,
    registry: &ModalityRegistry,
) -> Result<(), ValidationError> {
    match statement {
        Statement::Query(query) => validate_query(query, registry),
        Statement::Mutation(mutation) => validate_mutation(mutation, registry),
    }
}

pub fn validate_query(query: &Query, registry: &ModalityRegistry) -> Result<(), ValidationError> {
    for selected in &query.modalities {
        if let SelectedModality::Modality(modality) = selected {
            check(modality, "SELECT", registry)?;
        }
    }
    for projection in &query.projections {
        check(&projection.modality, "SELECT", registry)?;
    }
    for aggregate in &query.aggregates {
        match aggregate {
            Aggregate::CountAll => {}
            Aggregate::AggregateField { modality, .. } => check(modality, "SELECT", registry)?,
        }
    }
    for projection in &query.group_by {
        check(&projection.modality, "GROUP BY", registry)?;
    }
    for item in &query.order_by {
        check(&item.projection.modality, "ORDER BY", registry)?;
    }
    Ok(())
}

pub fn validate_mutation(
    mutation: &Mutation,
    registry: &ModalityRegistry,
) -> Result<(), ValidationError> {
    match mutation {
        Mutation::Insert { modality_data, .. } => {
            for item in modality_data {
                check(&item.modality, "INSERT", registry)?;
            }
            Ok(())
        }
        Mutation::Update { .. } | Mutation::Delete { .. } => Ok(()),
    }
}

fn check(
    modality: &Modality,
    clause: &'static str,
    registry: &ModalityRegistry,
) -> Result<(), ValidationError> {
    if registry.contains(modality) {
        Ok(())
    } else {
        Err(ValidationError::UnknownModality {
            modality: modality.name().to_string(),
            clause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse_statement;

    #[test]
    fn test_builtin_modalities_pass() {
        let statement = parse_statement(
            "SELECT GRAPH, VECTOR.embedding, AVG(TENSOR.norm) FROM HEXAD h1 GROUP BY DOCUMENT.kind ORDER BY TEMPORAL.at",
        )
        .unwrap();
        assert_eq!(
            validate_statement(&statement, &ModalityRegistry::builtin()),
            Ok(())
        );
    }

    #[test]
    fn test_unknown_modality_reports_clause() {
        let registry = ModalityRegistry::builtin();

        let statement = parse_statement("SELECT * FROM HEXAD h1 ORDER BY SPATIAL.lat").unwrap();
        assert_eq!(
            validate_statement(&statement, &registry),
            Err(ValidationError::UnknownModality {
                modality: "Spatial".to_string(),
                clause: "ORDER BY",
            })
        );

        let statement = parse_statement("INSERT HEXAD WITH PROVENANCE(source=x)").unwrap();
        let error = validate_statement(&statement, &registry).unwrap_err();
        assert_eq!(error.to_string(), "Unknown modality 'Provenance' in INSERT");

        let extended = registry.with_modality("provenance").unwrap();
        assert_eq!(validate_statement(&statement, &extended), Ok(()));
    }

    #[test]
    fn test_wildcard_and_plain_mutations() {
        let registry = ModalityRegistry::empty();
        for input in [
            "SELECT *, COUNT(*) FROM STORE s",
            "UPDATE HEXAD e1 SET a=1",
            "DELETE HEXAD e1",
        ] {
            let statement = parse_statement(input).unwrap();
            assert_eq!(validate_statement(&statement, &registry), Ok(()), "{}", input);
        }
    }
}
