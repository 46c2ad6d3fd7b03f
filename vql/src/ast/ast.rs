// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! AST node definitions for VQL statements
//!
//! Every node is a closed Rust type. Serialization produces a tagged-variant
//! tree: variant nodes carry a `TAG` discriminant with positional `_0`, `_1`
//! fields or named fields, so consumers in any language can rebuild the tree
//! without shared code. Empty lists serialize as `null`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use super::modality::Modality;

/// Serialize an empty list as `null`, a non-empty one as an array
fn null_if_empty<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    if items.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.collect_seq(items)
    }
}

/// Entry of the `modalities` list of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectedModality {
    /// The `*` wildcard marker
    All,
    Modality(Modality),
}

impl Serialize for SelectedModality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SelectedModality::All => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("TAG", "All")?;
                map.end()
            }
            SelectedModality::Modality(modality) => modality.serialize(serializer),
        }
    }
}

impl From<Modality> for SelectedModality {
    fn from(modality: Modality) -> Self {
        SelectedModality::Modality(modality)
    }
}

/// One field inside one modality's representation of a hexad
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Projection {
    pub modality: Modality,
    pub field: String,
}

impl Projection {
    pub fn new(modality: Modality, field: impl Into<String>) -> Self {
        Self {
            modality,
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "TAG")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    /// Case-insensitive lookup of an aggregate function name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(AggregateFunction::Count),
            "SUM" => Some(AggregateFunction::Sum),
            "AVG" => Some(AggregateFunction::Avg),
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "TAG")]
pub enum Aggregate {
    /// `COUNT(*)`
    CountAll,
    AggregateField {
        function: AggregateFunction,
        modality: Modality,
        field: String,
    },
}

/// FROM target of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "TAG")]
pub enum Source {
    /// A single hexad addressed by an opaque identifier
    Hexad {
        #[serde(rename = "_0")]
        id: String,
    },
    /// A named backing store
    Store {
        #[serde(rename = "_0")]
        name: String,
    },
    /// A cross-peer pattern with an optional drift-handling policy
    Federation {
        #[serde(rename = "_0")]
        pattern: String,
        #[serde(rename = "_1")]
        drift_policy: Option<String>,
    },
}

/// WHERE/HAVING body, kept as the raw token span for the execution engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "TAG")]
pub enum Condition {
    Raw {
        #[serde(rename = "_0")]
        text: String,
    },
}

impl Condition {
    pub fn raw(text: impl Into<String>) -> Self {
        Condition::Raw { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Condition::Raw { text } => text,
        }
    }
}

/// A proof obligation: the proof type and the contract it is checked against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofSpec {
    pub proof_type: String,
    pub contract_name: String,
}

impl ProofSpec {
    pub fn new(proof_type: impl Into<String>, contract_name: impl Into<String>) -> Self {
        Self {
            proof_type: proof_type.into(),
            contract_name: contract_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "TAG")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrderItem {
    #[serde(rename = "field")]
    pub projection: Projection,
    pub direction: Direction,
}

/// Root node of a read query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Every modality referenced in SELECT, first-seen order, no duplicates
    pub modalities: Vec<SelectedModality>,
    #[serde(serialize_with = "null_if_empty")]
    pub projections: Vec<Projection>,
    #[serde(serialize_with = "null_if_empty")]
    pub aggregates: Vec<Aggregate>,
    pub source: Source,
    #[serde(rename = "where")]
    pub where_clause: Option<Condition>,
    #[serde(serialize_with = "null_if_empty")]
    pub group_by: Vec<Projection>,
    pub having: Option<Condition>,
    /// Proof obligations in chain order
    #[serde(serialize_with = "null_if_empty")]
    pub proof: Vec<ProofSpec>,
    #[serde(serialize_with = "null_if_empty")]
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    /// A query over `source` with every optional clause absent
    pub fn new(source: Source) -> Self {
        Self {
            modalities: Vec::new(),
            projections: Vec::new(),
            aggregates: Vec::new(),
            source,
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            proof: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// Raw payload for one modality of an INSERT
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModalityPayload {
    pub modality: Modality,
    pub payload: String,
}

/// `field=value` pair of an UPDATE
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Assignment {
    pub field: String,
    pub value: String,
}

/// Root node of a write statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "TAG")]
pub enum Mutation {
    Insert {
        #[serde(rename = "modalityData")]
        modality_data: Vec<ModalityPayload>,
        #[serde(serialize_with = "null_if_empty")]
        proof: Vec<ProofSpec>,
    },
    Update {
        #[serde(rename = "hexadId")]
        hexad_id: String,
        assignments: Vec<Assignment>,
        #[serde(serialize_with = "null_if_empty")]
        proof: Vec<ProofSpec>,
    },
    Delete {
        #[serde(rename = "hexadId")]
        hexad_id: String,
        #[serde(serialize_with = "null_if_empty")]
        proof: Vec<ProofSpec>,
    },
}

impl Mutation {
    pub fn proof(&self) -> &[ProofSpec] {
        match self {
            Mutation::Insert { proof, .. }
            | Mutation::Update { proof, .. }
            | Mutation::Delete { proof, .. } => proof,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Mutation::Insert { .. } => "INSERT",
            Mutation::Update { .. } => "UPDATE",
            Mutation::Delete { .. } => "DELETE",
        }
    }
}

/// Outer envelope returned by statement-level parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Query(Query),
    Mutation(Mutation),
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Query(_) => "query",
            Statement::Mutation(_) => "mutation",
        }
    }
}

// `{"TAG": "Query", "_0": {...}}`
impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Statement::Query(query) => {
                map.serialize_entry("TAG", "Query")?;
                map.serialize_entry("_0", query)?;
            }
            Statement::Mutation(mutation) => {
                map.serialize_entry("TAG", "Mutation")?;
                map.serialize_entry("_0", mutation)?;
            }
        }
        map.end()
    }
}
