// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Modality identifiers and the registry of known modalities
//!
//! Modalities are open identifiers rather than a closed enumeration: the
//! grammar never hard-codes the set. Bare modality names in a SELECT list are
//! recognized through a [`ModalityRegistry`], and membership of every other
//! modality reference is checked by the validator above the parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::config::ConfigError;

/// Canonical names of the modalities every registry starts with
pub const BUILTIN_MODALITIES: [&str; 6] =
    ["Graph", "Vector", "Tensor", "Semantic", "Document", "Temporal"];

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("modality identifier pattern is valid")
});

/// One representation kind of a hexad, stored in canonical capitalized form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modality(String);

impl Modality {
    /// Build a modality from any casing of its name (`GRAPH`, `graph` -> `Graph`)
    pub fn new(name: &str) -> Self {
        let mut chars = name.chars();
        let canonical = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        };
        Modality(canonical)
    }

    /// Build a modality only if `name` is a syntactically valid identifier
    pub fn parse(name: &str) -> Option<Self> {
        if Self::is_identifier(name) {
            Some(Self::new(name))
        } else {
            None
        }
    }

    /// Whether `name` matches `[A-Za-z][A-Za-z0-9_]*`
    pub fn is_identifier(name: &str) -> bool {
        IDENTIFIER.is_match(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn graph() -> Self {
        Modality::new("Graph")
    }

    pub fn vector() -> Self {
        Modality::new("Vector")
    }

    pub fn tensor() -> Self {
        Modality::new("Tensor")
    }

    pub fn semantic() -> Self {
        Modality::new("Semantic")
    }

    pub fn document() -> Self {
        Modality::new("Document")
    }

    pub fn temporal() -> Self {
        Modality::new("Temporal")
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Encoded as `{"TAG": "Graph"}` like every other variant node of the tree.
impl Serialize for Modality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("TAG", &self.0)?;
        map.end()
    }
}

/// Ordered, duplicate-free set of the modalities a deployment knows about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ModalityRegistry {
    modalities: Vec<Modality>,
}

impl ModalityRegistry {
    /// Registry holding only the six built-in modalities
    pub fn builtin() -> Self {
        Self {
            modalities: BUILTIN_MODALITIES.iter().map(|m| Modality::new(m)).collect(),
        }
    }

    /// Registry with no modalities at all
    pub fn empty() -> Self {
        Self {
            modalities: Vec::new(),
        }
    }

    /// Add a modality; returns false if it was already registered
    pub fn register(&mut self, name: &str) -> Result<bool, ConfigError> {
        let modality =
            Modality::parse(name).ok_or_else(|| ConfigError::InvalidModality(name.to_string()))?;
        if self.modalities.contains(&modality) {
            return Ok(false);
        }
        self.modalities.push(modality);
        Ok(true)
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with_modality(mut self, name: &str) -> Result<Self, ConfigError> {
        self.register(name)?;
        Ok(self)
    }

    pub fn contains(&self, modality: &Modality) -> bool {
        self.modalities.contains(modality)
    }

    /// Look up a bare name in any casing
    pub fn resolve(&self, name: &str) -> Option<Modality> {
        self.modalities
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modality> {
        self.modalities.iter()
    }

    pub fn len(&self) -> usize {
        self.modalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modalities.is_empty()
    }
}

impl Default for ModalityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<String>> for ModalityRegistry {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let mut registry = ModalityRegistry::empty();
        for name in &names {
            registry.register(name)?;
        }
        Ok(registry)
    }
}

impl From<ModalityRegistry> for Vec<String> {
    fn from(registry: ModalityRegistry) -> Self {
        registry.modalities.into_iter().map(|m| m.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_casing() {
        assert_eq!(Modality::new("GRAPH").name(), "Graph");
        assert_eq!(Modality::new("vector").name(), "Vector");
        assert_eq!(Modality::new("SpAtIaL").name(), "Spatial");
        assert_eq!(Modality::new("GRAPH"), Modality::graph());
    }

    #[test]
    fn test_identifier_check() {
        assert!(Modality::parse("Provenance").is_some());
        assert!(Modality::parse("geo_2").is_some());
        assert!(Modality::parse("2geo").is_none());
        assert!(Modality::parse("").is_none());
        assert!(Modality::parse("doc-x").is_none());
    }

    #[test]
    fn test_builtin_resolve() {
        let registry = ModalityRegistry::builtin();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.resolve("temporal"), Some(Modality::temporal()));
        assert_eq!(registry.resolve("PROVENANCE"), None);
    }

    #[test]
    fn test_register_extension() {
        let mut registry = ModalityRegistry::builtin();
        assert!(registry.register("PROVENANCE").unwrap());
        assert!(!registry.register("provenance").unwrap());
        assert_eq!(registry.len(), 7);
        assert!(registry.contains(&Modality::new("Provenance")));
        assert!(registry.register("not-valid").is_err());
    }

    #[test]
    fn test_registry_serde() {
        let registry: ModalityRegistry =
            serde_json::from_str(r#"["graph", "SPATIAL"]"#).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            serde_json::to_string(&registry).unwrap(),
            r#"["Graph","Spatial"]"#
        );

        let invalid: Result<ModalityRegistry, _> = serde_json::from_str(r#"["9lives"]"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_modality_json_shape() {
        let json = serde_json::to_value(Modality::document()).unwrap();
        assert_eq!(json, serde_json::json!({"TAG": "Document"}));
    }
}
