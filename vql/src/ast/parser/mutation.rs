// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Mutation grammar
//!
//! INSERT HEXAD WITH MODALITY(payload)[, MODALITY(payload)...] [PROOF chain]
//! UPDATE HEXAD id SET field=value[, field=value...] [PROOF chain]
//! DELETE HEXAD id [PROOF chain]

use log::trace;

use super::fragments;
use super::proof::ProofRequirement;
use super::stream::DelimiterScan;
use super::{ClauseParser, ParserError};
use crate::ast::lexer::Token;
use crate::ast::{Assignment, Modality, ModalityPayload, Mutation};

/// First keywords routed to the mutation grammar
pub(crate) const MUTATION_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE"];

impl<'a> ClauseParser<'a> {
    pub(super) fn mutation(&mut self) -> Result<Mutation, ParserError> {
        let keyword = self.stream.expect_token("INSERT, UPDATE or DELETE")?;
        let mutation = match keyword.upper().as_str() {
            "INSERT" => self.insert()?,
            "UPDATE" => self.update()?,
            "DELETE" => self.delete()?,
            _ => {
                return Err(ParserError::UnknownStatementKind {
                    token: keyword.text,
                    position: keyword.position,
                })
            }
        };
        self.stream.expect_end("end of statement")?;
        Ok(mutation)
    }

    fn insert(&mut self) -> Result<Mutation, ParserError> {
        self.stream.expect_keyword("HEXAD")?;
        self.stream.expect_keyword("WITH")?;

        let mut modality_data = Vec::new();
        loop {
            let (payload, trailing) = self.modality_payload()?;
            modality_data.push(payload);

            let separated = match trailing {
                Some(trailing) if trailing == "," => true,
                Some(trailing) => {
                    return Err(ParserError::UnexpectedToken {
                        expected: "',' or PROOF".to_string(),
                        found: trailing,
                        position: self.stream.position().saturating_sub(1),
                    })
                }
                None => self.stream.match_leading_comma(),
            };
            if !separated {
                break;
            }
        }

        if let Some(token) = self.stream.peek() {
            if !token.is_keyword("PROOF") {
                return Err(ParserError::unexpected("',' or PROOF", token));
            }
        }
        let proof = self.proof_clause(ProofRequirement::Optional)?;

        trace!("INSERT with {} modality payloads", modality_data.len());
        Ok(Mutation::Insert {
            modality_data,
            proof,
        })
    }

    /// `DOCUMENT(title=Foo)` or `DOCUMENT (title=Foo)`; returns the payload and
    /// any text that followed the closing parenthesis
    fn modality_payload(&mut self) -> Result<(ModalityPayload, Option<String>), ParserError> {
        let head = self.stream.expect_operand("MODALITY(payload)")?;
        let (name, group_head) = match head.text.find('(') {
            Some(open) => (head.text[..open].to_string(), head.text[open..].to_string()),
            None => {
                let open = self.stream.expect_token("(payload)")?;
                if !open.text.starts_with('(') {
                    return Err(ParserError::unexpected("(payload)", &open));
                }
                (head.text.clone(), open.text)
            }
        };
        if !Modality::is_identifier(&name) {
            return Err(ParserError::unexpected("modality name", &head));
        }

        let group = self.stream.take_group(&group_head)?;
        let payload = ModalityPayload {
            modality: Modality::new(&name),
            payload: group.inner,
        };
        let trailing = Some(group.trailing).filter(|t| !t.is_empty());
        Ok((payload, trailing))
    }

    fn update(&mut self) -> Result<Mutation, ParserError> {
        self.stream.expect_keyword("HEXAD")?;
        let hexad_id = self.stream.expect_operand("hexad identifier")?.text;
        self.stream.expect_keyword("SET")?;

        let tokens = self.stream.take_until(&["PROOF"]);
        if tokens.is_empty() {
            return Err(match self.stream.peek() {
                Some(token) => ParserError::unexpected("field=value", token),
                None => self.stream.unexpected_end("field=value"),
            });
        }

        let mut assignments = Vec::new();
        for piece in assignment_pieces(&tokens) {
            let (field, value) = fragments::field_assignment(&piece.text)
                .filter(|(_, value)| !value.is_empty())
                .ok_or_else(|| ParserError::UnexpectedToken {
                    expected: "field=value".to_string(),
                    found: piece.text.clone(),
                    position: piece.position,
                })?;
            assignments.push(Assignment { field, value });
        }

        let proof = self.proof_clause(ProofRequirement::Optional)?;
        trace!("UPDATE {} with {} assignments", hexad_id, assignments.len());
        Ok(Mutation::Update {
            hexad_id,
            assignments,
            proof,
        })
    }

    fn delete(&mut self) -> Result<Mutation, ParserError> {
        self.stream.expect_keyword("HEXAD")?;
        let hexad_id = self.stream.expect_operand("hexad identifier")?.text;
        let proof = self.proof_clause(ProofRequirement::Optional)?;
        Ok(Mutation::Delete { hexad_id, proof })
    }
}

/// Text of one `field=value` assignment and the token it starts at
#[derive(Debug, Clone, PartialEq, Eq)]
struct AssignmentPiece {
    text: String,
    position: usize,
}

/// Split the SET span at commas outside quotes and parentheses. A quote
/// that is never closed is literal text and the span is split again at every
/// comma outside parentheses.
fn assignment_pieces(tokens: &[Token]) -> Vec<AssignmentPiece> {
    let (pieces, scan) = split_assignments(tokens, DelimiterScan::quote_aware());
    if scan.in_quote() {
        trace!("Unclosed quote in SET span; splitting without quotes");
        return split_assignments(tokens, DelimiterScan::default()).0;
    }
    pieces
}

fn split_assignments(
    tokens: &[Token],
    mut scan: DelimiterScan,
) -> (Vec<AssignmentPiece>, DelimiterScan) {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut start: Option<usize> = None;

    for token in tokens {
        if start.is_some() {
            current.push(' ');
        }
        scan.feed_char(' ');
        for ch in token.text.chars() {
            if ch == ',' && scan.at_top_level() {
                scan.feed_char(ch);
                if let Some(position) = start.take() {
                    pieces.push(AssignmentPiece {
                        text: current.trim().to_string(),
                        position,
                    });
                }
                current.clear();
                continue;
            }
            scan.feed_char(ch);
            start.get_or_insert(token.position);
            current.push(ch);
        }
    }

    if let Some(position) = start {
        pieces.push(AssignmentPiece {
            text: current.trim().to_string(),
            position,
        });
    }
    (pieces, scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::lexer::tokenize;
    use crate::ast::parser::{parse_mutation, parse_statement};
    use crate::ast::{ProofSpec, Statement};

    #[test]
    fn test_insert_with_proof() {
        let mutation = parse_mutation(
            "INSERT HEXAD WITH DOCUMENT(title=Foo) PROOF TYPE_SCHEMA (schemaV1)",
        )
        .unwrap();
        assert_eq!(
            mutation,
            Mutation::Insert {
                modality_data: vec![ModalityPayload {
                    modality: Modality::document(),
                    payload: "title=Foo".to_string(),
                }],
                proof: vec![ProofSpec::new("TYPE_SCHEMA", "schemaV1")],
            }
        );
    }

    #[test]
    fn test_insert_multiple_payloads() {
        let mutation = parse_mutation(
            "insert hexad with DOCUMENT(title=Foo bar, year=2024), VECTOR (embedding=[0.1, 0.2]) , GRAPH(edges=())",
        )
        .unwrap();
        let Mutation::Insert {
            modality_data,
            proof,
        } = mutation
        else {
            panic!("expected INSERT");
        };
        assert!(proof.is_empty());
        assert_eq!(
            modality_data,
            vec![
                ModalityPayload {
                    modality: Modality::document(),
                    payload: "title=Foo bar, year=2024".to_string(),
                },
                ModalityPayload {
                    modality: Modality::vector(),
                    payload: "embedding=[0.1, 0.2]".to_string(),
                },
                ModalityPayload {
                    modality: Modality::graph(),
                    payload: "edges=()".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_insert_requires_separator() {
        assert_eq!(
            parse_mutation("INSERT HEXAD WITH DOCUMENT(a=1) VECTOR(b=2)"),
            Err(ParserError::UnexpectedToken {
                expected: "',' or PROOF".to_string(),
                found: "VECTOR(b=2)".to_string(),
                position: 4,
            })
        );
        assert!(matches!(
            parse_mutation("INSERT HEXAD WITH DOCUMENT(title=Foo"),
            Err(ParserError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_mutation("INSERT HEXAD WITH DOCUMENT title"),
            Err(ParserError::UnexpectedToken { position: 4, .. })
        ));
        assert!(matches!(
            parse_mutation("INSERT HEXAD WITH DOCUMENT(a=1),"),
            Err(ParserError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_update_assignments() {
        let mutation = parse_mutation(
            "UPDATE HEXAD entity-9 SET title = 'Hello, world', year=2025 PROOF AUDIT (editorPolicy)",
        )
        .unwrap();
        assert_eq!(
            mutation,
            Mutation::Update {
                hexad_id: "entity-9".to_string(),
                assignments: vec![
                    Assignment {
                        field: "title".to_string(),
                        value: "'Hello, world'".to_string(),
                    },
                    Assignment {
                        field: "year".to_string(),
                        value: "2025".to_string(),
                    },
                ],
                proof: vec![ProofSpec::new("AUDIT", "editorPolicy")],
            }
        );
    }

    #[test]
    fn test_update_malformed_assignments() {
        assert_eq!(
            parse_mutation("UPDATE HEXAD e1 SET title"),
            Err(ParserError::UnexpectedToken {
                expected: "field=value".to_string(),
                found: "title".to_string(),
                position: 4,
            })
        );
        assert!(matches!(
            parse_mutation("UPDATE HEXAD e1 SET title="),
            Err(ParserError::UnexpectedToken { .. })
        ));
        assert_eq!(
            parse_mutation("UPDATE HEXAD e1 SET"),
            Err(ParserError::UnexpectedEnd {
                expected: "field=value".to_string(),
                position: 4,
            })
        );
        assert!(matches!(
            parse_mutation("UPDATE HEXAD e1 SET PROOF A (c)"),
            Err(ParserError::UnexpectedToken { position: 4, .. })
        ));
    }

    #[test]
    fn test_apostrophes_are_literal() {
        assert_eq!(
            parse_mutation("UPDATE HEXAD e1 SET name=O'Brien PROOF AUDIT (editors)"),
            Ok(Mutation::Update {
                hexad_id: "e1".to_string(),
                assignments: vec![Assignment {
                    field: "name".to_string(),
                    value: "O'Brien".to_string(),
                }],
                proof: vec![ProofSpec::new("AUDIT", "editors")],
            })
        );

        let Ok(Mutation::Update { assignments, .. }) =
            parse_mutation("UPDATE HEXAD e1 SET note='unclosed, year=2025")
        else {
            panic!("expected UPDATE");
        };
        assert_eq!(
            assignments,
            vec![
                Assignment {
                    field: "note".to_string(),
                    value: "'unclosed".to_string(),
                },
                Assignment {
                    field: "year".to_string(),
                    value: "2025".to_string(),
                },
            ]
        );

        assert_eq!(
            parse_mutation("INSERT HEXAD WITH DOCUMENT(author=O'Brien) PROOF TYPE_SCHEMA (v1)"),
            Ok(Mutation::Insert {
                modality_data: vec![ModalityPayload {
                    modality: Modality::document(),
                    payload: "author=O'Brien".to_string(),
                }],
                proof: vec![ProofSpec::new("TYPE_SCHEMA", "v1")],
            })
        );
    }

    #[test]
    fn test_insert_comma_on_next_payload() {
        let Ok(Mutation::Insert { modality_data, .. }) =
            parse_mutation("INSERT HEXAD WITH DOCUMENT(a=1) ,VECTOR(b=2) , GRAPH (c=3)")
        else {
            panic!("expected INSERT");
        };
        let modalities: Vec<Modality> = modality_data
            .into_iter()
            .map(|item| item.modality)
            .collect();
        assert_eq!(
            modalities,
            vec![Modality::document(), Modality::vector(), Modality::graph()]
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            parse_mutation("DELETE HEXAD entity-7"),
            Ok(Mutation::Delete {
                hexad_id: "entity-7".to_string(),
                proof: Vec::new(),
            })
        );
        assert!(matches!(
            parse_mutation("DELETE HEXAD"),
            Err(ParserError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_mutation("DELETE HEXAD e1 extra"),
            Err(ParserError::UnexpectedToken { position: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_statement_kind() {
        assert_eq!(
            parse_mutation("UPSERT HEXAD e1"),
            Err(ParserError::UnknownStatementKind {
                token: "UPSERT".to_string(),
                position: 0,
            })
        );
        // statement dispatch sends unknown leading keywords to the query grammar
        assert!(matches!(
            parse_statement("UPSERT HEXAD e1"),
            Err(ParserError::UnexpectedToken { position: 0, .. })
        ));
        assert!(matches!(
            parse_statement("delete HEXAD e1"),
            Ok(Statement::Mutation(Mutation::Delete { .. }))
        ));
    }

    #[test]
    fn test_assignment_pieces() {
        let tokens = tokenize("a=f(1, 2), b = \"x, y\",c=3");
        let pieces: Vec<(String, usize)> = assignment_pieces(&tokens)
            .into_iter()
            .map(|piece| (piece.text, piece.position))
            .collect();
        assert_eq!(
            pieces,
            vec![
                ("a=f(1, 2)".to_string(), 0),
                ("b = \"x, y\"".to_string(), 2),
                ("c=3".to_string(), 5),
            ]
        );
    }
}
