// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! PROOF chain grammar, shared by queries and mutations
//!
//! PROOF proofType (contractName) [AND proofType (contractName)]...

use log::trace;

use super::stream::CLAUSE_KEYWORDS;
use super::{ClauseParser, ParserError};
use crate::ast::ProofSpec;

/// Whether the entry grammar allows, demands or rejects a PROOF clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProofRequirement {
    Optional,
    Required,
    Forbidden,
}

impl<'a> ClauseParser<'a> {
    /// Parse an optional PROOF clause at the current position
    pub(super) fn proof_clause(
        &mut self,
        requirement: ProofRequirement,
    ) -> Result<Vec<ProofSpec>, ParserError> {
        let position = self.stream.position();
        if !self.stream.match_keyword("PROOF") {
            return match requirement {
                ProofRequirement::Required => Err(ParserError::MissingProofClause { position }),
                _ => Ok(Vec::new()),
            };
        }
        if requirement == ProofRequirement::Forbidden {
            return Err(ParserError::UnexpectedProofClause { position });
        }

        let mut chain = vec![self.proof_spec()?];
        while self.stream.check_keyword("AND") {
            let and_position = self.stream.position();
            self.stream.advance();
            if self.stream.is_eof() || self.stream.check_any_keyword(CLAUSE_KEYWORDS) {
                return Err(ParserError::DanglingProofChain {
                    position: and_position,
                });
            }
            chain.push(self.proof_spec()?);
        }

        trace!("PROOF chain: {:?}", chain);
        Ok(chain)
    }

    /// `TYPE (contract)`, `TYPE(contract)` or `TYPE ( contract )`
    fn proof_spec(&mut self) -> Result<ProofSpec, ParserError> {
        let head = self.stream.expect_operand("proof type")?;
        let (proof_type, group_head, position) = match head.text.find('(') {
            Some(0) => return Err(ParserError::unexpected("proof type", &head)),
            Some(open) => (
                head.text[..open].to_string(),
                head.text[open..].to_string(),
                head.position,
            ),
            None => {
                let open = self.stream.expect_token("(contract name)")?;
                if !open.text.starts_with('(') {
                    return Err(ParserError::unexpected("(contract name)", &open));
                }
                (head.text, open.text, open.position)
            }
        };

        let group = self.stream.take_group(&group_head)?;
        if group.inner.is_empty() {
            return Err(ParserError::UnexpectedToken {
                expected: "contract name".to_string(),
                found: "()".to_string(),
                position,
            });
        }
        if !group.trailing.is_empty() {
            return Err(ParserError::UnexpectedToken {
                expected: "AND or end of proof chain".to_string(),
                found: group.trailing,
                position,
            });
        }

        Ok(ProofSpec::new(proof_type, group.inner))
    }
}
