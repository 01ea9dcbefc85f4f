// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use electora_utils::HexBytes;
use serde::{Deserialize, Serialize};

/// What a voter claims to be eligible for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClaimSpec {
    pub group_id: String,
}

impl ClaimSpec {
    pub fn group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }
}

/// A zero knowledge proof of membership as produced by the voter's wallet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EligibilityProof {
    pub app_id: String,
    pub claim: ClaimSpec,
    pub proof: HexBytes,
    pub public_inputs: HexBytes,
}

/// Input handed to a [`crate::ProofBackend`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyRequest {
    pub app_id: String,
    pub proof: HexBytes,
    pub public_inputs: HexBytes,
    pub claim: ClaimSpec,
}

impl From<EligibilityProof> for VerifyRequest {
    fn from(value: EligibilityProof) -> Self {
        Self {
            app_id: value.app_id,
            proof: value.proof,
            public_inputs: value.public_inputs,
            claim: value.claim,
        }
    }
}
