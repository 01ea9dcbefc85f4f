// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    decompress, ClaimSpec, EligibilityError, ProofBackend, ProofVerificationError, VerifyRequest,
};
use tracing::{info, instrument};

/// Checks compressed eligibility proofs against a requested claim
pub struct EligibilityVerifier<B: ProofBackend> {
    backend: B,
    app_id: Option<String>,
}

impl<B: ProofBackend> EligibilityVerifier<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            app_id: None,
        }
    }

    /// Only accept proofs issued for `app_id`
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// `Ok(false)` means the proof decoded, is bound to the requested claim and the proof
    /// system rejected it.
    #[instrument(skip(self, compressed_proof), fields(group = %claim.group_id))]
    pub async fn verify(
        &self,
        compressed_proof: &[u8],
        claim: &ClaimSpec,
    ) -> Result<bool, EligibilityError> {
        let proof = decompress(compressed_proof)?;

        if proof.claim != *claim {
            return Err(ProofVerificationError::ClaimMismatch {
                expected: claim.group_id.clone(),
                found: proof.claim.group_id,
            }
            .into());
        }
        if let Some(expected) = &self.app_id {
            if proof.app_id != *expected {
                return Err(ProofVerificationError::AppMismatch {
                    expected: expected.clone(),
                    found: proof.app_id,
                }
                .into());
            }
        }

        let request = VerifyRequest::from(proof);
        let valid = self
            .backend
            .verify(&request)
            .await
            .map_err(ProofVerificationError::from)?;
        info!("eligibility proof for app {} is valid: {valid}", request.app_id);
        Ok(valid)
    }
}
