// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DecryptError, DecryptionRequest};
use async_trait::async_trait;
use electora_conditions::ReleaseCondition;

/// Transport to a threshold decryption network
#[async_trait]
pub trait DecryptionNetwork: Send + Sync + 'static {
    /// Learn the nodes of the network. Returns how many nodes are known afterwards.
    async fn discover_peers(&self) -> Result<usize, DecryptError>;

    /// Ask the network for enough shares to decrypt the request's ciphertext.
    async fn threshold_decrypt(&self, request: &DecryptionRequest)
        -> Result<Vec<u8>, DecryptError>;
}

/// Anything able to turn a ciphertext into a plaintext vote
#[async_trait]
pub trait Decryptor: Send + Sync + 'static {
    /// Idempotent. Safe to call from many tasks at once.
    async fn ensure_ready(&self) -> Result<(), DecryptError>;

    async fn decrypt(
        &self,
        ciphertext: &[u8],
        condition: &ReleaseCondition,
        ritual_id: u32,
    ) -> Result<String, DecryptError>;
}
