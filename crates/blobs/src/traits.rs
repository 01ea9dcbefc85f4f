// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::BlobUnavailableError;
use async_trait::async_trait;
use electora_utils::TransactionRef;

/// Somewhere ciphertext bytes can be retrieved from by transaction reference.
/// A single attempt is made per call; retry policy belongs to the caller.
#[async_trait]
pub trait BlobSource: Send + Sync + 'static {
    async fn fetch(&self, tx: &TransactionRef) -> Result<Vec<u8>, BlobUnavailableError>;
}
