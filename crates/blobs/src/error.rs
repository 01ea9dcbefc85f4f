// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use electora_utils::TransactionRef;
use thiserror::Error;

/// A ciphertext could not be produced for a transaction. Never recovered from by substituting
/// empty content.
#[derive(Error, Debug)]
#[error("Blob for transaction '{tx}' is unavailable: {cause}")]
pub struct BlobUnavailableError {
    pub tx: TransactionRef,
    #[source]
    pub cause: BlobFailure,
}

impl BlobUnavailableError {
    pub fn new(tx: &TransactionRef, cause: BlobFailure) -> Self {
        Self {
            tx: tx.clone(),
            cause,
        }
    }
}

#[derive(Error, Debug)]
pub enum BlobFailure {
    #[error("Request to blob store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Blob store answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Blob store returned an empty body")]
    Empty,

    #[error("Blob body is not valid hex: {0}")]
    Malformed(String),

    #[error("No blob stored under this reference")]
    NotFound,
}
