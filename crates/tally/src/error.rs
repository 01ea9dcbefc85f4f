// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use electora_blobs::BlobUnavailableError;
use electora_indexer::IndexQueryError;
use electora_threshold::DecryptError;
use electora_utils::TransactionRef;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Could not locate ballots: {0}")]
    IndexQuery(#[from] IndexQueryError),

    #[error(transparent)]
    BlobUnavailable(#[from] BlobUnavailableError),

    #[error("Decryption client could not start: {0}")]
    NotReady(#[source] DecryptError),

    #[error("Could not decrypt ballot {tx}: {source}")]
    Decrypt {
        tx: TransactionRef,
        #[source]
        source: DecryptError,
    },

    #[error("Tally was cancelled")]
    Cancelled,
}

impl TallyError {
    /// The ballot the run failed on, if the failure is tied to one
    pub fn transaction(&self) -> Option<&TransactionRef> {
        match self {
            TallyError::BlobUnavailable(e) => Some(&e.tx),
            TallyError::Decrypt { tx, .. } => Some(tx),
            _ => None,
        }
    }
}
