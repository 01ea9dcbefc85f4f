// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::IndexQueryError;
use async_trait::async_trait;
use electora_utils::{ElectionId, TransactionRef};

/// Finds every ballot transaction submitted under an election.
///
/// Implementors return references in the order the index discovered them. An election with
/// no ballots is an empty vector, not an error.
#[async_trait]
pub trait TransactionIndex: Send + Sync + 'static {
    async fn locate(&self, election: &ElectionId) -> Result<Vec<TransactionRef>, IndexQueryError>;
}
