// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{IndexQueryError, TransactionIndex};
use async_trait::async_trait;
use electora_utils::{ElectionId, TransactionRef};
use std::collections::HashMap;

/// Fixed election to ballot mapping.
#[derive(Clone, Debug, Default)]
pub struct StaticIndex {
    elections: HashMap<ElectionId, Vec<TransactionRef>>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_election(
        mut self,
        election: ElectionId,
        refs: impl IntoIterator<Item = TransactionRef>,
    ) -> Self {
        self.elections.insert(election, refs.into_iter().collect());
        self
    }
}

#[async_trait]
impl TransactionIndex for StaticIndex {
    async fn locate(&self, election: &ElectionId) -> Result<Vec<TransactionRef>, IndexQueryError> {
        Ok(self.elections.get(election).cloned().unwrap_or_default())
    }
}
