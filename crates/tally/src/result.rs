// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use electora_utils::ElectionId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyRequest {
    pub election_id: ElectionId,
    /// Unix time (or block height for block height conditions) after which ballots may be
    /// decrypted
    pub election_end: u64,
    pub ritual_id: u32,
}

/// Outcome of a completed run.
///
/// `votes` follows the order in which ballots were discovered. Ballots the network could not
/// gather enough shares for are only counted in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyResult {
    pub votes: Vec<String>,
    pub failed: usize,
}

impl TallyResult {
    /// Number of ballots the run looked at
    pub fn total(&self) -> usize {
        self.votes.len() + self.failed
    }

    /// How many times each distinct ballot was cast
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for vote in &self.votes {
            *counts.entry(vote.clone()).or_insert(0) += 1;
        }
        counts
    }
}
