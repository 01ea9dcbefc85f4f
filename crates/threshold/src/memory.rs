// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DecryptError, DecryptionNetwork, DecryptionRequest};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

/// In process stand in for a decryption network.
///
/// Ciphertexts are looked up in a table instead of being decrypted. Release conditions are
/// evaluated against a fixed `current` value, a unix time for timelocks or a block height.
#[derive(Debug, Default)]
pub struct InMemoryNetwork {
    current: u64,
    peers: usize,
    plaintexts: HashMap<Vec<u8>, Vec<u8>>,
    withheld: HashSet<Vec<u8>>,
    delays: HashMap<Vec<u8>, Duration>,
    ready: AtomicBool,
    discoveries: AtomicUsize,
    decrypt_calls: AtomicUsize,
    failing_discoveries: AtomicU32,
    failing_decrypts: AtomicU32,
}

impl InMemoryNetwork {
    pub fn new(current: u64) -> Self {
        Self {
            current,
            peers: 3,
            ..Default::default()
        }
    }

    pub fn with_plaintext(mut self, ciphertext: &[u8], plaintext: &[u8]) -> Self {
        self.plaintexts.insert(ciphertext.to_vec(), plaintext.to_vec());
        self
    }

    /// Answer requests for `ciphertext` with too few shares
    pub fn withholding(mut self, ciphertext: &[u8]) -> Self {
        self.withheld.insert(ciphertext.to_vec());
        self
    }

    /// Hold the answer for `ciphertext` back for `delay`
    pub fn with_delay(mut self, ciphertext: &[u8], delay: Duration) -> Self {
        self.delays.insert(ciphertext.to_vec(), delay);
        self
    }

    /// Make the next `count` discoveries fail as if no bootstrap node answered
    pub fn fail_discoveries(&self, count: u32) {
        self.failing_discoveries.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` decryption requests fail with a transport error
    pub fn fail_decrypts(&self, count: u32) {
        self.failing_decrypts.store(count, Ordering::SeqCst);
    }

    pub fn discoveries(&self) -> usize {
        self.discoveries.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

fn take_failure(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl DecryptionNetwork for InMemoryNetwork {
    async fn discover_peers(&self) -> Result<usize, DecryptError> {
        self.discoveries.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failing_discoveries) {
            return Err(DecryptError::Transport(
                "no bootstrap node answered".to_string(),
            ));
        }
        self.ready.store(true, Ordering::SeqCst);
        Ok(self.peers)
    }

    async fn threshold_decrypt(
        &self,
        request: &DecryptionRequest,
    ) -> Result<Vec<u8>, DecryptError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        if !self.ready.load(Ordering::SeqCst) {
            return Err(DecryptError::Transport("no known decryption nodes".to_string()));
        }
        if take_failure(&self.failing_decrypts) {
            return Err(DecryptError::Transport("connection reset".to_string()));
        }

        let ciphertext: &[u8] = &request.ciphertext;
        if let Some(delay) = self.delays.get(ciphertext) {
            tokio::time::sleep(*delay).await;
        }

        if !request.conditions.is_satisfied_by(self.current) {
            return Err(DecryptError::ConditionNotSatisfied(format!(
                "{} >= {} is false",
                self.current,
                request.conditions.threshold()
            )));
        }
        if self.withheld.contains(ciphertext) {
            return Err(DecryptError::InsufficientShares(format!(
                "1 of {} nodes answered",
                self.peers
            )));
        }

        self.plaintexts.get(ciphertext).cloned().ok_or_else(|| {
            DecryptError::Malformed("ciphertext was not produced by this ritual".to_string())
        })
    }
}
