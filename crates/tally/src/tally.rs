// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{TallyError, TallyRequest, TallyResult};
use electora_blobs::BlobSource;
use electora_conditions::{build, ChainContext, ReleaseCondition};
use electora_indexer::TransactionIndex;
use electora_threshold::{Decryptor, Disposition};
use electora_utils::TransactionRef;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Locates the ballots of an election, fetches each ciphertext and decrypts it.
///
/// A run either returns a [`TallyResult`] covering every located ballot or fails as a whole.
pub struct Tally<I, B, D> {
    index: I,
    blobs: B,
    decryptor: D,
    chain: ChainContext,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl<I, B, D> Tally<I, B, D>
where
    I: TransactionIndex,
    B: BlobSource,
    D: Decryptor,
{
    pub fn new(index: I, blobs: B, decryptor: D, chain: ChainContext) -> Self {
        Self {
            index,
            blobs,
            decryptor,
            chain,
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }

    /// Number of ballots fetched and decrypted at the same time
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Give up on runs that take longer than `deadline`
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run a tally. Cancelling `cancel` drops all in flight work and fails the run.
    #[instrument(skip(self, cancel), fields(election = %request.election_id))]
    pub async fn run(
        &self,
        request: &TallyRequest,
        cancel: &CancellationToken,
    ) -> Result<TallyResult, TallyError> {
        let work = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout(deadline, self.tally(request)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("tally exceeded its deadline of {:?}", deadline);
                        Err(TallyError::Cancelled)
                    }
                },
                None => self.tally(request).await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("tally cancelled");
                Err(TallyError::Cancelled)
            }
            result = work => result,
        }
    }

    async fn tally(&self, request: &TallyRequest) -> Result<TallyResult, TallyError> {
        self.decryptor
            .ensure_ready()
            .await
            .map_err(TallyError::NotReady)?;

        let refs = self.index.locate(&request.election_id).await?;
        if refs.is_empty() {
            info!("no ballots found");
            return Ok(TallyResult::default());
        }
        info!("found {} ballots", refs.len());

        let condition = build(request.election_end, &self.chain);
        let condition = &condition;

        let mut slots: Vec<Option<String>> = vec![None; refs.len()];
        let mut failed = 0;

        let mut outcomes = stream::iter(refs.iter().enumerate())
            .map(|(index, tx)| async move {
                self.open_ballot(tx, condition, request.ritual_id)
                    .await
                    .map(|vote| (index, vote))
            })
            .buffer_unordered(self.concurrency);

        while let Some((index, vote)) = outcomes.try_next().await? {
            match vote {
                Some(vote) => slots[index] = Some(vote),
                None => failed += 1,
            }
        }

        let votes: Vec<String> = slots.into_iter().flatten().collect();
        info!("decrypted {} ballots, {} failed", votes.len(), failed);
        Ok(TallyResult { votes, failed })
    }

    /// `Ok(None)` when the ballot could not be decrypted but the run may continue
    async fn open_ballot(
        &self,
        tx: &TransactionRef,
        condition: &ReleaseCondition,
        ritual_id: u32,
    ) -> Result<Option<String>, TallyError> {
        let ciphertext = self.blobs.fetch(tx).await?;

        match self.decryptor.decrypt(&ciphertext, condition, ritual_id).await {
            Ok(vote) => {
                debug!("decrypted ballot {tx}");
                Ok(Some(vote))
            }
            Err(e) => match e.disposition() {
                Disposition::Skip => {
                    warn!("skipping ballot {tx}: {e}");
                    Ok(None)
                }
                Disposition::Retry | Disposition::Abort => Err(TallyError::Decrypt {
                    tx: tx.clone(),
                    source: e,
                }),
            },
        }
    }
}
