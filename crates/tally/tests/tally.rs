// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use electora_blobs::{BlobFailure, InMemoryBlobStore};
use electora_conditions::{ChainContext, ReleaseMethod};
use electora_config::{NetworkConfig, RetryPolicy};
use electora_indexer::StaticIndex;
use electora_tally::{Tally, TallyError, TallyRequest, TallyResult};
use electora_threshold::{DecryptError, InMemoryNetwork, ThresholdClient};
use electora_utils::{ElectionId, TransactionRef};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const ELECTION_END: u64 = 1_700_000_000;
const AFTER_ELECTION: u64 = 1_800_000_000;

type TestTally = Tally<StaticIndex, InMemoryBlobStore, Arc<ThresholdClient<InMemoryNetwork>>>;

fn election() -> ElectionId {
    ElectionId::new("election-1")
}

fn request() -> TallyRequest {
    TallyRequest {
        election_id: election(),
        election_end: ELECTION_END,
        ritual_id: 0,
    }
}

fn tx(n: usize) -> TransactionRef {
    TransactionRef::new(format!("tx-{n}"))
}

fn ciphertext(n: usize) -> Vec<u8> {
    format!("ciphertext-{n}").into_bytes()
}

fn client(network: InMemoryNetwork) -> Arc<ThresholdClient<InMemoryNetwork>> {
    let config = NetworkConfig {
        retry: RetryPolicy {
            max_attempts: 2,
            initial_delay_ms: 1,
        },
        ..NetworkConfig::default()
    };
    Arc::new(ThresholdClient::new(network, &config))
}

/// Ballots 1..=n, each decrypting to `vote-<n>`
fn network(n: usize, current: u64) -> InMemoryNetwork {
    (1..=n).fold(InMemoryNetwork::new(current), |network, i| {
        network.with_plaintext(&ciphertext(i), format!("vote-{i}").as_bytes())
    })
}

fn setup(n: usize, network: InMemoryNetwork) -> TestTally {
    let index = StaticIndex::new().with_election(election(), (1..=n).map(tx));
    let blobs: InMemoryBlobStore = (1..=n).map(|i| (tx(i), ciphertext(i))).collect();
    Tally::new(
        index,
        blobs,
        client(network),
        ChainContext::new(80002, ReleaseMethod::Timelock),
    )
}

#[tokio::test]
async fn test_decrypts_every_ballot_in_discovery_order() -> Result<()> {
    let tally = setup(3, network(3, AFTER_ELECTION));
    let result = tally.run(&request(), &CancellationToken::new()).await?;
    assert_eq!(
        result,
        TallyResult {
            votes: vec!["vote-1".into(), "vote-2".into(), "vote-3".into()],
            failed: 0,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_no_ballots_is_an_empty_tally() -> Result<()> {
    let tally = setup(0, network(0, AFTER_ELECTION));
    let result = tally.run(&request(), &CancellationToken::new()).await?;
    assert_eq!(result, TallyResult { votes: vec![], failed: 0 });
    Ok(())
}

#[tokio::test]
async fn test_insufficient_shares_are_counted_as_failed() -> Result<()> {
    let network = network(5, AFTER_ELECTION)
        .withholding(&ciphertext(2))
        .withholding(&ciphertext(4));
    let tally = setup(5, network);

    let result = tally.run(&request(), &CancellationToken::new()).await?;
    assert_eq!(result.votes, vec!["vote-1", "vote-3", "vote-5"]);
    assert_eq!(result.failed, 2);
    assert_eq!(result.votes.len() + result.failed, 5);
    Ok(())
}

#[tokio::test]
async fn test_completion_order_does_not_change_vote_order() -> Result<()> {
    // earlier ballots take longer so they finish last
    let network = (1..=6).fold(network(6, AFTER_ELECTION), |network, i| {
        network.with_delay(&ciphertext(i), Duration::from_millis(70 - 10 * i as u64))
    });
    let tally = setup(6, network).with_concurrency(6);

    let result = tally.run(&request(), &CancellationToken::new()).await?;
    let expected: Vec<String> = (1..=6).map(|i| format!("vote-{i}")).collect();
    assert_eq!(result.votes, expected);
    Ok(())
}

#[tokio::test]
async fn test_count_invariant_holds_for_any_concurrency() -> Result<()> {
    for concurrency in [1, 2, 3, 8] {
        let network = network(7, AFTER_ELECTION)
            .withholding(&ciphertext(1))
            .withholding(&ciphertext(6))
            .withholding(&ciphertext(7));
        let tally = setup(7, network).with_concurrency(concurrency);
        let result = tally.run(&request(), &CancellationToken::new()).await?;
        assert_eq!(result.votes.len() + result.failed, 7);
        assert_eq!(result.votes, vec!["vote-2", "vote-3", "vote-4", "vote-5"]);
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_blob_fails_the_run() {
    let index = StaticIndex::new().with_election(election(), (1..=3).map(tx));
    let blobs: InMemoryBlobStore = [(tx(1), ciphertext(1)), (tx(3), ciphertext(3))]
        .into_iter()
        .collect();
    let tally = Tally::new(
        index,
        blobs,
        client(network(3, AFTER_ELECTION)),
        ChainContext::new(80002, ReleaseMethod::Timelock),
    );

    let err = tally
        .run(&request(), &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        TallyError::BlobUnavailable(e) => {
            assert_eq!(e.tx, tx(2));
            assert!(matches!(e.cause, BlobFailure::NotFound));
        }
        other => panic!("expected a blob error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_condition_not_satisfied_aborts() {
    let tally = setup(3, network(3, ELECTION_END - 1));
    let err = tally
        .run(&request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TallyError::Decrypt {
            source: DecryptError::ConditionNotSatisfied(_),
            ..
        }
    ));
    assert!(err.transaction().is_some());
}

#[tokio::test]
async fn test_undecryptable_ballot_aborts_with_its_reference() {
    let index = StaticIndex::new().with_election(election(), vec![tx(1), tx(2)]);
    let blobs: InMemoryBlobStore = [(tx(1), ciphertext(1)), (tx(2), b"garbage".to_vec())]
        .into_iter()
        .collect();
    let tally = Tally::new(
        index,
        blobs,
        client(network(2, AFTER_ELECTION)),
        ChainContext::new(80002, ReleaseMethod::Timelock),
    )
    .with_concurrency(1);

    let err = tally
        .run(&request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.transaction(), Some(&tx(2)));
    assert!(matches!(
        err,
        TallyError::Decrypt {
            source: DecryptError::Malformed(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_persistent_transport_failure_aborts() {
    let network = network(2, AFTER_ELECTION);
    network.fail_decrypts(100);
    let tally = setup(2, network);
    let err = tally
        .run(&request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TallyError::Decrypt {
            source: DecryptError::Transport(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_bootstrap_failure_is_not_ready() {
    let network = network(1, AFTER_ELECTION);
    network.fail_discoveries(10);
    let tally = setup(1, network);
    let err = tally
        .run(&request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TallyError::NotReady(DecryptError::Transport(_))));
}

#[tokio::test]
async fn test_client_bootstraps_once_across_runs() -> Result<()> {
    let client = client(network(2, AFTER_ELECTION));
    for _ in 0..3 {
        let index = StaticIndex::new().with_election(election(), (1..=2).map(tx));
        let blobs: InMemoryBlobStore = (1..=2).map(|i| (tx(i), ciphertext(i))).collect();
        let tally = Tally::new(
            index,
            blobs,
            client.clone(),
            ChainContext::new(80002, ReleaseMethod::Timelock),
        );
        assert_eq!(tally.run(&request(), &CancellationToken::new()).await?.votes.len(), 2);
    }
    assert_eq!(client.network().discoveries(), 1);
    Ok(())
}

#[tokio::test]
async fn test_cancellation_drops_the_run() {
    let network = network(2, AFTER_ELECTION).with_delay(&ciphertext(1), Duration::from_secs(30));
    let tally = setup(2, network);
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    let err = tally.run(&request(), &cancel).await.unwrap_err();
    assert!(matches!(err, TallyError::Cancelled));
    canceller.await.unwrap();
}

#[tokio::test]
async fn test_deadline_cancels_the_run() {
    let network = network(2, AFTER_ELECTION).with_delay(&ciphertext(2), Duration::from_secs(30));
    let tally = setup(2, network).with_deadline(Some(Duration::from_millis(20)));

    let err = tally
        .run(&request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TallyError::Cancelled));
}

#[tokio::test]
async fn test_counts_group_identical_ballots() -> Result<()> {
    let network = InMemoryNetwork::new(AFTER_ELECTION)
        .with_plaintext(&ciphertext(1), b"alice")
        .with_plaintext(&ciphertext(2), b"bob")
        .with_plaintext(&ciphertext(3), b"alice");
    let tally = setup(3, network);

    let result = tally.run(&request(), &CancellationToken::new()).await?;
    let counts = result.counts();
    assert_eq!(counts.get("alice"), Some(&2));
    assert_eq!(counts.get("bob"), Some(&1));
    Ok(())
}
