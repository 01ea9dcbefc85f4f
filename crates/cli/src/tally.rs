// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use electora_blobs::HttpBlobStore;
use electora_conditions::ChainContext;
use electora_config::AppConfig;
use electora_indexer::GraphQlLocator;
use electora_tally::{Tally, TallyRequest, TallyResult};
use electora_threshold::ThresholdClient;
use electora_utils::ElectionId;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn execute(
    config: &AppConfig,
    election_id: String,
    end: u64,
    ritual: Option<u32>,
    counts: bool,
) -> Result<()> {
    let tally = Tally::new(
        GraphQlLocator::from_config(&config.index),
        HttpBlobStore::from_config(&config.blobs),
        ThresholdClient::shared(&config.network)?,
        ChainContext::new(
            config.network.coordinator.chain_id,
            config.tally.release_method,
        ),
    )
    .with_concurrency(config.tally.concurrency)
    .with_deadline(config.tally.deadline_secs.map(Duration::from_secs));

    let request = TallyRequest {
        election_id: ElectionId::new(election_id),
        election_end: end,
        ritual_id: ritual.unwrap_or(config.network.ritual_id),
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling tally");
            on_interrupt.cancel();
        }
    });

    let result = tally.run(&request, &cancel).await?;
    info!(
        "tally of {} complete: {} ballots, {} undecryptable",
        request.election_id,
        result.total(),
        result.failed
    );
    print!("{}", render(&result, counts));
    Ok(())
}

fn render(result: &TallyResult, counts: bool) -> String {
    let mut out = String::new();
    if counts {
        for (vote, count) in result.counts() {
            out.push_str(&format!("{vote}: {count}\n"));
        }
    } else {
        for vote in &result.votes {
            out.push_str(vote);
            out.push('\n');
        }
    }
    if result.failed > 0 {
        out.push_str(&format!("failed: {}\n", result.failed));
    }
    out
}
