// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use electora_conditions::{build, ChainContext, ReleaseMethod};
use electora_config::AppConfig;
use electora_threshold::{Decryptor, ThresholdClient};
use electora_utils::decode_hex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

pub async fn execute(
    config: &AppConfig,
    ciphertext: &str,
    timestamp: u64,
    ritual: Option<u32>,
) -> Result<()> {
    let ciphertext = decode_hex(ciphertext).context("Ciphertext must be hex encoded")?;
    let ritual_id = ritual.unwrap_or(config.network.ritual_id);

    let chain = ChainContext::new(
        config.network.coordinator.chain_id,
        config.tally.release_method,
    );
    let condition = build(timestamp, &chain);

    if chain.method == ReleaseMethod::Timelock {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        if !condition.is_satisfied_by(now) {
            warn!(
                "ballot cannot be opened for another {} seconds, the network will likely refuse",
                timestamp - now
            );
        }
    }

    let client = ThresholdClient::shared(&config.network)?;
    let plaintext = client.decrypt(&ciphertext, &condition, ritual_id).await?;
    println!("{}", plaintext);
    Ok(())
}
