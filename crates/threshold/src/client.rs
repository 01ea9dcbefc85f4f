// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    DecryptError, DecryptionNetwork, DecryptionRequest, Decryptor, Disposition,
    HttpDecryptionNetwork,
};
use async_trait::async_trait;
use electora_conditions::ReleaseCondition;
use electora_config::{CoordinatorConfig, NetworkConfig, RetryPolicy};
use electora_utils::{retry_with_backoff, HexBytes, RetryError};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

static SHARED_CLIENT: once_cell::sync::OnceCell<Arc<ThresholdClient<HttpDecryptionNetwork>>> =
    once_cell::sync::OnceCell::new();

/// Decrypts votes through a threshold network.
///
/// Peer discovery happens once per client no matter how many tasks call
/// [`Decryptor::ensure_ready`] concurrently. A failed discovery leaves the client
/// uninitialised so a later call can try again.
pub struct ThresholdClient<N: DecryptionNetwork> {
    network: N,
    domain: String,
    coordinator: CoordinatorConfig,
    retry: RetryPolicy,
    ready: OnceCell<usize>,
}

impl<N: DecryptionNetwork> ThresholdClient<N> {
    pub fn new(network: N, config: &NetworkConfig) -> Self {
        Self {
            network,
            domain: config.domain.clone(),
            coordinator: config.coordinator.clone(),
            retry: config.retry,
            ready: OnceCell::new(),
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    fn request(
        &self,
        ciphertext: &[u8],
        condition: &ReleaseCondition,
        ritual_id: u32,
    ) -> DecryptionRequest {
        DecryptionRequest {
            domain: self.domain.clone(),
            ritual_id,
            ciphertext: HexBytes::from_bytes(ciphertext),
            conditions: condition.clone(),
            coordinator: self.coordinator.clone(),
        }
    }
}

impl ThresholdClient<HttpDecryptionNetwork> {
    /// Process wide client for the http network.
    ///
    /// The first call builds the client from `config`. Every later call returns that same
    /// client and ignores its argument.
    pub fn shared(config: &NetworkConfig) -> Result<Arc<Self>, DecryptError> {
        SHARED_CLIENT
            .get_or_try_init(|| {
                let network = HttpDecryptionNetwork::from_config(config)?;
                Ok(Arc::new(ThresholdClient::new(network, config)))
            })
            .cloned()
    }
}

fn classify(err: DecryptError) -> RetryError<DecryptError> {
    match err.disposition() {
        Disposition::Retry => RetryError::Retry(err),
        Disposition::Skip | Disposition::Abort => RetryError::Failure(err),
    }
}

#[async_trait]
impl<N: DecryptionNetwork> Decryptor for ThresholdClient<N> {
    async fn ensure_ready(&self) -> Result<(), DecryptError> {
        let network = &self.network;
        self.ready
            .get_or_try_init(|| async {
                let peers = retry_with_backoff(
                    move |_| async move { network.discover_peers().await.map_err(classify) },
                    self.retry.max_attempts,
                    self.retry.initial_delay_ms,
                )
                .await?;
                info!(domain = %self.domain, "decryption client ready with {peers} peers");
                Ok::<_, DecryptError>(peers)
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, ciphertext, condition), fields(bytes = ciphertext.len()))]
    async fn decrypt(
        &self,
        ciphertext: &[u8],
        condition: &ReleaseCondition,
        ritual_id: u32,
    ) -> Result<String, DecryptError> {
        self.ensure_ready().await?;

        let request = &self.request(ciphertext, condition, ritual_id);
        let network = &self.network;
        let plaintext = retry_with_backoff(
            move |attempt| async move {
                debug!("decrypt attempt {attempt}");
                network.threshold_decrypt(request).await.map_err(classify)
            },
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
        )
        .await?;

        Ok(String::from_utf8(plaintext)?)
    }
}

#[async_trait]
impl<D: Decryptor + ?Sized> Decryptor for Arc<D> {
    async fn ensure_ready(&self) -> Result<(), DecryptError> {
        (**self).ensure_ready().await
    }

    async fn decrypt(
        &self,
        ciphertext: &[u8],
        condition: &ReleaseCondition,
        ritual_id: u32,
    ) -> Result<String, DecryptError> {
        (**self).decrypt(ciphertext, condition, ritual_id).await
    }
}
