// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BlobFailure, BlobSource, BlobUnavailableError};
use async_trait::async_trait;
use electora_config::{BlobConfig, BlobEncoding, Endpoint, EndpointAuth};
use electora_utils::{decode_hex, excerpt, with_auth, TransactionRef};
use tracing::{debug, instrument};

/// Blob store reachable over http as `GET <endpoint>/<transaction_id>`
#[derive(Clone, Debug)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    endpoint: Endpoint,
    encoding: BlobEncoding,
    auth: EndpointAuth,
}

impl HttpBlobStore {
    pub fn new(endpoint: Endpoint, encoding: BlobEncoding) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            encoding,
            auth: EndpointAuth::None,
        }
    }

    pub fn from_config(config: &BlobConfig) -> Self {
        Self::new(config.url.clone(), config.encoding).with_auth(config.auth.clone())
    }

    pub fn with_auth(mut self, auth: EndpointAuth) -> Self {
        self.auth = auth;
        self
    }
}

#[async_trait]
impl BlobSource for HttpBlobStore {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, tx: &TransactionRef) -> Result<Vec<u8>, BlobUnavailableError> {
        let fail = |cause| BlobUnavailableError::new(tx, cause);

        let url = self.endpoint.join(tx.as_str()).map_err(|e| {
            fail(BlobFailure::Malformed(format!("could not address blob: {e}")))
        })?;

        let response = with_auth(self.client.get(url), &self.auth)
            .send()
            .await
            .map_err(|e| fail(BlobFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fail(BlobFailure::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            }));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fail(BlobFailure::Transport(e)))?;

        let ciphertext = decode_body(&body, self.encoding).map_err(fail)?;
        debug!("fetched {} ciphertext bytes", ciphertext.len());
        Ok(ciphertext)
    }
}

/// Turn a successful response body into ciphertext bytes
pub fn decode_body(body: &[u8], encoding: BlobEncoding) -> Result<Vec<u8>, BlobFailure> {
    let bytes = match encoding {
        BlobEncoding::Raw => body.to_vec(),
        BlobEncoding::Hex => {
            let text = std::str::from_utf8(body)
                .map_err(|_| BlobFailure::Malformed("body is not utf-8 text".to_string()))?;
            decode_hex(text).map_err(|e| BlobFailure::Malformed(e.to_string()))?
        }
    };

    if bytes.is_empty() {
        return Err(BlobFailure::Empty);
    }
    Ok(bytes)
}
