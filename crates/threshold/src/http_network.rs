// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    DecryptError, DecryptionNetwork, DecryptionRequest, DecryptionResponse, KnownNodes,
    NodeError, CONDITION_NOT_SATISFIED, INSUFFICIENT_SHARES,
};
use async_trait::async_trait;
use electora_config::{Endpoint, EndpointAuth, NetworkConfig};
use electora_utils::{excerpt, with_auth};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Decryption network spoken to over http.
///
/// Peers are learnt from the bootstrap nodes with `GET /known_nodes?domain=<domain>`.
/// Decryption requests go to `POST /decrypt` on the first peer that can be reached.
pub struct HttpDecryptionNetwork {
    client: reqwest::Client,
    domain: String,
    bootstrap_nodes: Vec<Endpoint>,
    auth: EndpointAuth,
    peers: RwLock<Vec<Endpoint>>,
}

impl HttpDecryptionNetwork {
    pub fn new(
        client: reqwest::Client,
        domain: impl Into<String>,
        bootstrap_nodes: Vec<Endpoint>,
    ) -> Self {
        Self {
            client,
            domain: domain.into(),
            bootstrap_nodes,
            auth: EndpointAuth::None,
            peers: RwLock::new(Vec::new()),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self, DecryptError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(DecryptError::transport)?;
        Ok(Self::new(client, config.domain.clone(), config.bootstrap_nodes.clone())
            .with_auth(config.auth.clone()))
    }

    pub fn with_auth(mut self, auth: EndpointAuth) -> Self {
        self.auth = auth;
        self
    }

    async fn known_nodes(&self, bootstrap: &Endpoint) -> Result<Vec<Endpoint>, DecryptError> {
        let mut url = bootstrap
            .join("known_nodes")
            .map_err(|e| DecryptError::Malformed(e.to_string()))?;
        url.query_pairs_mut().append_pair("domain", &self.domain);

        let response = with_auth(self.client.get(url), &self.auth)
            .send()
            .await
            .map_err(DecryptError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(DecryptError::transport)?;
        if !status.is_success() {
            return Err(DecryptError::Transport(format!(
                "bootstrap node answered HTTP {}",
                status.as_u16()
            )));
        }

        let known: KnownNodes = serde_json::from_str(&body)
            .map_err(|e| DecryptError::Malformed(format!("{e}: {}", excerpt(&body))))?;

        Ok(known
            .nodes
            .iter()
            .filter_map(|node| match Endpoint::parse(node) {
                Ok(endpoint) => Some(endpoint),
                Err(e) => {
                    warn!("ignoring advertised node with invalid address: {e}");
                    None
                }
            })
            .collect())
    }

    async fn post_decrypt(
        &self,
        node: &Endpoint,
        request: &DecryptionRequest,
    ) -> Result<Vec<u8>, DecryptError> {
        let url = node
            .join("decrypt")
            .map_err(|e| DecryptError::Malformed(e.to_string()))?;

        let response = with_auth(self.client.post(url), &self.auth)
            .json(request)
            .send()
            .await
            .map_err(DecryptError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(DecryptError::transport)?;

        match serde_json::from_str::<DecryptionResponse>(&body) {
            Ok(DecryptionResponse {
                error: Some(error), ..
            }) => Err(node_error(error)),
            Ok(DecryptionResponse {
                plaintext: Some(plaintext),
                ..
            }) if status.is_success() => Ok(plaintext.into_bytes()),
            _ if status.is_server_error() => Err(DecryptError::Transport(format!(
                "node answered HTTP {}",
                status.as_u16()
            ))),
            Ok(_) => Err(DecryptError::Malformed(format!(
                "HTTP {} without plaintext or error",
                status.as_u16()
            ))),
            Err(e) => Err(DecryptError::Malformed(format!(
                "HTTP {}: {e}: {}",
                status.as_u16(),
                excerpt(&body)
            ))),
        }
    }
}

fn node_error(error: NodeError) -> DecryptError {
    let message = error.message.unwrap_or_else(|| error.kind.clone());
    match error.kind.as_str() {
        INSUFFICIENT_SHARES => DecryptError::InsufficientShares(message),
        CONDITION_NOT_SATISFIED => DecryptError::ConditionNotSatisfied(message),
        other => DecryptError::Malformed(format!("node reported '{other}': {message}")),
    }
}

/// Append `nodes` to `peers`, skipping any address already present
pub fn merge_peers(peers: &mut Vec<Endpoint>, nodes: impl IntoIterator<Item = Endpoint>) {
    for node in nodes {
        if !peers.contains(&node) {
            peers.push(node);
        }
    }
}

#[async_trait]
impl DecryptionNetwork for HttpDecryptionNetwork {
    #[instrument(skip(self), fields(domain = %self.domain))]
    async fn discover_peers(&self) -> Result<usize, DecryptError> {
        let mut peers = Vec::new();
        let mut answered = 0;

        for bootstrap in &self.bootstrap_nodes {
            match self.known_nodes(bootstrap).await {
                Ok(nodes) => {
                    answered += 1;
                    merge_peers(&mut peers, std::iter::once(bootstrap.clone()).chain(nodes));
                }
                Err(e) => warn!("bootstrap node did not answer: {e}"),
            }
        }

        if answered == 0 {
            return Err(DecryptError::Transport(format!(
                "none of {} bootstrap nodes answered",
                self.bootstrap_nodes.len()
            )));
        }

        info!("discovered {} decryption nodes", peers.len());
        let count = peers.len();
        *self.peers.write().await = peers;
        Ok(count)
    }

    #[instrument(skip(self, request), fields(ritual_id = request.ritual_id))]
    async fn threshold_decrypt(
        &self,
        request: &DecryptionRequest,
    ) -> Result<Vec<u8>, DecryptError> {
        let peers = self.peers.read().await.clone();
        if peers.is_empty() {
            return Err(DecryptError::Transport("no known decryption nodes".to_string()));
        }

        for (index, node) in peers.iter().enumerate() {
            match self.post_decrypt(node, request).await {
                Err(e @ DecryptError::Transport(_)) => {
                    debug!("node {}/{} unreachable: {e}", index + 1, peers.len());
                }
                result => return result,
            }
        }

        Err(DecryptError::Transport(format!(
            "all {} known nodes were unreachable",
            peers.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use electora_conditions::{build, ChainContext, ReleaseMethod};
    use electora_utils::stub_server::{StubResponse, StubServer};

    fn endpoint(url: &str) -> Endpoint {
        Endpoint::parse(url).unwrap()
    }

    fn request() -> DecryptionRequest {
        DecryptionRequest {
            domain: "lynx".to_string(),
            ritual_id: 0,
            ciphertext: vec![1].into(),
            conditions: build(0, &ChainContext::new(1, ReleaseMethod::Timelock)),
            coordinator: Default::default(),
        }
    }

    #[test]
    fn test_merge_peers_dedups_in_order() {
        let mut peers = vec![endpoint("https://a.example")];
        merge_peers(
            &mut peers,
            vec![
                endpoint("https://b.example"),
                endpoint("https://a.example"),
                endpoint("https://c.example"),
                endpoint("https://b.example"),
            ],
        );
        assert_eq!(
            peers,
            vec![
                endpoint("https://a.example"),
                endpoint("https://b.example"),
                endpoint("https://c.example"),
            ]
        );
    }

    #[test]
    fn test_node_error_kinds() {
        let err = node_error(NodeError {
            kind: INSUFFICIENT_SHARES.to_string(),
            message: None,
        });
        assert!(matches!(err, DecryptError::InsufficientShares(_)));

        let err = node_error(NodeError {
            kind: CONDITION_NOT_SATISFIED.to_string(),
            message: Some("now < 1700000000".to_string()),
        });
        assert!(matches!(
            err,
            DecryptError::ConditionNotSatisfied(ref m) if m.contains("1700000000")
        ));

        let err = node_error(NodeError {
            kind: "ritual_not_found".to_string(),
            message: None,
        });
        assert!(matches!(err, DecryptError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_discovery_fails_when_no_bootstrap_answers() -> anyhow::Result<()> {
        let network = HttpDecryptionNetwork::new(
            reqwest::Client::new(),
            "lynx",
            vec![endpoint("http://127.0.0.1:9"), endpoint("http://127.0.0.1:9/alt")],
        );
        let err = network.discover_peers().await.unwrap_err();
        assert!(matches!(err, DecryptError::Transport(ref m) if m.contains("none of 2")));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "talks to the public lynx network"]
    async fn test_discover_lynx_peers() -> anyhow::Result<()> {
        let network = HttpDecryptionNetwork::from_config(&NetworkConfig::default())?;
        assert!(network.discover_peers().await? >= 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_decrypt_without_peers_is_transport() {
        let network = HttpDecryptionNetwork::new(reqwest::Client::new(), "lynx", vec![]);
        let request = request();
        let err = network.threshold_decrypt(&request).await.unwrap_err();
        assert_eq!(err.disposition(), crate::Disposition::Retry);
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_leak_node_addresses() {
        let network = HttpDecryptionNetwork::new(
            reqwest::Client::new(),
            "lynx",
            vec![endpoint("http://127.0.0.1:9")],
        );
        let err = network
            .post_decrypt(&endpoint("http://127.0.0.1:9"), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, DecryptError::Transport(_)));
        assert!(!err.to_string().contains("127.0.0.1"));
    }

    fn network_with_peers(peers: Vec<Endpoint>) -> HttpDecryptionNetwork {
        HttpDecryptionNetwork {
            peers: RwLock::new(peers),
            ..HttpDecryptionNetwork::new(reqwest::Client::new(), "lynx", vec![])
        }
    }

    const INSUFFICIENT: &str = r#"{"error":{"kind":"insufficient_shares","message":"2 of 5"}}"#;

    #[tokio::test]
    async fn test_node_error_body_is_typed() -> anyhow::Result<()> {
        let node = StubServer::start(vec![
            StubResponse::new(400, INSUFFICIENT),
            StubResponse::new(
                403,
                r#"{"error":{"kind":"condition_not_satisfied","message":"too early"}}"#,
            ),
        ])
        .await?;
        let network = network_with_peers(vec![]);
        let peer = endpoint(&node.url("/node"));

        let err = network.post_decrypt(&peer, &request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::InsufficientShares(ref m) if m == "2 of 5"));

        let err = network.post_decrypt(&peer, &request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::ConditionNotSatisfied(ref m) if m == "too early"));

        let requests = node.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/node/decrypt");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body)?;
        assert_eq!(body["domain"], "lynx");
        assert_eq!(body["ciphertext"], "01");
        Ok(())
    }

    #[tokio::test]
    async fn test_untyped_answers() -> anyhow::Result<()> {
        let node = StubServer::start(vec![
            StubResponse::new(502, "<html>bad gateway</html>"),
            StubResponse::ok("{}"),
            StubResponse::new(404, "<html>not found</html>"),
        ])
        .await?;
        let network = network_with_peers(vec![]);
        let peer = endpoint(&node.url(""));

        let err = network.post_decrypt(&peer, &request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::Transport(ref m) if m.contains("502")));

        let err = network.post_decrypt(&peer, &request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::Malformed(ref m) if m.contains("without plaintext")));

        let err = network.post_decrypt(&peer, &request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::Malformed(ref m) if m.contains("404")));
        Ok(())
    }

    #[tokio::test]
    async fn test_unavailable_node_rotates_to_next_peer() -> anyhow::Result<()> {
        let down = StubServer::start(vec![StubResponse::new(503, "overloaded")]).await?;
        let up = StubServer::start(vec![StubResponse::ok(r#"{"plaintext":"796573"}"#)]).await?;
        let network = network_with_peers(vec![
            endpoint("http://127.0.0.1:9"),
            endpoint(&down.url("")),
            endpoint(&up.url("")),
        ]);

        let plaintext = network.threshold_decrypt(&request()).await?;
        assert_eq!(plaintext, b"yes".to_vec());
        assert_eq!(down.requests().len(), 1);
        assert_eq!(up.requests().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_typed_error_does_not_rotate() -> anyhow::Result<()> {
        let first = StubServer::start(vec![StubResponse::new(400, INSUFFICIENT)]).await?;
        let second = StubServer::start(vec![StubResponse::ok(r#"{"plaintext":"796573"}"#)]).await?;
        let network = network_with_peers(vec![endpoint(&first.url("")), endpoint(&second.url(""))]);

        let err = network.threshold_decrypt(&request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::InsufficientShares(_)));
        assert!(second.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_every_peer_unavailable_is_transport() -> anyhow::Result<()> {
        let a = StubServer::start(vec![StubResponse::new(500, "")]).await?;
        let b = StubServer::start(vec![StubResponse::new(504, "")]).await?;
        let network = network_with_peers(vec![endpoint(&a.url("")), endpoint(&b.url(""))]);

        let err = network.threshold_decrypt(&request()).await.unwrap_err();
        assert!(matches!(err, DecryptError::Transport(ref m) if m.contains("all 2")));
        Ok(())
    }

    #[tokio::test]
    async fn test_discovery_merges_bootstrap_and_advertised_nodes() -> anyhow::Result<()> {
        let bootstrap = StubServer::start(vec![StubResponse::ok(
            r#"{"nodes":["https://n1.example","not a url","https://n2.example"]}"#,
        )])
        .await?;
        let network = HttpDecryptionNetwork::new(
            reqwest::Client::new(),
            "lynx",
            vec![endpoint(&bootstrap.url("")), endpoint("http://127.0.0.1:9")],
        );

        assert_eq!(network.discover_peers().await?, 3);
        assert_eq!(
            *network.peers.read().await,
            vec![
                endpoint(&bootstrap.url("")),
                endpoint("https://n1.example"),
                endpoint("https://n2.example"),
            ]
        );
        assert_eq!(bootstrap.requests()[0].path, "/known_nodes?domain=lynx");
        Ok(())
    }
}
