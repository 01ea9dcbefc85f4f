// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Endpoint, EndpointAuth};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOMAIN: &str = "lynx";
pub const DEFAULT_BOOTSTRAP_NODE: &str = "https://lynx.nucypher.network:9151";
pub const DEFAULT_COORDINATOR_RPC: &str = "https://rpc-amoy.polygon.technology";
pub const DEFAULT_COORDINATOR_CHAIN_ID: u64 = 80002;

/// Where the decryption network's coordinator contract lives
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CoordinatorConfig {
    /// Chain id the coordinator is deployed on. Release conditions are evaluated against it.
    pub chain_id: u64,
    /// RPC endpoint for the coordinator chain, forwarded to nodes with every request
    pub rpc_url: Endpoint,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_COORDINATOR_CHAIN_ID,
            rpc_url: Endpoint::parse(DEFAULT_COORDINATOR_RPC)
                .expect("default coordinator rpc is a valid endpoint"),
        }
    }
}

/// Bounded exponential backoff applied to transport failures
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 500,
        }
    }
}

/// Threshold decryption network settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Name of the network domain eg. "lynx"
    pub domain: String,
    /// Nodes used to discover the rest of the network
    pub bootstrap_nodes: Vec<Endpoint>,
    pub coordinator: CoordinatorConfig,
    /// The key generation ritual votes were encrypted under
    pub ritual_id: u32,
    #[serde(default)]
    pub auth: EndpointAuth,
    pub retry: RetryPolicy,
    /// Per request timeout when talking to nodes
    pub request_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            bootstrap_nodes: vec![Endpoint::parse(DEFAULT_BOOTSTRAP_NODE)
                .expect("default bootstrap node is a valid endpoint")],
            coordinator: CoordinatorConfig::default(),
            ritual_id: 0,
            auth: EndpointAuth::None,
            retry: RetryPolicy::default(),
            request_timeout_ms: 30_000,
        }
    }
}
