// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use electora_conditions::ReleaseCondition;
use electora_config::CoordinatorConfig;
use electora_utils::HexBytes;
use serde::{Deserialize, Serialize};

/// Body of a decryption request as sent to a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecryptionRequest {
    pub domain: String,
    pub ritual_id: u32,
    pub ciphertext: HexBytes,
    pub conditions: ReleaseCondition,
    pub coordinator: CoordinatorConfig,
}

/// Body of a node's answer. Exactly one of the fields is expected to be set.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DecryptionResponse {
    #[serde(default)]
    pub plaintext: Option<HexBytes>,
    #[serde(default)]
    pub error: Option<NodeError>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NodeError {
    pub kind: String,
    #[serde(default)]
    pub message: Option<String>,
}

pub const INSUFFICIENT_SHARES: &str = "insufficient_shares";
pub const CONDITION_NOT_SATISFIED: &str = "condition_not_satisfied";

/// Response of `GET /known_nodes`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KnownNodes {
    pub nodes: Vec<String>,
}
