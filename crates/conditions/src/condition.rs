// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};

/// Version of the condition language nodes are expected to understand
pub const CONDITION_LINGO_VERSION: &str = "1.0.0";

/// What the threshold value is measured against
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
pub enum ReleaseMethod {
    /// Unix timestamp of the coordinator chain's latest block
    #[default]
    #[serde(rename = "timelock")]
    Timelock,
    /// Height of the coordinator chain
    #[serde(rename = "blockheight")]
    BlockHeight,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Comparator {
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Time,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ReturnValueTest {
    pub comparator: Comparator,
    pub value: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TimeCondition {
    pub condition_type: ConditionType,
    pub method: ReleaseMethod,
    pub chain: u64,
    pub return_value_test: ReturnValueTest,
}

/// Chain the condition is evaluated on and how its threshold is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainContext {
    pub chain_id: u64,
    pub method: ReleaseMethod,
}

impl ChainContext {
    pub fn new(chain_id: u64, method: ReleaseMethod) -> Self {
        Self { chain_id, method }
    }
}

/// A versioned release condition as sent to the decryption network
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ReleaseCondition {
    version: String,
    condition: TimeCondition,
}

/// Build the condition that releases an election's votes once `threshold` is reached.
pub fn build(threshold: u64, context: &ChainContext) -> ReleaseCondition {
    ReleaseCondition {
        version: CONDITION_LINGO_VERSION.to_string(),
        condition: TimeCondition {
            condition_type: ConditionType::Time,
            method: context.method,
            chain: context.chain_id,
            return_value_test: ReturnValueTest {
                comparator: Comparator::GreaterThanOrEqual,
                value: threshold,
            },
        },
    }
}

impl ReleaseCondition {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn method(&self) -> ReleaseMethod {
        self.condition.method
    }

    pub fn chain_id(&self) -> u64 {
        self.condition.chain
    }

    pub fn threshold(&self) -> u64 {
        self.condition.return_value_test.value
    }

    /// Evaluate the predicate against an observed clock value or height
    pub fn is_satisfied_by(&self, current: u64) -> bool {
        match self.condition.return_value_test.comparator {
            Comparator::GreaterThanOrEqual => current >= self.threshold(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AMOY: u64 = 80002;

    #[test]
    fn test_build_is_deterministic() {
        let ctx = ChainContext::new(AMOY, ReleaseMethod::Timelock);
        let a = build(1_700_000_000, &ctx);
        let b = build(1_700_000_000, &ctx);
        assert_eq!(a, b);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
        assert_ne!(a, build(1_700_000_001, &ctx));
    }

    #[test]
    fn test_wire_format() {
        let condition = build(1_700_000_000, &ChainContext::new(AMOY, ReleaseMethod::Timelock));
        assert_eq!(
            condition.to_json().unwrap(),
            json!({
                "version": "1.0.0",
                "condition": {
                    "conditionType": "time",
                    "method": "timelock",
                    "chain": 80002,
                    "returnValueTest": { "comparator": ">=", "value": 1700000000u64 }
                }
            })
        );

        let parsed: ReleaseCondition =
            serde_json::from_value(condition.to_json().unwrap()).unwrap();
        assert_eq!(parsed, condition);
    }

    #[test]
    fn test_block_height_method() {
        let condition = build(5_000_000, &ChainContext::new(1, ReleaseMethod::BlockHeight));
        assert_eq!(condition.method(), ReleaseMethod::BlockHeight);
        assert_eq!(condition.chain_id(), 1);
        assert_eq!(condition.to_json().unwrap()["condition"]["method"], "blockheight");
    }

    #[test]
    fn test_satisfied_only_from_threshold_on() {
        let condition = build(100, &ChainContext::new(AMOY, ReleaseMethod::Timelock));
        assert!(!condition.is_satisfied_by(0));
        assert!(!condition.is_satisfied_by(99));
        assert!(condition.is_satisfied_by(100));
        assert!(condition.is_satisfied_by(u64::MAX));
    }
}
