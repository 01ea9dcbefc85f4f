// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;

/// What a caller should do after a failed decryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Count the vote as failed and carry on with the rest
    Skip,
    /// Try the same request again
    Retry,
    /// Stop the whole run
    Abort,
}

#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("Not enough decryption shares were returned: {0}")]
    InsufficientShares(String),

    #[error("Release condition is not satisfied yet: {0}")]
    ConditionNotSatisfied(String),

    #[error("Could not reach the decryption network: {0}")]
    Transport(String),

    #[error("Decryption network sent an unexpected response: {0}")]
    Malformed(String),

    #[error("Decrypted plaintext is not valid utf-8")]
    InvalidPlaintext(#[from] std::string::FromUtf8Error),
}

impl DecryptError {
    pub fn disposition(&self) -> Disposition {
        match self {
            DecryptError::InsufficientShares(_) => Disposition::Skip,
            DecryptError::Transport(_) => Disposition::Retry,
            DecryptError::ConditionNotSatisfied(_)
            | DecryptError::Malformed(_)
            | DecryptError::InvalidPlaintext(_) => Disposition::Abort,
        }
    }

    /// Build a transport error without leaking the address of the node that failed
    pub fn transport(err: reqwest::Error) -> Self {
        DecryptError::Transport(err.without_url().to_string())
    }
}
