// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;
use thiserror::Error;

/// The compressed proof could not be turned back into a proof
#[derive(Error, Debug)]
pub enum ProofDecodeError {
    #[error("Proof envelope is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("Proof envelope has an unknown magic prefix")]
    BadMagic,

    #[error("Proof envelope version {0} is not supported")]
    UnsupportedVersion(u8),

    #[error("Proof payload does not match its digest")]
    DigestMismatch,

    #[error("Could not decompress proof payload: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("Could not deserialize proof: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Failure of the underlying proof system
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Proof verifier '{}' is not installed", .0.display())]
    NotInstalled(PathBuf),

    #[error("Could not run proof verifier: {0}")]
    Io(#[from] std::io::Error),

    #[error("Proof verifier exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Proof verifier printed an unexpected verdict: {0}")]
    InvalidOutput(String),
}

/// The proof decoded but could not be checked against the requested claim
#[derive(Error, Debug)]
pub enum ProofVerificationError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Proof is for group '{found}' but group '{expected}' was requested")]
    ClaimMismatch { expected: String, found: String },

    #[error("Proof is for application '{found}' but application '{expected}' was requested")]
    AppMismatch { expected: String, found: String },
}

#[derive(Error, Debug)]
pub enum EligibilityError {
    #[error(transparent)]
    Decode(#[from] ProofDecodeError),

    #[error(transparent)]
    Verification(#[from] ProofVerificationError),
}
