// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BackendError, VerifyRequest};
use async_trait::async_trait;
use electora_config::VerifierConfig;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// A proof system able to check membership proofs
#[async_trait]
pub trait ProofBackend: Send + Sync + 'static {
    async fn verify(&self, request: &VerifyRequest) -> Result<bool, BackendError>;
}

/// Runs an external verifier.
///
/// The request is written to the verifier's stdin as json and the verdict is read from its
/// stdout as a json boolean.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    binary: PathBuf,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new(binary: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
        }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(config.binary.clone(), config.args.clone())
    }
}

#[async_trait]
impl ProofBackend for CommandBackend {
    #[instrument(skip(self, request), fields(binary = %self.binary.display()))]
    async fn verify(&self, request: &VerifyRequest) -> Result<bool, BackendError> {
        let input = serde_json::to_vec(request)
            .map_err(|e| BackendError::InvalidOutput(format!("could not encode request: {e}")))?;

        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BackendError::NotInstalled(self.binary.clone()),
                _ => BackendError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(BackendError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("verifier answered {}", stdout.trim());
        serde_json::from_str::<bool>(stdout.trim())
            .map_err(|_| BackendError::InvalidOutput(stdout.trim().to_string()))
    }
}
