// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use electora_config::AppConfig;
use electora_eligibility::{ClaimSpec, CommandBackend, EligibilityVerifier};
use std::path::Path;

pub async fn execute(
    config: &AppConfig,
    proof_file: &Path,
    group: String,
    app_id: Option<String>,
) -> Result<()> {
    let verifier_config = config
        .verifier()
        .context("No proof verifier configured. Set `eligibility.verifier.binary`")?;

    let compressed = tokio::fs::read(proof_file)
        .await
        .with_context(|| format!("Could not read proof from {}", proof_file.display()))?;

    let mut verifier = EligibilityVerifier::new(CommandBackend::from_config(&verifier_config));
    if let Some(app_id) = app_id.or_else(|| config.eligibility.app_id.clone()) {
        verifier = verifier.with_app_id(app_id);
    }

    let valid = verifier
        .verify(&compressed, &ClaimSpec::group(group))
        .await?;
    println!("{}", if valid { "valid" } else { "invalid" });
    Ok(())
}
