// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Result};
use std::{fs, path::Path};

/// Read a yaml file and substitute `${VAR}` references from the environment.
/// The io error is returned untouched so callers can detect a missing file.
pub fn load_yaml_with_env(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)?;
    let expanded = shellexpand::env(&raw).map_err(|e| {
        anyhow!(
            "Could not expand '{}' in {}: {}",
            e.var_name,
            path.display(),
            e.cause
        )
    })?;
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_expands_env_vars() {
        Jail::expect_with(|jail| {
            jail.set_env("ELECTORA_TEST_GATEWAY", "https://gw.example");
            jail.create_file("conf.yaml", "url: \"${ELECTORA_TEST_GATEWAY}/graphql\"")?;
            let out = load_yaml_with_env(&jail.directory().join("conf.yaml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(out, "url: \"https://gw.example/graphql\"");
            Ok(())
        });
    }

    #[test]
    fn test_missing_var_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("conf.yaml", "url: ${ELECTORA_DEFINITELY_UNSET_VAR}")?;
            let res = load_yaml_with_env(&jail.directory().join("conf.yaml"));
            assert!(res.is_err());
            Ok(())
        });
    }
}
