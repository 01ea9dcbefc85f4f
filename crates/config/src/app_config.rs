// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use crate::yaml::load_yaml_with_env;
use crate::{Endpoint, EndpointAuth, NetworkConfig};
use anyhow::{Context, Result};
use electora_conditions::ReleaseMethod;
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_TAG_NAME: &str = "Electora-Election-Id";
pub const DEFAULT_INDEX_URL: &str = "https://arweave.net/graphql";
pub const DEFAULT_BLOB_URL: &str = "https://arweave.net";

/// How the blob store encodes ciphertext bodies
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlobEncoding {
    #[default]
    Hex,
    Raw,
}

/// Transaction index (GraphQL tag search) settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    pub url: Endpoint,
    /// Tag every ballot transaction carries with the election id as its value
    pub tag_name: String,
    /// Edges requested per page
    pub page_size: u32,
    pub auth: EndpointAuth,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: Endpoint::parse(DEFAULT_INDEX_URL).expect("default index url is valid"),
            tag_name: DEFAULT_TAG_NAME.to_string(),
            page_size: 100,
            auth: EndpointAuth::None,
        }
    }
}

/// Content addressed blob store settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct BlobConfig {
    pub url: Endpoint,
    pub encoding: BlobEncoding,
    pub auth: EndpointAuth,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            url: Endpoint::parse(DEFAULT_BLOB_URL).expect("default blob url is valid"),
            encoding: BlobEncoding::Hex,
            auth: EndpointAuth::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    /// Maximum votes fetched and decrypted at the same time
    pub concurrency: usize,
    /// Abandon a run that takes longer than this
    pub deadline_secs: Option<u64>,
    pub release_method: ReleaseMethod,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            deadline_secs: None,
            release_method: ReleaseMethod::Timelock,
        }
    }
}

/// External proof verifier invoked as a subprocess
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct VerifierConfig {
    pub binary: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct EligibilityConfig {
    pub app_id: Option<String>,
    pub verifier: Option<VerifierConfig>,
}

/// The config actually used throughout the app
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub index: IndexConfig,
    pub blobs: BlobConfig,
    pub network: NetworkConfig,
    pub tally: TallyConfig,
    pub eligibility: EligibilityConfig,
    /// The file this configuration was read from
    #[serde(skip)]
    config_file: Option<PathBuf>,
}

impl AppConfig {
    /// Layer a yaml document over the defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::string(yaml))
            .extract()
            .context("Could not parse configuration")?;
        Ok(config)
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Resolve a path against the directory holding the configuration file
    pub fn relative_to_config(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_file.as_ref().and_then(|f| f.parent()) {
            Some(dir) => path_clean::clean(dir.join(path)),
            None => path.to_path_buf(),
        }
    }

    /// The verifier binary with relative paths anchored to the config file. A bare program
    /// name is left alone so it is looked up on `PATH`.
    pub fn verifier(&self) -> Option<VerifierConfig> {
        self.eligibility
            .verifier
            .as_ref()
            .map(|verifier| VerifierConfig {
                binary: if verifier.binary.components().count() > 1 {
                    self.relative_to_config(&verifier.binary)
                } else {
                    verifier.binary.clone()
                },
                args: verifier.args.clone(),
            })
    }
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Electora requires an OS that can provide a config dir. See https://docs.rs/dirs for more information.")?
            .join("electora"))
    }
}

/// Load the config at the config_file or the default location if not provided
pub fn load_config(config_file: Option<String>) -> Result<AppConfig> {
    let cli_file = config_file.map(PathBuf::from);
    let resolved = resolve_config_path(
        find_in_parent,
        &env::current_dir()?,
        &OsDirs::config_dir()?,
        cli_file.as_deref(),
    );
    debug!("Reading configuration from {}", resolved.display());

    let loaded_yaml = load_yaml_with_env(&resolved).context("Configuration file not found")?;
    let mut config = AppConfig::from_yaml_str(&loaded_yaml)?;
    config.config_file = Some(resolved);
    Ok(config)
}
