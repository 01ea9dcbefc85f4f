// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// An http(s) service location. Validated on parse so downstream clients never have to.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).context("Invalid URL format")?;
        match parsed.scheme() {
            "http" | "https" => (),
            other => bail!("Invalid protocol '{other}'. Expected: http://, https://"),
        }

        if parsed.host_str().is_none() {
            bail!("URL must contain a host");
        }

        Ok(Endpoint { url: parsed })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Append path segments to the endpoint, keeping any base path the endpoint already has.
    /// `https://arweave.net/gw` joined with `abc` yields `https://arweave.net/gw/abc`.
    pub fn join(&self, segment: &str) -> Result<Url> {
        let mut url = self.url.clone();
        {
            let Ok(mut segments) = url.path_segments_mut() else {
                bail!("Endpoint '{}' cannot be a base URL", self.url);
            };
            segments.pop_if_empty();
            for part in segment.split('/').filter(|p| !p.is_empty()) {
                segments.push(part);
            }
        }
        Ok(url)
    }
}

impl FromStr for Endpoint {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({})", self.url)
    }
}

impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.url.as_str())
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Endpoint::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Credentials attached to requests against an endpoint
#[derive(Debug, Hash, Eq, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(tag = "type", content = "credentials")]
pub enum EndpointAuth {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer(String),
}
