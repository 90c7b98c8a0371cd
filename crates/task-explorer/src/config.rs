// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;

use alloy::primitives::Address;
use alloy_chains::NamedChain;
use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{
    deployments::{Deployment, DeploymentBuilder},
    errors::{impl_coded_debug, CodedError},
};

#[derive(Error)]
pub enum ConfigErr {
    #[error(
        "{code} No deployment configured for chain {chain}; set [deployment] in the config file",
        code = self.code(),
        chain = chain_label(.0)
    )]
    UnsupportedChain(u64),

    #[error("{code} Invalid deployment configuration: {0}", code = self.code())]
    InvalidDeployment(String),
}

impl_coded_debug!(ConfigErr);

fn chain_label(chain_id: &u64) -> String {
    match NamedChain::try_from(*chain_id) {
        Ok(chain) => format!("{chain} ({chain_id})"),
        Err(_) => chain_id.to_string(),
    }
}

impl CodedError for ConfigErr {
    fn code(&self) -> &str {
        match self {
            ConfigErr::UnsupportedChain(_) => "[TE-CON-300]",
            ConfigErr::InvalidDeployment(_) => "[TE-CON-301]",
        }
    }
}

/// `[deployment]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentOverrides {
    pub coprocessor_address: Option<Address>,
    pub callback_address: Option<Address>,
    pub genesis_block: Option<u64>,
    pub max_block_span: Option<u64>,
}

impl DeploymentOverrides {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Explorer configuration file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub rpc_url: Option<Url>,
    #[serde(default)]
    pub deployment: DeploymentOverrides,
}

impl Config {
    /// Load the config from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&data).context("Failed to parse toml file")
    }

    /// Build the [Deployment] to explore on `chain_id` from the `[deployment]` table.
    ///
    /// Both contract addresses are required; there is no built-in deployment to fall back on.
    pub fn resolve_deployment(&self, chain_id: u64) -> Result<Deployment, ConfigErr> {
        let overrides = &self.deployment;
        if overrides.is_empty() {
            return Err(ConfigErr::UnsupportedChain(chain_id));
        }

        let mut builder = DeploymentBuilder::default();
        if let Some(address) = overrides.coprocessor_address {
            builder.coprocessor_address(address);
        }
        if let Some(address) = overrides.callback_address {
            builder.callback_address(address);
        }
        if let Some(block) = overrides.genesis_block {
            builder.genesis_block(block);
        }
        if let Some(span) = overrides.max_block_span {
            builder.max_block_span(span);
        }

        builder.build().map_err(|err| ConfigErr::InvalidDeployment(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployments::DEFAULT_MAX_BLOCK_SPAN;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HOLESKY_ID: u64 = 17000;

    const CONFIG_FULL: &str = r#"
rpc_url = "http://localhost:8545"

[deployment]
coprocessor_address = "0x1111111111111111111111111111111111111111"
callback_address = "0x2222222222222222222222222222222222222222"
genesis_block = 1_000
max_block_span = 499
"#;

    const CONFIG_PARTIAL: &str = r#"
[deployment]
genesis_block = 3_000_000
"#;

    const BAD_CONFIG: &str = r#"
[deployment]
genesis_block = ?"#;

    fn write_config(data: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn full_config() {
        let file = write_config(CONFIG_FULL);
        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.rpc_url.as_ref().unwrap().as_str(), "http://localhost:8545/");

        let deployment = config.resolve_deployment(1).unwrap();
        assert_eq!(deployment.coprocessor_address, Address::repeat_byte(0x11));
        assert_eq!(deployment.callback_address, Address::repeat_byte(0x22));
        assert_eq!(deployment.genesis_block, 1_000);
        assert_eq!(deployment.max_block_span, 499);
    }

    #[tokio::test]
    async fn partial_deployment_is_invalid() {
        let file = write_config(CONFIG_PARTIAL);
        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.rpc_url, None);

        let err = config.resolve_deployment(HOLESKY_ID).unwrap_err();
        assert!(matches!(err, ConfigErr::InvalidDeployment(_)));
        assert!(err.to_string().contains("coprocessor_address"));
    }

    #[test]
    fn no_built_in_deployment() {
        let err = Config::default().resolve_deployment(HOLESKY_ID).unwrap_err();
        assert!(matches!(err, ConfigErr::UnsupportedChain(HOLESKY_ID)));
        assert_eq!(
            err.to_string(),
            "[TE-CON-300] No deployment configured for chain holesky (17000); \
             set [deployment] in the config file"
        );

        let err = Config::default().resolve_deployment(123_456_789).unwrap_err();
        assert!(err.to_string().contains("chain 123456789;"));
    }

    #[test]
    fn deployment_from_addresses_only() {
        let config = Config {
            rpc_url: None,
            deployment: DeploymentOverrides {
                coprocessor_address: Some(Address::repeat_byte(1)),
                ..Default::default()
            },
        };
        let err = config.resolve_deployment(1).unwrap_err();
        assert!(err.to_string().starts_with("[TE-CON-301]"));

        let config = Config {
            rpc_url: None,
            deployment: DeploymentOverrides {
                coprocessor_address: Some(Address::repeat_byte(1)),
                callback_address: Some(Address::repeat_byte(2)),
                ..Default::default()
            },
        };
        let deployment = config.resolve_deployment(1).unwrap();
        assert_eq!(deployment.genesis_block, 0);
        assert_eq!(deployment.max_block_span, DEFAULT_MAX_BLOCK_SPAN);
    }

    #[tokio::test]
    #[should_panic(expected = "Failed to parse toml file")]
    async fn bad_config() {
        let file = write_config(BAD_CONFIG);
        Config::load(file.path()).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected() {
        let file = write_config("rpc = \"http://localhost\"\n");
        assert!(Config::load(file.path()).await.is_err());
    }
}
