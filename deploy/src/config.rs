use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use url::Url;

use crate::utils::decode_hex;

/// Contract deployed when neither the config nor the command line names one.
pub const DEFAULT_CONTRACT: &str = "MITCoin";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Compiler version the artifacts are expected to be built with.
    pub solidity: String,
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Directory the config was loaded from, used to resolve relative paths.
    #[serde(skip)]
    root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub url: String,
    /// Hex encoded private keys; the first one deploys.
    #[serde(default)]
    pub accounts: Vec<String>,
    pub chain_id: Option<u64>,
    pub gas_price: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub artifacts: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("artifacts"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_contract")]
    pub contract: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub receipt: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            contract: default_contract(),
            args: Vec::new(),
            receipt: false,
        }
    }
}

fn default_contract() -> String {
    DEFAULT_CONTRACT.to_string()
}

impl Config {
    /// Load and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.networks.contains_key(&self.default_network) {
            bail!(
                "default network `{}` is not defined in [networks]",
                self.default_network
            );
        }
        for (name, network) in &self.networks {
            let url = Url::parse(&network.url)
                .with_context(|| format!("network `{name}`: invalid url `{}`", network.url))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("network `{name}`: url must be http(s), got `{}`", network.url);
            }
            for (index, key) in network.accounts.iter().enumerate() {
                let bytes = decode_hex(key)
                    .with_context(|| format!("network `{name}`: account #{index} is not hex"))?;
                if bytes.len() != 32 {
                    bail!(
                        "network `{name}`: account #{index} must be 32 bytes, got {}",
                        bytes.len()
                    );
                }
            }
        }
        Ok(())
    }

    /// Select `name`, or the default network when `name` is `None`.
    pub fn network<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a NetworkConfig)> {
        let name = name.unwrap_or(&self.default_network);
        self.networks
            .get_key_value(name)
            .map(|(name, network)| (name.as_str(), network))
            .ok_or_else(|| {
                let known = self.networks.keys().cloned().collect::<Vec<_>>();
                anyhow!("unknown network `{name}`, known networks: {}", known.join(", "))
            })
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(&self.paths.artifacts)
    }
}
