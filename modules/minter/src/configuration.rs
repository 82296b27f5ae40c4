use std::path::PathBuf;

use anyhow::Result;
use config::Config;
use minter_common::{AssetName, configuration::Network};
use serde::Deserialize;

/// Minter module configuration (from TOML)
#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MinterConfig {
    pub network: Network,
    pub data_dir: PathBuf,

    #[serde(default)]
    pub blockfrost_url: Option<String>,
    /// Blockfrost project id; the alias is the key an environment variable produces
    #[serde(alias = "blockfrost_api_key")]
    pub blockfrost_api_key: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,

    pub asset_name: String,
    pub transfer_amount: u64,
    pub fee_estimation_signers: usize,
    pub allow_deposit_shortfall: bool,

    pub only_base_currency: bool,
    pub allow_datum_hash: bool,

    pub command_topic: String,
    pub mintingtx_rest_topic: String,
    pub submit_rest_topic: String,
    pub alreadyminted_rest_topic: String,
}

impl MinterConfig {
    pub fn try_load(config: &Config) -> Result<Self> {
        let full = Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config.default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config.clone())
            .build()?;
        Ok(full.try_deserialize()?)
    }

    pub fn blockfrost_url(&self) -> String {
        match &self.blockfrost_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self.network.default_blockfrost_url().to_string(),
        }
    }

    pub fn asset_name(&self) -> Result<AssetName> {
        Ok(AssetName::new(self.asset_name.as_bytes())?)
    }
}
