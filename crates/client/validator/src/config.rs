use crate::error::ConfigError;
use alloy::primitives::Address;
use apepay_convert::{convert_address, ConversionError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

fn parse_address(s: &str) -> Result<Address, ConversionError> {
    convert_address(s)
}

/// Parameters needed to run validator checks against a live chain.
#[derive(Clone, Debug, clap::Args, Deserialize, Serialize, PartialEq, Eq)]
pub struct ValidatorClientConfig {
    /// The Ethereum JSON-RPC endpoint used to simulate validator calls. Calls are only ever
    /// simulated with `eth_call`, nothing is signed or broadcast.
    #[clap(env = "APEPAY_RPC_URL", long, value_name = "ETHEREUM RPC URL")]
    pub rpc_url: Url,

    /// Address of the stream manager the validator checks are issued from.
    #[clap(env = "APEPAY_STREAM_MANAGER", long, value_parser = parse_address, value_name = "ADDRESS")]
    pub stream_manager: Address,
}

impl ValidatorClientConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
