use alloy::primitives::Bytes;
use alloy::transports::TransportError;
use apepay_convert::ConversionError;
use thiserror::Error;

/// A controlled revert raised by the contract's own logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractLogicError {
    /// Decoded revert reason, when the node returned one.
    pub reason: Option<String>,
    /// Raw revert data returned by the node.
    pub data: Option<Bytes>,
}

impl std::fmt::Display for ContractLogicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "Contract logic error: {reason}"),
            None => write!(f, "Contract logic error: reverted without a reason"),
        }
    }
}

impl std::error::Error for ContractLogicError {}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to decode manifest from JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unsupported manifest version {0}, expected ethpm/3")]
    UnsupportedVersion(String),
    #[error("Contract type {0} has no ABI")]
    MissingAbi(String),
}

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Address conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Contract type not found in manifest: {0}")]
    UnknownContractType(String),

    #[error("Method `{method}` not found on contract type {contract}")]
    UnknownMethod { contract: String, method: String },

    #[error("ABI encoding error: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error(transparent)]
    ContractLogic(#[from] ContractLogicError),

    #[error("Ethereum RPC error: {0}")]
    Rpc(#[from] TransportError),
}

impl ValidatorError {
    /// Returns true if the contract itself rejected the call.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::ContractLogic(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config from file: {0}")]
    ConfigReadFromFile(#[from] std::io::Error),
    #[error("Failed to decode from JSON: {0}")]
    ConfigDecodeFromJson(#[from] serde_json::Error),
}
