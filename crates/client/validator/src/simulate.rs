use crate::error::{ContractLogicError, ValidatorError};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder, ReqwestProvider};
use alloy::rpc::json_rpc::ErrorPayload;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{decode_revert_reason, Revert, SolError};
use alloy::transports::TransportError;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use url::Url;

/// JSON-RPC error code geth and anvil use for `execution reverted`.
const REVERT_ERROR_CODE: i64 = 3;
const REVERT_MESSAGE_PREFIX: &str = "execution reverted: ";

/// A fully encoded read-style call, issued as if sent by `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedCall {
    pub to: Address,
    pub from: Address,
    pub input: Bytes,
}

/// Simulates contract calls without broadcasting anything.
///
/// Implementations must report a revert raised by the contract as
/// [`ValidatorError::ContractLogic`] and every other failure as some other variant.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CallSimulator: Send + Sync {
    async fn simulate(&self, call: SimulatedCall) -> Result<Bytes, ValidatorError>;
}

/// [`CallSimulator`] backed by `eth_call` on an Ethereum JSON-RPC node.
#[derive(Clone)]
pub struct RpcCallSimulator {
    provider: Arc<ReqwestProvider>,
}

impl RpcCallSimulator {
    pub fn new(url: Url) -> Self {
        Self { provider: Arc::new(ProviderBuilder::new().on_http(url)) }
    }
}

#[async_trait]
impl CallSimulator for RpcCallSimulator {
    async fn simulate(&self, call: SimulatedCall) -> Result<Bytes, ValidatorError> {
        tracing::trace!("eth_call to {} from {} ({} bytes of input)", call.to, call.from, call.input.len());
        let tx = TransactionRequest::default().with_from(call.from).with_to(call.to).with_input(call.input);
        self.provider.call(&tx).await.map_err(classify_rpc_error)
    }
}

/// Splits RPC failures into contract-logic rejections and everything else.
pub fn classify_rpc_error(err: TransportError) -> ValidatorError {
    let rejection = err.as_error_resp().filter(|payload| is_revert(payload)).map(ContractLogicError::from_payload);
    if let Some(rejection) = rejection {
        return rejection.into();
    }
    ValidatorError::Rpc(err)
}

fn is_revert(payload: &ErrorPayload) -> bool {
    payload.code == REVERT_ERROR_CODE || payload.message.to_lowercase().contains("revert")
}

impl ContractLogicError {
    fn from_payload(payload: &ErrorPayload) -> Self {
        let data = payload.data.as_ref().and_then(|raw| serde_json::from_str::<Bytes>(raw.get()).ok());
        let reason = data
            .as_ref()
            .and_then(|data| decode_reason(data))
            .or_else(|| payload.message.strip_prefix(REVERT_MESSAGE_PREFIX).map(str::to_string));
        Self { reason, data }
    }
}

fn decode_reason(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    match Revert::abi_decode(data, true) {
        Ok(revert) => Some(revert.reason),
        Err(_) => decode_revert_reason(data).filter(|reason| !reason.is_empty()),
    }
}
