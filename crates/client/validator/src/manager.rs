use crate::config::ValidatorClientConfig;
use crate::contract::{ContractRegistry, ManifestRegistry};
use crate::error::ValidatorError;
use crate::simulate::RpcCallSimulator;
use crate::validator::Validator;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use apepay_convert::{convert_address, ToAddress};
use futures::future::try_join_all;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// The stream manager context validator checks are issued from.
///
/// Holds the manager's own address, used as the sender of every simulated `validate` call, and
/// the registry validators resolve their contracts through.
pub struct StreamManager {
    address: Address,
    registry: Arc<dyn ContractRegistry>,
}

impl fmt::Debug for StreamManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamManager").field("address", &self.address).finish_non_exhaustive()
    }
}

impl StreamManager {
    pub fn new(address: impl ToAddress, registry: Arc<dyn ContractRegistry>) -> Result<Self, ValidatorError> {
        Ok(Self { address: convert_address(address)?, registry })
    }

    /// Connects to the configured RPC node. No request is made until a validator is called.
    pub fn connect(config: &ValidatorClientConfig) -> Result<Arc<Self>, ValidatorError> {
        tracing::debug!("Connecting stream manager {} to {}", config.stream_manager, config.rpc_url);
        let simulator = Arc::new(RpcCallSimulator::new(config.rpc_url.clone()));
        let registry = Arc::new(ManifestRegistry::new(simulator));
        Ok(Arc::new(Self::new(config.stream_manager, registry)?))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn registry(&self) -> &Arc<dyn ContractRegistry> {
        &self.registry
    }

    pub fn validator(self: &Arc<Self>, address: impl ToAddress) -> Result<Validator, ValidatorError> {
        Validator::new(address, Arc::clone(self))
    }

    /// Builds validators for `addresses`, deduplicated and sorted by address.
    pub fn validators<I>(self: &Arc<Self>, addresses: I) -> Result<Vec<Validator>, ValidatorError>
    where
        I: IntoIterator,
        I::Item: ToAddress,
    {
        let unique = addresses.into_iter().map(|address| self.validator(address)).collect::<Result<BTreeSet<_>, _>>()?;
        Ok(unique.into_iter().collect())
    }

    /// Returns true only if every validator approves `args`.
    ///
    /// The checks run concurrently. The first error that is not a rejection is returned.
    pub async fn check_validators(
        &self,
        validators: &[Validator],
        args: &[DynSolValue],
    ) -> Result<bool, ValidatorError> {
        let approvals = try_join_all(validators.iter().map(|validator| validator.call(args))).await?;
        let approved = approvals.iter().all(|approved| *approved);
        tracing::debug!(
            "{}/{} validators approved for stream manager {}",
            approvals.iter().filter(|approved| **approved).count(),
            approvals.len(),
            self.address
        );
        Ok(approved)
    }
}
