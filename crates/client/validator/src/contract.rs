use crate::error::ValidatorError;
use crate::manifest::ContractType;
use crate::simulate::{CallSimulator, SimulatedCall};
use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::{Address, Bytes};
use apepay_convert::{ConversionError, ToAddress};
#[cfg(test)]
use mockall::automock;
use std::fmt;
use std::sync::Arc;

/// A live handle on a deployed contract: an address paired with the interface it implements.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    contract_type: Arc<ContractType>,
    simulator: Arc<dyn CallSimulator>,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("contract_type", &self.contract_type.name)
            .finish_non_exhaustive()
    }
}

impl ContractHandle {
    pub fn new(address: Address, contract_type: Arc<ContractType>, simulator: Arc<dyn CallSimulator>) -> Self {
        Self { address, contract_type, simulator }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn contract_type(&self) -> &ContractType {
        &self.contract_type
    }

    /// Simulates `method` as if it was sent by `sender`, returning the raw return data.
    pub async fn simulate(&self, method: &str, sender: Address, args: &[DynSolValue]) -> Result<Bytes, ValidatorError> {
        let overloads: Vec<_> = self.contract_type.methods(method).collect();
        self.simulate_overloads(method, &overloads, sender, args).await
    }

    /// Same as [`Self::simulate`], restricted to the non-view methods of the contract.
    pub async fn simulate_mutable(
        &self,
        method: &str,
        sender: Address,
        args: &[DynSolValue],
    ) -> Result<Bytes, ValidatorError> {
        let overloads: Vec<_> = self.contract_type.mutable_methods(method).collect();
        self.simulate_overloads(method, &overloads, sender, args).await
    }

    async fn simulate_overloads(
        &self,
        method: &str,
        overloads: &[&Function],
        sender: Address,
        args: &[DynSolValue],
    ) -> Result<Bytes, ValidatorError> {
        let input = encode_input(overloads, args).ok_or_else(|| ValidatorError::UnknownMethod {
            contract: self.contract_type.name.clone(),
            method: method.to_string(),
        })??;

        tracing::debug!("Simulating {}.{} at {} from {}", self.contract_type.name, method, self.address, sender);
        self.simulator.simulate(SimulatedCall { to: self.address, from: sender, input: input.into() }).await
    }
}

/// Encodes `args` against the first overload accepting them.
///
/// Returns `None` when there is no overload at all, and the last encoding error when none matches.
fn encode_input(overloads: &[&Function], args: &[DynSolValue]) -> Option<Result<Vec<u8>, alloy::dyn_abi::Error>> {
    let mut last = None;
    for function in overloads {
        match function.abi_encode_input(args) {
            Ok(input) => return Some(Ok(input)),
            Err(e) => last = Some(Err(e)),
        }
    }
    last
}

impl ToAddress for ContractHandle {
    fn to_address(&self) -> Result<Address, ConversionError> {
        Ok(self.address)
    }
}

/// Resolves live contract handles from an address and a contract type.
#[cfg_attr(test, automock)]
pub trait ContractRegistry: Send + Sync {
    fn instance_at(&self, address: Address, contract_type: &Arc<ContractType>)
        -> Result<ContractHandle, ValidatorError>;
}

/// Registry binding every handle it hands out to one [`CallSimulator`].
#[derive(Clone)]
pub struct ManifestRegistry {
    simulator: Arc<dyn CallSimulator>,
}

impl ManifestRegistry {
    pub fn new(simulator: Arc<dyn CallSimulator>) -> Self {
        Self { simulator }
    }
}

impl ContractRegistry for ManifestRegistry {
    fn instance_at(
        &self,
        address: Address,
        contract_type: &Arc<ContractType>,
    ) -> Result<ContractHandle, ValidatorError> {
        tracing::trace!("Resolving {} at {}", contract_type.name, address);
        Ok(ContractHandle::new(address, Arc::clone(contract_type), Arc::clone(&self.simulator)))
    }
}
