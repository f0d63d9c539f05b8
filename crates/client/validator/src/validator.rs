use crate::contract::ContractHandle;
use crate::error::ValidatorError;
use crate::manager::StreamManager;
use crate::manifest::MANIFEST;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, U256};
use apepay_convert::{convert_address, to_checksum, ConversionError, ToAddress};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const VALIDATE_METHOD: &str = "validate";

/// Arguments of the `validate` method of the bundled Validator interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateRequest {
    pub creator: Address,
    pub token: Address,
    pub amount_per_second: U256,
    pub reason: Bytes,
}

impl ValidateRequest {
    pub fn to_args(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.creator),
            DynSolValue::Address(self.token),
            DynSolValue::Uint(self.amount_per_second, 256),
            DynSolValue::Bytes(self.reason.to_vec()),
        ]
    }
}

/// Wrapper around a Validator contract that is connected with a specific stream manager on chain.
///
/// Validators are identified by their address alone: two validators bound to different managers
/// compare equal, hash the same, and sort by the numeric value of their address.
///
/// Only validators and contract handles can be compared with a validator:
///
/// ```compile_fail
/// # use apepay_validator::Validator;
/// fn is_one(validator: &Validator) -> bool {
///     *validator == 1u64
/// }
/// ```
#[derive(Clone)]
pub struct Validator {
    address: Address,
    manager: Arc<StreamManager>,
}

impl Validator {
    /// Builds a validator from anything that converts to an address, another [`Validator`] included.
    pub fn new(address: impl ToAddress, manager: Arc<StreamManager>) -> Result<Self, ValidatorError> {
        Ok(Self { address: convert_address(address)?, manager })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn manager(&self) -> &Arc<StreamManager> {
        &self.manager
    }

    /// Resolves a live handle on the validator contract. This is not cached.
    pub fn contract(&self) -> Result<ContractHandle, ValidatorError> {
        self.manager.registry().instance_at(self.address, &MANIFEST.validator()?)
    }

    /// Simulates `validate(args)` as if it was called by the stream manager.
    ///
    /// Returns `Ok(false)` when the validator contract reverts. Any other failure is returned as is.
    pub async fn call(&self, args: &[DynSolValue]) -> Result<bool, ValidatorError> {
        // A validator can be connected to more than one stream manager, the sender is what tells them apart.
        match self.contract()?.simulate_mutable(VALIDATE_METHOD, self.manager.address(), args).await {
            Ok(_) => Ok(true),
            Err(ValidatorError::ContractLogic(err)) => {
                tracing::debug!("Validator {} rejected the call: {}", self, err);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn check(&self, request: &ValidateRequest) -> Result<bool, ValidatorError> {
        self.call(&request.to_args()).await
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_checksum(&self.address))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("address", &self.address).field("manager", &self.manager.address()).finish()
    }
}

impl ToAddress for Validator {
    fn to_address(&self) -> Result<Address, ConversionError> {
        Ok(self.address)
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Validator {}

impl PartialEq<ContractHandle> for Validator {
    fn eq(&self, other: &ContractHandle) -> bool {
        self.address == other.address()
    }
}

impl PartialEq<Validator> for ContractHandle {
    fn eq(&self, other: &Validator) -> bool {
        self.address() == other.address
    }
}

impl Hash for Validator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state)
    }
}

// Addresses are fixed-width big-endian, so byte order is the numeric order of the hex strings.
impl Ord for Validator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.address)
    }
}

impl PartialOrd for Validator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialOrd<ContractHandle> for Validator {
    fn partial_cmp(&self, other: &ContractHandle) -> Option<Ordering> {
        Some(self.address.cmp(&other.address()))
    }
}

impl PartialOrd<Validator> for ContractHandle {
    fn partial_cmp(&self, other: &Validator) -> Option<Ordering> {
        Some(self.address().cmp(&other.address))
    }
}
