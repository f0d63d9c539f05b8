//! ApePay validator client. This crate wraps the Validator contracts a stream manager consults
//! before a payment stream is created, and simulates their `validate` check on chain.
//!
//! # Overview
//!
//! A [`Validator`] is an on-chain address bound to the [`StreamManager`] it is used from. The
//! address is normalized once, through [`apepay_convert`], and validators are identified by it
//! alone: they compare, hash and sort by address so that lists of validators can be deduplicated
//! and displayed in a stable order.
//!
//! # Contract resolution
//!
//! The interfaces the toolkit knows about live in a bundled ethPM style [`Manifest`]. A live
//! [`ContractHandle`] is obtained by pairing an address with one of its [`ContractType`]s through
//! a [`ContractRegistry`]. [`Validator::contract`] resolves a fresh handle on every access.
//!
//! # Simulated checks
//!
//! [`Validator::call`] encodes its arguments against the manifest's `validate` method and hands
//! the result to a [`CallSimulator`], with the stream manager's address as the sender. In
//! production this is an `eth_call` issued by [`RpcCallSimulator`]; nothing is signed or sent.
//!
//! - The call succeeds: the validator approves, `Ok(true)`.
//! - The contract reverts: the validator rejects, `Ok(false)`.
//! - Anything else (RPC failure, arguments not matching the ABI, ...) is returned as an error.
//!
//! [`StreamManager::check_validators`] runs this for a whole set of validators at once.

mod config;
mod contract;
mod error;
mod manager;
pub mod manifest;
mod simulate;
mod validator;

pub use config::ValidatorClientConfig;
pub use contract::{ContractHandle, ContractRegistry, ManifestRegistry};
pub use error::{ConfigError, ContractLogicError, ManifestError, ValidatorError};
pub use manager::StreamManager;
pub use manifest::{ContractType, Manifest, MANIFEST};
pub use simulate::{classify_rpc_error, CallSimulator, RpcCallSimulator, SimulatedCall};
pub use validator::{ValidateRequest, Validator};
