//! Conversion of loosely typed address inputs into the canonical [`Address`] type.
//!
//! Everything that names an account on chain (hex strings from a config file, raw 20 byte
//! values, ABI encoded words, integers) goes through [`ToAddress`] before it is stored.
//! Mixed case hex strings are checked against their EIP-55 checksum.

mod address;

pub use address::{convert_address, to_checksum, ConversionError, ToAddress};
pub use alloy_primitives::Address;
