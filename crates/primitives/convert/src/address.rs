use alloy_primitives::{hex, Address, Bytes, B256, U256};

const ADDRESS_LEN: usize = 20;
const WORD_LEN: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid hex address `{input}`: {reason}")]
    InvalidHex { input: String, reason: String },
    #[error("Invalid address length: expected 20 or 32 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex address length: expected 20 bytes, got {0}")]
    InvalidHexLength(usize),
    #[error("Invalid EIP-55 checksum for address `{0}`")]
    InvalidChecksum(String),
    #[error("32 byte word does not hold an address, the 12 leading bytes must be zero")]
    NonZeroPadding,
    #[error("Integer {0} does not fit in 160 bits")]
    Overflow(U256),
}

/// Any value that can be normalized into a canonical [`Address`].
pub trait ToAddress {
    fn to_address(&self) -> Result<Address, ConversionError>;
}

/// Normalizes `value` into the canonical address type.
pub fn convert_address(value: impl ToAddress) -> Result<Address, ConversionError> {
    value.to_address()
}

/// Renders an address in its canonical EIP-55 checksummed form.
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}

fn address_from_bytes(bytes: &[u8]) -> Result<Address, ConversionError> {
    match bytes.len() {
        ADDRESS_LEN => Ok(Address::from_slice(bytes)),
        WORD_LEN => {
            let (padding, address) = bytes.split_at(WORD_LEN - ADDRESS_LEN);
            if padding.iter().any(|b| *b != 0) {
                return Err(ConversionError::NonZeroPadding);
            }
            Ok(Address::from_slice(address))
        }
        len => Err(ConversionError::InvalidLength(len)),
    }
}

fn address_from_hex(input: &str) -> Result<Address, ConversionError> {
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    let bytes = hex::decode(digits)
        .map_err(|e| ConversionError::InvalidHex { input: input.to_string(), reason: e.to_string() })?;
    if bytes.len() != ADDRESS_LEN {
        return Err(ConversionError::InvalidHexLength(bytes.len()));
    }
    let address = Address::from_slice(&bytes);

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address)[2..] != *digits {
        return Err(ConversionError::InvalidChecksum(input.to_string()));
    }

    Ok(address)
}

impl ToAddress for Address {
    fn to_address(&self) -> Result<Address, ConversionError> {
        Ok(*self)
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Result<Address, ConversionError> {
        address_from_hex(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Result<Address, ConversionError> {
        address_from_hex(self)
    }
}

impl ToAddress for [u8; ADDRESS_LEN] {
    fn to_address(&self) -> Result<Address, ConversionError> {
        Ok(Address::from(*self))
    }
}

impl ToAddress for [u8] {
    fn to_address(&self) -> Result<Address, ConversionError> {
        address_from_bytes(self)
    }
}

impl ToAddress for Vec<u8> {
    fn to_address(&self) -> Result<Address, ConversionError> {
        address_from_bytes(self)
    }
}

impl ToAddress for Bytes {
    fn to_address(&self) -> Result<Address, ConversionError> {
        address_from_bytes(self)
    }
}

impl ToAddress for B256 {
    fn to_address(&self) -> Result<Address, ConversionError> {
        address_from_bytes(self.as_slice())
    }
}

impl ToAddress for U256 {
    fn to_address(&self) -> Result<Address, ConversionError> {
        if self.bit_len() > ADDRESS_LEN * 8 {
            return Err(ConversionError::Overflow(*self));
        }
        address_from_bytes(&self.to_be_bytes::<WORD_LEN>())
    }
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self) -> Result<Address, ConversionError> {
        (**self).to_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use assert_matches::assert_matches;
    use rstest::rstest;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const EXPECTED: Address = address!("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");

    #[rstest]
    #[case::checksummed(CHECKSUMMED)]
    #[case::lowercase("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")]
    #[case::uppercase("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED")]
    #[case::no_prefix("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")]
    #[case::checksummed_no_prefix("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")]
    fn hex_strings_are_normalized(#[case] input: &str) {
        assert_eq!(convert_address(input).unwrap(), EXPECTED);
        assert_eq!(convert_address(input.to_string()).unwrap(), EXPECTED);
    }

    #[test]
    fn canonical_form_is_checksummed() {
        let address = convert_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(to_checksum(&address), CHECKSUMMED);
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let input = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(convert_address(input), Err(ConversionError::InvalidChecksum(input.to_string())));
    }

    #[rstest]
    #[case::not_hex("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed")]
    #[case::odd_length("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beae")]
    #[case::empty("")]
    fn malformed_hex_is_rejected(#[case] input: &str) {
        match convert_address(input) {
            Err(ConversionError::InvalidHex { .. }) | Err(ConversionError::InvalidHexLength(_)) => {}
            other => panic!("unexpected conversion result for {input:?}: {other:?}"),
        }
    }

    #[test]
    fn short_hex_is_rejected() {
        assert_eq!(convert_address("0x5aaeb6"), Err(ConversionError::InvalidHexLength(3)));
    }

    #[test]
    fn hex_word_is_not_an_address() {
        let word = hex::encode_prefixed(EXPECTED.into_word());
        let err = convert_address(word.as_str()).unwrap_err();
        assert_eq!(err, ConversionError::InvalidHexLength(32));
        assert_eq!(err.to_string(), "Invalid hex address length: expected 20 bytes, got 32");
    }

    #[test]
    fn raw_bytes() {
        let raw: [u8; 20] = EXPECTED.0 .0;
        assert_eq!(convert_address(raw).unwrap(), EXPECTED);
        assert_eq!(convert_address(raw.as_slice()).unwrap(), EXPECTED);
        assert_eq!(convert_address(raw.to_vec()).unwrap(), EXPECTED);
        assert_eq!(convert_address(Bytes::copy_from_slice(&raw)).unwrap(), EXPECTED);
        assert_eq!(convert_address(vec![0u8; 19]), Err(ConversionError::InvalidLength(19)));
    }

    #[test]
    fn abi_encoded_word() {
        assert_eq!(convert_address(EXPECTED.into_word()).unwrap(), EXPECTED);

        let mut dirty = EXPECTED.into_word();
        dirty.0[0] = 1;
        assert_eq!(convert_address(dirty), Err(ConversionError::NonZeroPadding));
    }

    #[test]
    fn integers() {
        assert_eq!(convert_address(U256::from(1u64)).unwrap(), address!("0000000000000000000000000000000000000001"));
        assert_eq!(convert_address(U256::from_be_slice(EXPECTED.as_slice())).unwrap(), EXPECTED);
        assert_matches!(convert_address(U256::MAX), Err(ConversionError::Overflow(_)));
        assert_matches!(convert_address(U256::from(1u64) << 160), Err(ConversionError::Overflow(_)));
    }

    #[test]
    fn address_is_identity() {
        assert_eq!(convert_address(EXPECTED).unwrap(), EXPECTED);
        assert_eq!(convert_address(&EXPECTED).unwrap(), EXPECTED);
    }
}
