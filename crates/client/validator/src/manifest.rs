//! Contract manifest shipped with the crate.
//!
//! The manifest is an ethPM v3 style document listing the contract types (ABIs) the toolkit
//! knows about. Live contract handles are resolved by pairing an address with one of these types.

use crate::error::{ManifestError, ValidatorError};
use alloy::json_abi::{Function, JsonAbi, StateMutability};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

pub const VALIDATOR_CONTRACT: &str = "Validator";

const MANIFEST_VERSION: &str = "ethpm/3";

const BUNDLED_MANIFEST: &str = include_str!("manifest/apepay.json");

lazy_static! {
    /// The bundled ApePay manifest.
    pub static ref MANIFEST: Manifest =
        Manifest::from_json(BUNDLED_MANIFEST).expect("Bundled ApePay manifest should be valid");
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    manifest: String,
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    contract_types: HashMap<String, RawContractType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContractType {
    contract_name: Option<String>,
    abi: Option<JsonAbi>,
}

/// A named contract interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractType {
    pub name: String,
    pub abi: JsonAbi,
}

impl ContractType {
    pub fn new(name: impl Into<String>, abi: JsonAbi) -> Self {
        Self { name: name.into(), abi }
    }

    /// All overloads of `name`, whatever their mutability.
    pub fn methods<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Function> + 'a {
        self.abi.function(name).into_iter().flatten()
    }

    /// Overloads of `name` that a transaction would call, ie. neither `view` nor `pure`.
    pub fn mutable_methods<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Function> + 'a {
        self.methods(name).filter(|f| !matches!(f.state_mutability, StateMutability::View | StateMutability::Pure))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Option<String>,
    contract_types: HashMap<String, Arc<ContractType>>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = serde_json::from_str(json)?;
        if raw.manifest != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion(raw.manifest));
        }

        let contract_types = raw
            .contract_types
            .into_iter()
            .map(|(key, ty)| {
                let abi = ty.abi.ok_or_else(|| ManifestError::MissingAbi(key.clone()))?;
                let name = ty.contract_name.unwrap_or_else(|| key.clone());
                Ok((key, Arc::new(ContractType::new(name, abi))))
            })
            .collect::<Result<_, ManifestError>>()?;

        Ok(Self { name: raw.name, version: raw.version, contract_types })
    }

    pub fn contract_type(&self, name: &str) -> Result<Arc<ContractType>, ValidatorError> {
        self.contract_types.get(name).cloned().ok_or_else(|| ValidatorError::UnknownContractType(name.to_string()))
    }

    /// The interface every validator contract implements.
    pub fn validator(&self) -> Result<Arc<ContractType>, ValidatorError> {
        self.contract_type(VALIDATOR_CONTRACT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bundled_manifest_has_validator() {
        let validator = MANIFEST.validator().expect("Validator should be in the bundled manifest");
        assert_eq!(validator.name, VALIDATOR_CONTRACT);
        assert_eq!(MANIFEST.name.as_deref(), Some("apepay"));

        let validate: Vec<_> = validator.mutable_methods("validate").collect();
        assert_eq!(validate.len(), 1);
        assert_eq!(validate[0].signature(), "validate(address,address,uint256,bytes)");
    }

    #[test]
    fn unknown_contract_type() {
        assert_matches!(
            MANIFEST.contract_type("StreamFactory"),
            Err(ValidatorError::UnknownContractType(name)) if name == "StreamFactory"
        );
    }

    #[test]
    fn view_methods_are_not_mutable() {
        let manifest = Manifest::from_json(
            r#"{
                "manifest": "ethpm/3",
                "contractTypes": {
                    "Validator": {
                        "abi": [{
                            "type": "function",
                            "name": "validate",
                            "stateMutability": "view",
                            "inputs": [],
                            "outputs": []
                        }]
                    }
                }
            }"#,
        )
        .unwrap();

        let validator = manifest.validator().unwrap();
        // Falls back to the key when `contractName` is absent.
        assert_eq!(validator.name, "Validator");
        assert_eq!(validator.methods("validate").count(), 1);
        assert_eq!(validator.mutable_methods("validate").count(), 0);
    }

    #[test]
    fn missing_abi_is_rejected() {
        let res = Manifest::from_json(r#"{"manifest": "ethpm/3", "contractTypes": {"Validator": {}}}"#);
        assert_matches!(res, Err(ManifestError::MissingAbi(name)) if name == "Validator");
    }

    #[test]
    fn unsupported_manifest_version() {
        let res = Manifest::from_json(r#"{"manifest": "ethpm/2", "contractTypes": {}}"#);
        assert_matches!(res, Err(ManifestError::UnsupportedVersion(version)) if version == "ethpm/2");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_matches!(Manifest::from_json("{"), Err(ManifestError::Decode(_)));
    }
}
