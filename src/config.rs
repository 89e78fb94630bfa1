//! Deployment configuration.
//!
//! A [`ProtocolConfig`] names one deployment of the protocol: the EIP-712
//! domain name and version, the network (chain id) and the address the
//! protocol runs at. Orders signed for one configuration never verify under
//! another.
//!
//! Configuration can be built in code, parsed from JSON, or read from the
//! environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LOP_NAME` | `Limit Order Protocol` |
//! | `LOP_VERSION` | `2` |
//! | `LOP_CHAIN_ID` | `1` |
//! | `LOP_VERIFYING_CONTRACT` | zero address |

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Default EIP-712 domain name.
pub const DEFAULT_NAME: &str = "Limit Order Protocol";

/// Default EIP-712 domain version.
pub const DEFAULT_VERSION: &str = "2";

/// Identity of one protocol deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConfig {
    /// EIP-712 domain name
    pub name: String,
    /// EIP-712 domain version
    pub version: String,
    /// Network identity
    pub chain_id: u64,
    /// Deployment address; also the spender that pulls assets during fills
    pub verifying_contract: Address,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            chain_id: 1,
            verifying_contract: Address::ZERO,
        }
    }
}

impl ProtocolConfig {
    /// Config for the given network and deployment address, default name/version.
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            chain_id,
            verifying_contract,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from `LOP_*` environment variables. Unset or unparsable values
    /// keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let name = std::env::var("LOP_NAME").unwrap_or(defaults.name);
        let version = std::env::var("LOP_VERSION").unwrap_or(defaults.version);
        let chain_id = std::env::var("LOP_CHAIN_ID")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.chain_id);
        let verifying_contract = std::env::var("LOP_VERIFYING_CONTRACT")
            .ok()
            .and_then(|v| v.trim().parse::<Address>().ok())
            .unwrap_or(defaults.verifying_contract);

        Self {
            name,
            version,
            chain_id,
            verifying_contract,
        }
    }
}
