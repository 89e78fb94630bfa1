//! Permit payloads.
//!
//! A permit lets an asset owner authorize the protocol with a signature
//! instead of a prior approval. The protocol never interprets the signature
//! itself; it forwards the payload to the host's `PermitExecutor`.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolValue;

use crate::abi::PermitPayload;
use crate::error::{OrderError, PermitError};

/// Owner-signed authorization for `spender` to move `value` until `deadline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permit {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    /// Unix seconds; the permit is expired once host time exceeds it
    pub deadline: u64,
    pub signature: Bytes,
}

impl Permit {
    /// ABI-encoded `(owner, spender, value, deadline, signature)`.
    pub fn encode(&self) -> Bytes {
        PermitPayload {
            owner: self.owner,
            spender: self.spender,
            value: self.value,
            deadline: U256::from(self.deadline),
            signature: self.signature.clone(),
        }
        .abi_encode()
        .into()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PermitError> {
        let payload = PermitPayload::abi_decode(bytes).map_err(|_| PermitError::Malformed)?;
        let deadline = u64::try_from(payload.deadline).map_err(|_| PermitError::Malformed)?;
        Ok(Self {
            owner: payload.owner,
            spender: payload.spender,
            value: payload.value,
            deadline,
            signature: payload.signature,
        })
    }

    /// Decode the order's `permit` field. Empty means no permit.
    pub(crate) fn decode_field(bytes: &[u8]) -> Result<Option<Self>, OrderError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let permit = Self::decode(bytes).map_err(|_| OrderError::Malformed { field: "permit" })?;
        Ok(Some(permit))
    }
}

/// A permit together with the asset it targets, as supplied by a taker.
///
/// Encoded as `asset (20 bytes) ‖ abi(permit)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPermit {
    pub asset: Address,
    pub permit: Permit,
}

impl AssetPermit {
    pub fn new(asset: Address, permit: Permit) -> Self {
        Self { asset, permit }
    }

    pub fn encode(&self) -> Bytes {
        let encoded = self.permit.encode();
        let mut out = Vec::with_capacity(20 + encoded.len());
        out.extend_from_slice(self.asset.as_slice());
        out.extend_from_slice(&encoded);
        out.into()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PermitError> {
        if bytes.len() < 20 {
            return Err(PermitError::Malformed);
        }
        Ok(Self {
            asset: Address::from_slice(&bytes[..20]),
            permit: Permit::decode(&bytes[20..])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn sample_permit() -> Permit {
        Permit {
            owner: address!("0x00000000000000000000000000000000000000a1"),
            spender: address!("0x00000000000000000000000000000000000000a2"),
            value: U256::from(1_000u64),
            deadline: 1_700_000_000,
            signature: Bytes::from(vec![7u8; 65]),
        }
    }

    #[test]
    fn test_permit_decode_matches_encode() {
        let permit = sample_permit();
        assert_eq!(Permit::decode(&permit.encode()), Ok(permit));
    }

    #[test]
    fn test_permit_decode_garbage() {
        assert_eq!(Permit::decode(&[1, 2, 3]), Err(PermitError::Malformed));
        assert_eq!(Permit::decode_field(&[]), Ok(None));
    }

    #[test]
    fn test_asset_permit_prefix() {
        let asset = address!("0x00000000000000000000000000000000000000cc");
        let asset_permit = AssetPermit::new(asset, sample_permit());
        let bytes = asset_permit.encode();
        assert_eq!(&bytes[..20], asset.as_slice());
        assert_eq!(AssetPermit::decode(&bytes), Ok(asset_permit));
        assert_eq!(AssetPermit::decode(&[0u8; 4]), Err(PermitError::Malformed));
    }
}
