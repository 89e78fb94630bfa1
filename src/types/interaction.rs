//! Post-fill interaction: a callback target plus opaque data.

use alloy::primitives::{Address, Bytes};

use crate::error::OrderError;

/// Callback the protocol notifies after both transfers of a fill.
///
/// Encoded as `target (20 bytes) ‖ data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub target: Address,
    pub data: Bytes,
}

impl Interaction {
    pub fn new(target: Address, data: impl Into<Bytes>) -> Self {
        Self {
            target,
            data: data.into(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(20 + self.data.len());
        out.extend_from_slice(self.target.as_slice());
        out.extend_from_slice(&self.data);
        out.into()
    }

    /// Empty bytes decode to `None`; anything shorter than an address is malformed.
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>, OrderError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        if bytes.len() < 20 {
            return Err(OrderError::Malformed {
                field: "interaction",
            });
        }
        Ok(Some(Self {
            target: Address::from_slice(&bytes[..20]),
            data: Bytes::copy_from_slice(&bytes[20..]),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_interaction_decode() {
        let target = address!("0x00000000000000000000000000000000000000bb");
        let interaction = Interaction::new(target, vec![0xde, 0xad]);
        let bytes = interaction.encode();
        assert_eq!(bytes.len(), 22);
        assert_eq!(Interaction::decode(&bytes), Ok(Some(interaction)));
    }

    #[test]
    fn test_interaction_empty_and_short() {
        assert_eq!(Interaction::decode(&[]), Ok(None));
        assert!(Interaction::decode(&[1u8; 19]).is_err());
    }
}
