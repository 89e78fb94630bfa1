//! Amount getters: how an order converts between its two sides.
//!
//! ## Wire Encoding
//!
//! | Variant | Bytes |
//! |---------|-------|
//! | `Linear` | 4-byte selector of `getMakingAmount(uint256,uint256,uint256)` / `getTakingAmount(...)` |
//! | `Disabled` | empty |
//! | `External` | `target (20 bytes) ‖ data` |
//!
//! An empty field is the explicit "no partial fills" marker. The linear
//! selectors are shorter than an address, so the three forms never overlap.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

use crate::abi::IAmountCalculator::{getMakingAmountCall, getTakingAmountCall};
use crate::error::OrderError;

/// Which conversion an [`AmountGetter`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetterKind {
    /// Derives the making amount from a taking amount
    Making,
    /// Derives the taking amount from a making amount
    Taking,
}

impl GetterKind {
    fn linear_selector(self) -> [u8; 4] {
        match self {
            GetterKind::Making => getMakingAmountCall::SELECTOR,
            GetterKind::Taking => getTakingAmountCall::SELECTOR,
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            GetterKind::Making => "getMakingAmount",
            GetterKind::Taking => "getTakingAmount",
        }
    }
}

/// Conversion strategy for one side of an order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AmountGetter {
    /// Proportional to the order's declared ratio (floor/ceil rounding)
    #[default]
    Linear,
    /// Only full-size fills are accepted
    Disabled,
    /// Maker-supplied read-only calculator, called with
    /// `data ‖ abi(orderMaking, orderTaking, requested)`
    External { target: Address, data: Bytes },
}

impl AmountGetter {
    pub fn external(target: Address, data: impl Into<Bytes>) -> Self {
        AmountGetter::External {
            target,
            data: data.into(),
        }
    }

    /// Canonical bytes for the signed order field.
    pub fn encode(&self, kind: GetterKind) -> Bytes {
        match self {
            AmountGetter::Linear => Bytes::copy_from_slice(&kind.linear_selector()),
            AmountGetter::Disabled => Bytes::new(),
            AmountGetter::External { target, data } => {
                let mut out = Vec::with_capacity(20 + data.len());
                out.extend_from_slice(target.as_slice());
                out.extend_from_slice(data);
                out.into()
            }
        }
    }

    /// Decode a signed order field.
    pub fn decode(kind: GetterKind, bytes: &[u8]) -> Result<Self, OrderError> {
        match bytes.len() {
            0 => Ok(AmountGetter::Disabled),
            4 if bytes == kind.linear_selector().as_slice() => Ok(AmountGetter::Linear),
            n if n >= 20 => Ok(AmountGetter::External {
                target: Address::from_slice(&bytes[..20]),
                data: Bytes::copy_from_slice(&bytes[20..]),
            }),
            _ => Err(OrderError::Malformed {
                field: kind.field_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_linear_encodes_to_selector() {
        let bytes = AmountGetter::Linear.encode(GetterKind::Making);
        assert_eq!(bytes.len(), 4);
        assert_eq!(&bytes[..], getMakingAmountCall::SELECTOR.as_slice());
        assert_ne!(bytes, AmountGetter::Linear.encode(GetterKind::Taking));
    }

    #[test]
    fn test_disabled_is_empty() {
        assert!(AmountGetter::Disabled.encode(GetterKind::Taking).is_empty());
        assert_eq!(
            AmountGetter::decode(GetterKind::Taking, &[]),
            Ok(AmountGetter::Disabled)
        );
    }

    #[test]
    fn test_external_layout() {
        let target = address!("0x00000000000000000000000000000000000000aa");
        let getter = AmountGetter::external(target, vec![1u8, 2, 3]);
        let bytes = getter.encode(GetterKind::Making);
        assert_eq!(&bytes[..20], target.as_slice());
        assert_eq!(&bytes[20..], &[1, 2, 3]);
        assert_eq!(AmountGetter::decode(GetterKind::Making, &bytes), Ok(getter));
    }

    #[test]
    fn test_wrong_side_selector_rejected() {
        let taking_selector = getTakingAmountCall::SELECTOR;
        assert!(AmountGetter::decode(GetterKind::Making, &taking_selector).is_err());
        assert!(AmountGetter::decode(GetterKind::Making, &[0u8; 7]).is_err());
    }
}
