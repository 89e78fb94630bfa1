//! Fill requests and their outcomes.

use alloy::primitives::{Address, Bytes, B256, U256};

use crate::types::order::Order;
use crate::types::permit::AssetPermit;

/// Parameters of one fill call.
///
/// Exactly one of `making_amount` / `taking_amount` should be non-zero;
/// both zero means "fill everything that remains".
#[derive(Debug, Clone)]
pub struct FillRequest<'a> {
    pub order: &'a Order,
    pub signature: &'a [u8],
    /// Taker data forwarded to the order's post-fill callback
    pub interaction: Bytes,
    pub making_amount: U256,
    pub taking_amount: U256,
    /// Max taking amount when filling by making; min making amount when
    /// filling by taking.
    pub threshold_amount: U256,
    /// Recipient of the maker asset; `None` means the caller
    pub target: Option<Address>,
    /// Taker permit executed before the transfers
    pub permit: Option<AssetPermit>,
}

impl<'a> FillRequest<'a> {
    pub fn new(order: &'a Order, signature: &'a [u8]) -> Self {
        Self {
            order,
            signature,
            interaction: Bytes::new(),
            making_amount: U256::ZERO,
            taking_amount: U256::ZERO,
            threshold_amount: U256::ZERO,
            target: None,
            permit: None,
        }
    }

    #[must_use]
    pub fn making(mut self, amount: U256) -> Self {
        self.making_amount = amount;
        self
    }

    #[must_use]
    pub fn taking(mut self, amount: U256) -> Self {
        self.taking_amount = amount;
        self
    }

    #[must_use]
    pub fn threshold(mut self, amount: U256) -> Self {
        self.threshold_amount = amount;
        self
    }

    #[must_use]
    pub fn interaction(mut self, data: impl Into<Bytes>) -> Self {
        self.interaction = data.into();
        self
    }

    #[must_use]
    pub fn to(mut self, target: Address) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_permit(mut self, permit: AssetPermit) -> Self {
        self.permit = Some(permit);
        self
    }
}

/// Which side of the order the request fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Caller fixed the making amount; taking is derived (ceil)
    ByMaking,
    /// Caller fixed the taking amount; making is derived (floor)
    ByTaking,
}

/// Amounts actually exchanged by a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillResult {
    pub order_hash: B256,
    pub making_amount: U256,
    pub taking_amount: U256,
    /// Ledger value after the fill, in taker-asset units
    pub remaining: U256,
}

impl FillResult {
    /// The fill exhausted the order.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Ledger-derived lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Never filled or cancelled
    Open,
    /// Some but not all of the taking amount consumed
    PartiallyFilled,
    /// Fully filled or cancelled; both look the same in the ledger
    Closed,
}
