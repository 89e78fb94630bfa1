//! Host capabilities consumed by the protocol.
//!
//! The protocol never moves value or reads foreign state itself. Everything
//! outside its own ledger is reached through these traits:
//!
//! - [`ChainView`]: current time and read-only calls (predicates, amount getters)
//! - [`AssetTransfer`]: move value, standard or data-driven
//! - [`PermitExecutor`]: apply a signed allowance
//! - [`Host`]: all of the above plus snapshots and the post-fill callback
//!
//! [`MemoryHost`] is a complete in-memory implementation.

pub mod memory;

use alloy::primitives::{Address, Bytes, B256, U256};

use crate::engine::LimitOrderProtocol;
use crate::error::{CallError, HostError, PermitError, TransferError};
use crate::types::Permit;

pub use memory::MemoryHost;

/// One asset movement requested by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer<'a> {
    pub asset: Address,
    /// Account pulling the funds (the protocol deployment)
    pub operator: Address,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    /// Empty selects the standard path; otherwise asset-specific data
    pub data: &'a [u8],
}

impl Transfer<'_> {
    #[inline]
    pub fn is_standard(&self) -> bool {
        self.data.is_empty()
    }
}

/// What the post-fill callback is told about a fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillNotice {
    pub order_hash: B256,
    pub taker: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: U256,
    pub taking_amount: U256,
    /// Data from the order's interaction
    pub maker_data: Bytes,
    /// Data the taker passed with the fill
    pub taker_data: Bytes,
}

/// Read-only view of the environment.
pub trait ChainView {
    /// Current time in unix seconds.
    fn timestamp(&self) -> u64;

    /// Invoke `target` with `data` without side effects.
    fn static_call(&self, target: Address, data: &[u8]) -> Result<Bytes, CallError>;
}

pub trait AssetTransfer {
    fn transfer(&mut self, transfer: &Transfer<'_>) -> Result<(), TransferError>;
}

pub trait PermitExecutor {
    /// Authorize `permit.spender` on `asset`. Expired, reused and invalid
    /// permits must fail with their own [`PermitError`] variant.
    fn permit(&mut self, asset: Address, permit: &Permit) -> Result<(), PermitError>;
}

/// Full environment a fill runs in.
pub trait Host: ChainView + AssetTransfer + PermitExecutor {
    /// Capture all host-side state; returns an id for `revert_to` / `release`.
    fn snapshot(&mut self) -> usize;

    /// Restore the state captured by `id`, dropping it and any later snapshots.
    fn revert_to(&mut self, id: usize);

    /// Forget snapshot `id` (and later ones) without restoring.
    fn release(&mut self, id: usize);

    /// Deliver the post-fill callback. The receiver may re-enter `protocol`.
    fn notify_fill(
        &mut self,
        protocol: &mut LimitOrderProtocol,
        target: Address,
        notice: &FillNotice,
    ) -> Result<(), HostError>;

    /// Contract-signature check (ERC-1271) for makers that are not plain keys.
    fn is_valid_signature(&self, _signer: Address, _hash: B256, _signature: &[u8]) -> bool {
        false
    }
}
