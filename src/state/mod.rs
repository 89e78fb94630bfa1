//! Protocol state: the remaining-amount ledger and nonce counters.
//!
//! ## Journal
//!
//! Fills must be atomic, and a fill may re-enter the protocol from its
//! post-fill callback. [`ProtocolState`] therefore records every mutation
//! made while a checkpoint is open. Reverting to a checkpoint undoes the
//! mutations in reverse order, including those made by nested fills that
//! already committed their own inner checkpoint.
//!
//! ```
//! use alloy::primitives::{B256, U256};
//! use limit_order_protocol::state::ProtocolState;
//!
//! let mut state = ProtocolState::new();
//! let hash = B256::repeat_byte(9);
//!
//! let checkpoint = state.checkpoint();
//! state.set_remaining(hash, U256::from(5));
//! state.revert(checkpoint);
//!
//! assert_eq!(state.ledger().get(&hash), None);
//! ```
//!
//! ## State Root
//!
//! [`ProtocolState::compute_state_root`] hashes every ledger entry and nonce
//! in key order with SHA-256. Identical operation sequences give identical
//! roots.

pub mod ledger;
pub mod nonce;

use alloy::primitives::{Address, B256, U256};
use sha2::{Digest, Sha256};

use crate::error::ProtocolError;

pub use ledger::RemainingLedger;
pub use nonce::NonceManager;

/// One undoable mutation.
#[derive(Debug, Clone)]
enum Change {
    Remaining { order_hash: B256, previous: Option<U256> },
    Nonce { account: Address, previous: U256 },
}

/// Opaque journal position returned by [`ProtocolState::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Ledger + nonces + undo journal.
#[derive(Debug, Clone, Default)]
pub struct ProtocolState {
    ledger: RemainingLedger,
    nonces: NonceManager,
    journal: Vec<Change>,
    open: usize,
}

impl ProtocolState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ledger(&self) -> &RemainingLedger {
        &self.ledger
    }

    #[inline]
    pub fn nonces(&self) -> &NonceManager {
        &self.nonces
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn set_remaining(&mut self, order_hash: B256, amount: U256) {
        let previous = self.ledger.set(order_hash, amount);
        self.record(Change::Remaining {
            order_hash,
            previous,
        });
    }

    /// Advance `account`'s nonce by `amount` and return the new value.
    pub fn advance_nonce(&mut self, account: Address, amount: U256) -> Result<U256, ProtocolError> {
        let (previous, next) = self.nonces.advance(account, amount)?;
        self.record(Change::Nonce { account, previous });
        Ok(next)
    }

    fn record(&mut self, change: Change) {
        if self.open > 0 {
            self.journal.push(change);
        }
    }

    // ========================================================================
    // Journal
    // ========================================================================

    /// Open a checkpoint. Every checkpoint must be closed by exactly one
    /// [`commit`](Self::commit) or [`revert`](Self::revert).
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.open += 1;
        Checkpoint(self.journal.len())
    }

    /// Keep all changes since `checkpoint`.
    pub fn commit(&mut self, _checkpoint: Checkpoint) {
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }

    /// Undo all changes since `checkpoint`.
    pub fn revert(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.0 {
            match self.journal.pop() {
                Some(Change::Remaining {
                    order_hash,
                    previous,
                }) => self.ledger.restore(order_hash, previous),
                Some(Change::Nonce { account, previous }) => self.nonces.restore(account, previous),
                None => break,
            }
        }
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }

    /// Number of open checkpoints.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 over all ledger entries and nonces, in key order.
    pub fn compute_state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        hasher.update(b"remaining");
        for (order_hash, amount) in self.ledger.iter() {
            hasher.update(order_hash.as_slice());
            hasher.update(amount.to_be_bytes::<32>());
        }

        hasher.update(b"nonce");
        for (account, nonce) in self.nonces.iter() {
            hasher.update(account.as_slice());
            hasher.update(nonce.to_be_bytes::<32>());
        }

        hasher.finalize().into()
    }

    /// State root as a hex string.
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.compute_state_root())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");

    #[test]
    fn test_changes_outside_checkpoint_are_not_journaled() {
        let mut state = ProtocolState::new();
        state.set_remaining(B256::repeat_byte(1), U256::from(3));
        assert!(state.journal.is_empty());
    }

    #[test]
    fn test_revert_restores_ledger_and_nonce() {
        let mut state = ProtocolState::new();
        let hash = B256::repeat_byte(1);
        state.set_remaining(hash, U256::from(10));

        let cp = state.checkpoint();
        state.set_remaining(hash, U256::from(4));
        state.advance_nonce(BOB, U256::from(1)).unwrap();
        state.revert(cp);

        assert_eq!(state.ledger().get(&hash), Some(U256::from(10)));
        assert_eq!(state.nonces().nonce(BOB), U256::ZERO);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_outer_revert_undoes_committed_inner() {
        let mut state = ProtocolState::new();
        let hash = B256::repeat_byte(2);

        let outer = state.checkpoint();
        state.set_remaining(hash, U256::from(8));

        let inner = state.checkpoint();
        state.set_remaining(hash, U256::from(5));
        state.commit(inner);
        assert_eq!(state.ledger().get(&hash), Some(U256::from(5)));

        state.revert(outer);
        assert_eq!(state.ledger().get(&hash), None);
    }

    #[test]
    fn test_commit_clears_journal() {
        let mut state = ProtocolState::new();
        let cp = state.checkpoint();
        state.set_remaining(B256::repeat_byte(3), U256::from(1));
        state.commit(cp);
        assert!(state.journal.is_empty());
        assert_eq!(state.ledger().len(), 1);
    }

    #[test]
    fn test_state_root_determinism() {
        let mut a = ProtocolState::new();
        let mut b = ProtocolState::new();
        for state in [&mut a, &mut b] {
            state.set_remaining(B256::repeat_byte(1), U256::from(7));
            state.advance_nonce(BOB, U256::from(2)).unwrap();
        }
        assert_eq!(a.compute_state_root(), b.compute_state_root());
        assert_eq!(a.state_root_hex().len(), 64);

        b.set_remaining(B256::repeat_byte(1), U256::from(6));
        assert_ne!(a.compute_state_root(), b.compute_state_root());
    }
}
