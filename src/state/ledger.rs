//! Remaining-amount ledger.
//!
//! Maps an order hash to the amount still fillable, in taker-asset units.
//!
//! | Entry | Meaning |
//! |-------|---------|
//! | absent | never touched; the full `taking_amount` remains |
//! | `> 0` | partially filled |
//! | `0` | filled or cancelled (terminal) |
//!
//! Entries are never deleted.

use std::collections::BTreeMap;

use alloy::primitives::{B256, U256};

/// Order hash → remaining taker-asset amount.
#[derive(Debug, Clone, Default)]
pub struct RemainingLedger {
    entries: BTreeMap<B256, U256>,
}

impl RemainingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry; `None` means the order was never touched.
    #[inline]
    pub fn get(&self, order_hash: &B256) -> Option<U256> {
        self.entries.get(order_hash).copied()
    }

    /// Remaining amount, treating an absent entry as `full`.
    #[inline]
    pub fn remaining_or(&self, order_hash: &B256, full: U256) -> U256 {
        self.get(order_hash).unwrap_or(full)
    }

    /// Store a new value and return the previous raw entry.
    pub fn set(&mut self, order_hash: B256, amount: U256) -> Option<U256> {
        self.entries.insert(order_hash, amount)
    }

    /// Put back a previous raw entry (journal revert).
    pub(crate) fn restore(&mut self, order_hash: B256, previous: Option<U256>) {
        match previous {
            Some(amount) => {
                self.entries.insert(order_hash, amount);
            }
            None => {
                self.entries.remove(&order_hash);
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in hash order.
    pub fn iter(&self) -> impl Iterator<Item = (&B256, &U256)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_means_full() {
        let ledger = RemainingLedger::new();
        let hash = B256::repeat_byte(1);
        assert_eq!(ledger.get(&hash), None);
        assert_eq!(ledger.remaining_or(&hash, U256::from(50)), U256::from(50));
    }

    #[test]
    fn test_zero_entry_is_kept() {
        let mut ledger = RemainingLedger::new();
        let hash = B256::repeat_byte(2);
        assert_eq!(ledger.set(hash, U256::ZERO), None);
        assert_eq!(ledger.get(&hash), Some(U256::ZERO));
        assert_eq!(ledger.remaining_or(&hash, U256::from(50)), U256::ZERO);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_restore_previous() {
        let mut ledger = RemainingLedger::new();
        let hash = B256::repeat_byte(3);

        let previous = ledger.set(hash, U256::from(10));
        ledger.restore(hash, previous);
        assert!(ledger.is_empty());

        ledger.set(hash, U256::from(10));
        let previous = ledger.set(hash, U256::from(4));
        ledger.restore(hash, previous);
        assert_eq!(ledger.get(&hash), Some(U256::from(10)));
    }
}
