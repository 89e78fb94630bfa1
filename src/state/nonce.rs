//! Per-account nonce counters.
//!
//! Makers sign many orders predicated on `nonceEquals(maker, n)`; advancing
//! the counter invalidates all of them at once without touching the ledger.

use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};

use crate::error::ProtocolError;

/// Account → monotonically non-decreasing counter, starting at zero.
#[derive(Debug, Clone, Default)]
pub struct NonceManager {
    nonces: BTreeMap<Address, U256>,
}

impl NonceManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn nonce(&self, account: Address) -> U256 {
        self.nonces.get(&account).copied().unwrap_or(U256::ZERO)
    }

    #[inline]
    pub fn nonce_equals(&self, account: Address, nonce: U256) -> bool {
        self.nonce(account) == nonce
    }

    /// Add `amount` to `account`'s counter. Returns `(previous, new)`.
    pub fn advance(&mut self, account: Address, amount: U256) -> Result<(U256, U256), ProtocolError> {
        let previous = self.nonce(account);
        let next = previous
            .checked_add(amount)
            .ok_or(ProtocolError::NonceOverflow)?;
        if !next.is_zero() {
            self.nonces.insert(account, next);
        }
        Ok((previous, next))
    }

    pub(crate) fn restore(&mut self, account: Address, previous: U256) {
        if previous.is_zero() {
            self.nonces.remove(&account);
        } else {
            self.nonces.insert(account, previous);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.nonces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");

    #[test]
    fn test_starts_at_zero() {
        let nonces = NonceManager::new();
        assert_eq!(nonces.nonce(ALICE), U256::ZERO);
        assert!(nonces.nonce_equals(ALICE, U256::ZERO));
    }

    #[test]
    fn test_advance() {
        let mut nonces = NonceManager::new();
        assert_eq!(nonces.advance(ALICE, U256::from(1)), Ok((U256::ZERO, U256::from(1))));
        assert_eq!(nonces.advance(ALICE, U256::from(5)), Ok((U256::from(1), U256::from(6))));
        assert!(nonces.nonce_equals(ALICE, U256::from(6)));
        assert!(!nonces.nonce_equals(ALICE, U256::from(1)));
    }

    #[test]
    fn test_overflow_rejected() {
        let mut nonces = NonceManager::new();
        nonces.advance(ALICE, U256::MAX).expect("first advance fits");
        assert_eq!(nonces.advance(ALICE, U256::from(1)), Err(ProtocolError::NonceOverflow));
        assert_eq!(nonces.nonce(ALICE), U256::MAX);
    }

    #[test]
    fn test_restore_zero_removes_entry() {
        let mut nonces = NonceManager::new();
        nonces.advance(ALICE, U256::from(1)).unwrap();
        nonces.restore(ALICE, U256::ZERO);
        assert_eq!(nonces.iter().count(), 0);
    }
}
