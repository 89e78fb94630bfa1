//! Protocol instance: configuration, state and the non-fill operations.

use alloy::primitives::{Address, B256, U256};
use tracing::{debug, info};

use crate::auth::OrderAuthorization;
use crate::config::ProtocolConfig;
use crate::error::{PredicateError, ProtocolError, ProtocolResult};
use crate::host::ChainView;
use crate::predicate::PredicateEvaluator;
use crate::state::ProtocolState;
use crate::types::{Order, OrderStatus};

/// One deployment of the limit order protocol.
///
/// Owns the remaining-amount ledger and nonce counters. Everything outside
/// them (time, balances, foreign contracts) is reached through a
/// [`Host`](crate::host::Host) passed to each call.
#[derive(Debug, Clone)]
pub struct LimitOrderProtocol {
    /// Deployment parameters
    pub(super) config: ProtocolConfig,

    /// Order hashing and signature checks
    pub(super) auth: OrderAuthorization,

    /// Ledger, nonces and undo journal
    pub(super) state: ProtocolState,
}

impl LimitOrderProtocol {
    /// Create a protocol instance with empty state.
    pub fn new(config: ProtocolConfig) -> Self {
        let auth = OrderAuthorization::new(&config);
        info!(
            name = %config.name,
            version = %config.version,
            chain_id = config.chain_id,
            contract = %config.verifying_contract,
            "limit order protocol initialized"
        );
        Self {
            config,
            auth,
            state: ProtocolState::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Address the protocol acts as when pulling funds.
    #[inline]
    pub fn address(&self) -> Address {
        self.config.verifying_contract
    }

    #[inline]
    pub fn authorization(&self) -> &OrderAuthorization {
        &self.auth
    }

    #[inline]
    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn hash_order(&self, order: &Order) -> B256 {
        self.auth.hash(order)
    }

    pub fn domain_separator(&self) -> B256 {
        self.auth.domain_separator()
    }

    /// Remaining taker amount of a touched order.
    ///
    /// # Errors
    ///
    /// `UnknownOrder` if the order was never filled or cancelled.
    pub fn remaining(&self, order_hash: B256) -> ProtocolResult<U256> {
        self.state
            .ledger()
            .get(&order_hash)
            .ok_or(ProtocolError::UnknownOrder)
    }

    /// Raw ledger entry; `None` for untouched orders.
    pub fn remaining_raw(&self, order_hash: B256) -> Option<U256> {
        self.state.ledger().get(&order_hash)
    }

    pub fn remaining_raw_batch(&self, order_hashes: &[B256]) -> Vec<Option<U256>> {
        order_hashes
            .iter()
            .map(|hash| self.remaining_raw(*hash))
            .collect()
    }

    /// Remaining taker amount, treating an untouched order as full size.
    pub fn remaining_for(&self, order: &Order) -> U256 {
        self.state
            .ledger()
            .remaining_or(&self.hash_order(order), order.taking_amount)
    }

    pub fn order_status(&self, order: &Order) -> OrderStatus {
        match self.remaining_raw(self.hash_order(order)) {
            None => OrderStatus::Open,
            Some(amount) if amount.is_zero() => OrderStatus::Closed,
            Some(amount) if amount == order.taking_amount => OrderStatus::Open,
            Some(_) => OrderStatus::PartiallyFilled,
        }
    }

    #[inline]
    pub fn nonce(&self, account: Address) -> U256 {
        self.state.nonces().nonce(account)
    }

    /// Evaluate the order's predicate without filling.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - No predicate, or it evaluates to true
    /// * `Ok(false)` - The predicate is false or cannot be evaluated
    /// * `Err(ArbitraryStaticCallFailed)` - The predicate is a single
    ///   static call and that call failed
    pub fn check_predicate<V: ChainView + ?Sized>(&self, view: &V, order: &Order) -> ProtocolResult<bool> {
        if !order.has_predicate() {
            return Ok(true);
        }
        match PredicateEvaluator::new(view, &self.state).check_bytes(&order.predicate) {
            Ok(holds) => Ok(holds),
            Err(PredicateError::ArbitraryStaticCallFailed { target }) => {
                Err(ProtocolError::ArbitraryStaticCallFailed { target })
            }
            Err(err) => {
                debug!(error = %err, "predicate could not be evaluated");
                Ok(false)
            }
        }
    }

    pub fn state_root(&self) -> [u8; 32] {
        self.state.compute_state_root()
    }

    pub fn state_root_hex(&self) -> String {
        self.state.state_root_hex()
    }

    // ========================================================================
    // Maker operations
    // ========================================================================

    /// Permanently close `order`. Only its maker may do this; the order
    /// need not have been filled before.
    pub fn cancel_order(&mut self, caller: Address, order: &Order) -> ProtocolResult<B256> {
        if caller != order.maker {
            return Err(ProtocolError::AccessDenied);
        }
        let order_hash = self.hash_order(order);
        self.state.set_remaining(order_hash, U256::ZERO);
        info!(order_hash = %order_hash, maker = %caller, "order cancelled");
        Ok(order_hash)
    }

    /// Bump the caller's nonce by one. Returns the new nonce.
    pub fn increase_nonce(&mut self, caller: Address) -> ProtocolResult<U256> {
        self.advance_nonce(caller, 1)
    }

    /// Bump the caller's nonce by `amount`. Returns the new nonce.
    pub fn advance_nonce(&mut self, caller: Address, amount: u8) -> ProtocolResult<U256> {
        let nonce = self.state.advance_nonce(caller, U256::from(amount))?;
        info!(account = %caller, nonce = %nonce, "nonce advanced");
        Ok(nonce)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallError;
    use crate::host::MemoryHost;
    use crate::predicate::Predicate;
    use alloy::primitives::{address, Bytes};

    const MAKER: Address = address!("0x00000000000000000000000000000000000000c0");
    const STRANGER: Address = address!("0x00000000000000000000000000000000000000e0");
    const BROKEN: Address = address!("0x000000000000000000000000000000000000dead");

    fn protocol() -> LimitOrderProtocol {
        LimitOrderProtocol::new(ProtocolConfig::new(
            1,
            address!("0x1111111111111111111111111111111111111111"),
        ))
    }

    fn order() -> Order {
        Order::new(
            U256::from(1),
            address!("0x00000000000000000000000000000000000000a0"),
            address!("0x00000000000000000000000000000000000000b0"),
            MAKER,
            U256::from(10),
            U256::from(20),
        )
        .unwrap()
    }

    #[test]
    fn test_cancel_requires_maker() {
        let mut protocol = protocol();
        let order = order();
        assert_eq!(protocol.cancel_order(STRANGER, &order), Err(ProtocolError::AccessDenied));
        assert_eq!(protocol.order_status(&order), OrderStatus::Open);

        let hash = protocol.cancel_order(MAKER, &order).unwrap();
        assert_eq!(protocol.remaining(hash), Ok(U256::ZERO));
        assert_eq!(protocol.order_status(&order), OrderStatus::Closed);
        assert_eq!(protocol.remaining_for(&order), U256::ZERO);
    }

    #[test]
    fn test_remaining_queries() {
        let mut protocol = protocol();
        let order = order();
        let hash = protocol.hash_order(&order);

        assert_eq!(protocol.remaining(hash), Err(ProtocolError::UnknownOrder));
        assert_eq!(protocol.remaining_raw(hash), None);
        assert_eq!(protocol.remaining_for(&order), U256::from(20));

        protocol.state.set_remaining(hash, U256::from(5));
        assert_eq!(protocol.order_status(&order), OrderStatus::PartiallyFilled);
        assert_eq!(
            protocol.remaining_raw_batch(&[hash, B256::ZERO]),
            vec![Some(U256::from(5)), None]
        );
    }

    #[test]
    fn test_nonce_operations() {
        let mut protocol = protocol();
        assert_eq!(protocol.increase_nonce(MAKER), Ok(U256::from(1)));
        assert_eq!(protocol.advance_nonce(MAKER, 4), Ok(U256::from(5)));
        assert_eq!(protocol.nonce(MAKER), U256::from(5));
        assert_eq!(protocol.nonce(STRANGER), U256::ZERO);
    }

    #[test]
    fn test_check_predicate() {
        let mut host = MemoryHost::new(1, 100);
        host.register_contract(BROKEN, |_| Err(CallError::Reverted(Bytes::new())));
        let protocol = protocol();

        assert_eq!(protocol.check_predicate(&host, &order()), Ok(true));

        let expired = order().with_predicate(Predicate::timestamp_below(100).encode().unwrap());
        assert_eq!(protocol.check_predicate(&host, &expired), Ok(false));

        let garbage = order().with_predicate(vec![1u8, 2]);
        assert_eq!(protocol.check_predicate(&host, &garbage), Ok(false));

        let failing = order().with_predicate(
            Predicate::arbitrary_static_call(BROKEN, Bytes::new())
                .encode()
                .unwrap(),
        );
        assert_eq!(
            protocol.check_predicate(&host, &failing),
            Err(ProtocolError::ArbitraryStaticCallFailed { target: BROKEN })
        );
    }

    #[test]
    fn test_state_root_tracks_state() {
        let mut protocol = protocol();
        let before = protocol.state_root_hex();
        protocol.increase_nonce(MAKER).unwrap();
        assert_ne!(protocol.state_root_hex(), before);
        assert_eq!(hex::encode(protocol.state_root()), protocol.state_root_hex());
    }
}
