//! Fill engine for the limit order protocol.
//!
//! ## Design Principles
//!
//! 1. **Atomicity**: a fill either completes or leaves no trace. Every fill
//!    opens a journal checkpoint on the protocol state and a host snapshot;
//!    any error reverts both.
//! 2. **Effects before interactions**: the remaining-amount ledger is
//!    written before the first permit, transfer or callback, so a
//!    re-entrant fill always sees the decremented amount.
//! 3. **Synchronous execution**: every operation runs to completion on
//!    `&mut self`.
//!
//! ## Fill Pipeline
//!
//! | Step | Failure |
//! |------|---------|
//! | request shape, order invariants | `OnlyOneAmountShouldBeZero`, `InvalidOrder` |
//! | signature (ECDSA, then the host's contract check) | `BadSignature` |
//! | allowed sender | `PrivateOrder` |
//! | ledger lookup | `RemainingAmountIsZero` |
//! | predicate | `PredicateIsNotTrue`, `ArbitraryStaticCallFailed` |
//! | amount resolution and threshold | `SwapWithZeroAmount`, `WrongAmount`, `TakingAmountTooHigh`, `MakingAmountTooLow` |
//! | ledger write | |
//! | permits, transfers, callback | `Permit`, `Transfer`, `Interaction` |
//!
//! ## Example
//!
//! ```
//! use alloy::primitives::{address, Address, Bytes, B256, U256};
//! use alloy::signers::local::PrivateKeySigner;
//! use limit_order_protocol::config::ProtocolConfig;
//! use limit_order_protocol::engine::LimitOrderProtocol;
//! use limit_order_protocol::host::MemoryHost;
//! use limit_order_protocol::types::Order;
//!
//! let protocol_address = address!("0x1111111111111111111111111111111111111111");
//! let weth = address!("0x00000000000000000000000000000000000000a0");
//! let dai = address!("0x00000000000000000000000000000000000000b0");
//! let taker = address!("0x00000000000000000000000000000000000000d0");
//!
//! let maker = PrivateKeySigner::from_bytes(&B256::repeat_byte(1)).unwrap();
//! let mut protocol = LimitOrderProtocol::new(ProtocolConfig::new(1, protocol_address));
//!
//! let mut host = MemoryHost::new(1, 1_000);
//! host.deploy_token(weth, "Wrapped Ether");
//! host.deploy_token(dai, "Dai");
//! host.mint(weth, maker.address(), U256::from(100));
//! host.mint(dai, taker, U256::from(250));
//! host.approve(weth, maker.address(), protocol_address, U256::MAX);
//! host.approve(dai, taker, protocol_address, U256::MAX);
//!
//! let order = Order::new(U256::from(1), weth, dai, maker.address(), U256::from(100), U256::from(250)).unwrap();
//! let signature = protocol.authorization().sign(&order, &maker).unwrap();
//!
//! let result = protocol
//!     .fill_order(&mut host, taker, &order, &signature, Bytes::new(), U256::from(40), U256::ZERO, U256::from(100))
//!     .unwrap();
//!
//! assert_eq!(result.taking_amount, U256::from(100));
//! assert_eq!(host.balance_of(weth, taker), U256::from(40));
//! assert_eq!(protocol.remaining(result.order_hash).unwrap(), U256::from(150));
//! ```

mod fill;
mod protocol;

pub use protocol::LimitOrderProtocol;
