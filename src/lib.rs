//! # Limit Order Protocol
//!
//! Off-chain signed limit orders, settled on demand by takers.
//!
//! ## Architecture
//!
//! - **Types**: Orders, fill requests and their wire forms
//! - **Auth**: EIP-712 hashing and signature verification
//! - **Predicate**: Boolean conditions over chain state
//! - **Amount**: Conversions between the two sides of an order
//! - **State**: Remaining-amount ledger and nonce counters
//! - **Engine**: The fill pipeline, cancellation and queries
//! - **Host**: Capabilities the protocol consumes (time, calls, transfers,
//!   permits, callbacks) and an in-memory implementation
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical operation sequences produce identical
//!    state roots
//! 2. **Integer Math**: All amounts are `U256`; rounding favours the maker
//! 3. **Atomic Fills**: A failed fill leaves ledger, nonces and host
//!    balances untouched
//! 4. **Synchronous Execution**: No async anywhere in the fill path

// ============================================================================
// Module declarations
// ============================================================================

/// Solidity ABI bindings
pub mod abi;

/// Amount conversion and fill resolution
pub mod amount;

/// EIP-712 hashing and signatures
pub mod auth;

/// Deployment configuration
pub mod config;

/// Fill engine
pub mod engine;

/// Error types
pub mod error;

/// Host capabilities and the in-memory host
pub mod host;

/// Order predicates
pub mod predicate;

/// Ledger and nonces
pub mod state;

/// Core data types
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use amount::AmountCalculator;
pub use auth::OrderAuthorization;
pub use config::ProtocolConfig;
pub use engine::LimitOrderProtocol;
pub use error::{ProtocolError, ProtocolResult};
pub use host::{Host, MemoryHost};
pub use predicate::{Predicate, PredicateEvaluator};
pub use state::{NonceManager, ProtocolState, RemainingLedger};
pub use types::{AmountGetter, AssetPermit, FillRequest, FillResult, Interaction, Order, OrderStatus, Permit};
