//! Order predicates.
//!
//! A predicate is a boolean expression over chain state that must hold for
//! an order to be fillable. On the wire it is a call fragment: a 4-byte
//! selector followed by ABI arguments (see [`crate::abi::IPredicates`]).
//! The buffer is decoded once into a [`Predicate`] tree and evaluated by
//! [`PredicateEvaluator`].
//!
//! ## Primitives
//!
//! | Node | Result word |
//! |------|-------------|
//! | `and` / `or` | 1 iff all / any operand is 1 (short-circuit) |
//! | `eq` / `lt` / `gt` | 1 iff the operand's word is `==` / `<` / `>` the value |
//! | `timestampBelow` | 1 iff the host clock is below the bound |
//! | `nonceEquals` | 1 iff the account's nonce matches |
//! | `arbitraryStaticCall` | first word returned by a read-only call |
//! | self call | `nonce(address)` / `remaining(bytes32)` on the protocol |
//!
//! ## Example
//!
//! ```
//! use alloy::primitives::{address, U256};
//! use limit_order_protocol::predicate::Predicate;
//!
//! let maker = address!("0x00000000000000000000000000000000000000c0");
//! let predicate = Predicate::and(vec![
//!     Predicate::timestamp_below(1_700_000_000),
//!     Predicate::nonce_equals(maker, U256::ZERO),
//! ]);
//!
//! let bytes = predicate.encode().unwrap();
//! assert_eq!(Predicate::decode(&bytes).unwrap(), predicate);
//! ```

mod codec;
mod eval;
mod expr;

pub use eval::PredicateEvaluator;
pub use expr::Predicate;

/// Deepest nesting a predicate buffer may have.
pub const MAX_PREDICATE_DEPTH: usize = 16;

/// Most operands an `and` / `or` node can carry (eight 32-bit offsets).
pub const MAX_OPERANDS: usize = 8;
