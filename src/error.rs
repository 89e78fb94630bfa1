//! Error types for the limit order protocol.
//!
//! Every failure is an immediate abort: the engine reverts its journal and
//! the host snapshot before handing one of these back to the caller.

use alloy::primitives::{Address, Bytes};
use thiserror::Error;

// ============================================================================
// Protocol errors
// ============================================================================

/// Errors returned by fills, cancellations and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Signature does not recover to the order's maker
    #[error("bad signature")]
    BadSignature,

    /// Both making and taking amounts were requested
    #[error("only one amount should be zero")]
    OnlyOneAmountShouldBeZero,

    /// Computed taking amount exceeds the caller's threshold
    #[error("taking amount too high")]
    TakingAmountTooHigh,

    /// Computed making amount is below the caller's threshold
    #[error("making amount too low")]
    MakingAmountTooLow,

    /// One side of the swap resolved to zero
    #[error("can't swap zero amount")]
    SwapWithZeroAmount,

    /// Partial fill attempted on an order with partial fills disabled
    #[error("wrong amount")]
    WrongAmount,

    /// Order is fully filled or cancelled
    #[error("remaining amount is zero")]
    RemainingAmountIsZero,

    /// Caller is not the order's allowed sender
    #[error("private order")]
    PrivateOrder,

    /// The order's predicate did not evaluate to true
    #[error("predicate is not true")]
    PredicateIsNotTrue,

    /// Only the maker may cancel an order
    #[error("access denied")]
    AccessDenied,

    /// A top-level arbitrary static call reverted
    #[error("arbitrary static call to {target} failed")]
    ArbitraryStaticCallFailed { target: Address },

    /// A maker-supplied amount getter failed
    #[error("amount getter call to {target} failed")]
    AmountCallFailed { target: Address },

    /// Amount arithmetic overflowed 256 bits
    #[error("amount arithmetic overflow")]
    AmountOverflow,

    /// The ledger has no entry for this order hash
    #[error("unknown order")]
    UnknownOrder,

    /// Nonce counter would overflow
    #[error("nonce overflow")]
    NonceOverflow,

    /// Order fields violate an invariant or cannot be decoded
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    /// Permit execution failed
    #[error("permit failed: {0}")]
    Permit(#[from] PermitError),

    /// Asset transfer failed
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// Post-fill interaction failed
    #[error("interaction failed: {0}")]
    Interaction(#[from] HostError),
}

// ============================================================================
// Order construction / decoding
// ============================================================================

/// Errors raised while building or decoding an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("making amount must be > 0")]
    ZeroMakingAmount,

    #[error("taking amount must be > 0")]
    ZeroTakingAmount,

    /// Field bytes could not be decoded
    #[error("malformed {field}")]
    Malformed { field: &'static str },

    /// Field decoded, but re-encoding differs from the signed bytes
    #[error("non-canonical encoding of {field}")]
    NonCanonical { field: &'static str },
}

// ============================================================================
// Predicate codec / evaluation
// ============================================================================

/// Errors raised while decoding or encoding a predicate buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("fragment shorter than a selector")]
    Truncated,

    #[error("bad call data for {0}")]
    BadCallData(&'static str),

    #[error("offset table out of bounds")]
    BadOffsets,

    #[error("too many operands ({0}, max 8)")]
    TooManyOperands(usize),

    #[error("predicate nesting exceeds {0}")]
    TooDeep(usize),
}

/// Errors raised while evaluating a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("arbitrary static call to {target} failed")]
    ArbitraryStaticCallFailed { target: Address },

    #[error("unknown self call {selector}")]
    UnknownSelector { selector: Bytes },

    /// A self call to a protocol view reverted
    #[error("self call reverted: {0}")]
    SelfCallReverted(&'static str),
}

// ============================================================================
// Host collaborator errors
// ============================================================================

/// A read-only call reverted or could not be made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("no contract at {0}")]
    NoContract(Address),

    #[error("call reverted")]
    Reverted(Bytes),
}

/// Permit failures, each reported distinctly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermitError {
    #[error("permit expired")]
    Expired,

    #[error("invalid permit signature")]
    InvalidSignature,

    #[error("permit signature already used")]
    AlreadyUsed,

    #[error("malformed permit")]
    Malformed,

    #[error("permit not supported by {0}")]
    Unsupported(Address),
}

/// Asset transfer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("unknown asset {0}")]
    UnknownAsset(Address),

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient allowance")]
    InsufficientAllowance,

    #[error("malformed transfer data")]
    MalformedData,
}

/// Failures raised by host callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("callback rejected: {0}")]
    Rejected(String),

    #[error("nested fill failed: {0}")]
    Nested(Box<ProtocolError>),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
