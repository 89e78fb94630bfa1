//! Predicate evaluation.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::SolInterface;
use tracing::trace;

use super::expr::Predicate;
use crate::abi::IProtocolViews::IProtocolViewsCalls;
use crate::error::PredicateError;
use crate::host::ChainView;
use crate::state::ProtocolState;

const TRUE: U256 = U256::from_limbs([1, 0, 0, 0]);
const FALSE: U256 = U256::ZERO;

#[inline]
fn word(flag: bool) -> U256 {
    if flag {
        TRUE
    } else {
        FALSE
    }
}

/// Evaluates predicates against a host view and the protocol state.
pub struct PredicateEvaluator<'a, V: ChainView + ?Sized> {
    view: &'a V,
    state: &'a ProtocolState,
}

impl<'a, V: ChainView + ?Sized> PredicateEvaluator<'a, V> {
    pub fn new(view: &'a V, state: &'a ProtocolState) -> Self {
        Self { view, state }
    }

    /// Decode `bytes` and check it. See [`check`](Self::check).
    pub fn check_bytes(&self, bytes: &[u8]) -> Result<bool, PredicateError> {
        let predicate = Predicate::decode(bytes)?;
        self.check(&predicate)
    }

    /// True iff the predicate evaluates to the word `1`.
    ///
    /// Only a failing root node is an error (for example a top-level
    /// `arbitraryStaticCall` that reverts); failures below the root are
    /// already folded into false by [`eval`](Self::eval).
    pub fn check(&self, predicate: &Predicate) -> Result<bool, PredicateError> {
        let result = self.eval(predicate)?;
        trace!(result = %result, "predicate evaluated");
        Ok(result == TRUE)
    }

    /// Evaluate to a 256-bit word.
    ///
    /// Operands of `and`, `or`, `eq`, `lt` and `gt` that fail are treated
    /// as false; only leaves return errors.
    pub fn eval(&self, predicate: &Predicate) -> Result<U256, PredicateError> {
        match predicate {
            Predicate::And(operands) => {
                for operand in operands {
                    if !self.is_true(operand) {
                        return Ok(FALSE);
                    }
                }
                Ok(TRUE)
            }
            Predicate::Or(operands) => {
                for operand in operands {
                    if self.is_true(operand) {
                        return Ok(TRUE);
                    }
                }
                Ok(FALSE)
            }
            Predicate::Eq { value, call } => Ok(self.compare(call, |result| result == *value)),
            Predicate::Lt { value, call } => Ok(self.compare(call, |result| result < *value)),
            Predicate::Gt { value, call } => Ok(self.compare(call, |result| result > *value)),
            Predicate::TimestampBelow(time) => Ok(word(U256::from(self.view.timestamp()) < *time)),
            Predicate::NonceEquals { account, nonce } => {
                Ok(word(self.state.nonces().nonce_equals(*account, *nonce)))
            }
            Predicate::ArbitraryStaticCall { target, data } => self
                .view
                .static_call(*target, data)
                .ok()
                .filter(|out| out.len() >= 32)
                .map(|out| U256::from_be_slice(&out[..32]))
                .ok_or(PredicateError::ArbitraryStaticCallFailed { target: *target }),
            Predicate::SelfCall(raw) => self.self_call(raw),
        }
    }

    #[inline]
    fn is_true(&self, predicate: &Predicate) -> bool {
        matches!(self.eval(predicate), Ok(result) if result == TRUE)
    }

    fn compare(&self, call: &Predicate, op: impl Fn(U256) -> bool) -> U256 {
        match self.eval(call) {
            Ok(result) => word(op(result)),
            Err(_) => FALSE,
        }
    }

    fn self_call(&self, raw: &[u8]) -> Result<U256, PredicateError> {
        let call = IProtocolViewsCalls::abi_decode(raw).map_err(|_| PredicateError::UnknownSelector {
            selector: Bytes::copy_from_slice(&raw[..raw.len().min(4)]),
        })?;
        match call {
            IProtocolViewsCalls::nonce(call) => Ok(self.state.nonces().nonce(call.account)),
            IProtocolViewsCalls::remaining(call) => self
                .state
                .ledger()
                .get(&call.orderHash)
                .ok_or(PredicateError::SelfCallReverted("unknown order")),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
