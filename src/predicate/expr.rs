//! Predicate expression tree and builders.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;

use crate::abi::{IProtocolViews, IERC20};

/// Decoded predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// True iff every operand is true; stops at the first false one
    And(Vec<Predicate>),

    /// True iff some operand is true; stops at the first true one
    Or(Vec<Predicate>),

    /// `word(call) == value`
    Eq { value: U256, call: Box<Predicate> },

    /// `word(call) < value`
    Lt { value: U256, call: Box<Predicate> },

    /// `word(call) > value`
    Gt { value: U256, call: Box<Predicate> },

    /// Host time strictly below the bound
    TimestampBelow(U256),

    /// Account nonce equals `nonce`
    NonceEquals { account: Address, nonce: U256 },

    /// First word returned by a read-only call to `target`
    ArbitraryStaticCall { target: Address, data: Bytes },

    /// Raw call against the protocol's own read-only surface
    SelfCall(Bytes),
}

impl Predicate {
    pub fn and(operands: Vec<Predicate>) -> Self {
        Predicate::And(operands)
    }

    pub fn or(operands: Vec<Predicate>) -> Self {
        Predicate::Or(operands)
    }

    pub fn eq(value: U256, call: Predicate) -> Self {
        Predicate::Eq {
            value,
            call: Box::new(call),
        }
    }

    pub fn lt(value: U256, call: Predicate) -> Self {
        Predicate::Lt {
            value,
            call: Box::new(call),
        }
    }

    pub fn gt(value: U256, call: Predicate) -> Self {
        Predicate::Gt {
            value,
            call: Box::new(call),
        }
    }

    pub fn timestamp_below(time: u64) -> Self {
        Predicate::TimestampBelow(U256::from(time))
    }

    pub fn nonce_equals(account: Address, nonce: U256) -> Self {
        Predicate::NonceEquals { account, nonce }
    }

    pub fn arbitrary_static_call(target: Address, data: impl Into<Bytes>) -> Self {
        Predicate::ArbitraryStaticCall {
            target,
            data: data.into(),
        }
    }

    /// `token.balanceOf(account)` as an operand for `eq` / `lt` / `gt`.
    pub fn balance_of(token: Address, account: Address) -> Self {
        let data = IERC20::balanceOfCall { account }.abi_encode();
        Self::arbitrary_static_call(token, data)
    }

    /// The protocol's nonce for `account`.
    pub fn protocol_nonce(account: Address) -> Self {
        Predicate::SelfCall(IProtocolViews::nonceCall { account }.abi_encode().into())
    }

    /// The protocol's remaining amount for `order_hash`.
    pub fn protocol_remaining(order_hash: B256) -> Self {
        Predicate::SelfCall(
            IProtocolViews::remainingCall {
                orderHash: order_hash,
            }
            .abi_encode()
            .into(),
        )
    }

    /// Nesting depth; leaves are depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Predicate::And(operands) | Predicate::Or(operands) => {
                1 + operands.iter().map(Predicate::depth).max().unwrap_or(0)
            }
            Predicate::Eq { call, .. } | Predicate::Lt { call, .. } | Predicate::Gt { call, .. } => {
                1 + call.depth()
            }
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_depth() {
        let account = address!("0x0000000000000000000000000000000000000b0b");
        assert_eq!(Predicate::timestamp_below(1).depth(), 1);
        assert_eq!(Predicate::and(vec![]).depth(), 1);

        let nested = Predicate::or(vec![
            Predicate::timestamp_below(1),
            Predicate::and(vec![Predicate::eq(U256::ZERO, Predicate::protocol_nonce(account))]),
        ]);
        assert_eq!(nested.depth(), 4);
    }

    #[test]
    fn test_balance_of_builds_erc20_call() {
        let token = address!("0x00000000000000000000000000000000000070e0");
        let account = address!("0x0000000000000000000000000000000000000b0b");
        match Predicate::balance_of(token, account) {
            Predicate::ArbitraryStaticCall { target, data } => {
                assert_eq!(target, token);
                assert_eq!(&data[..4], &IERC20::balanceOfCall::SELECTOR[..]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
