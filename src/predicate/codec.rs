//! Predicate wire codec.
//!
//! ## Operand lists
//!
//! `and` / `or` carry their operands as one concatenated byte string plus a
//! `uint256` of cumulative end offsets, 32 bits each, least-significant
//! first. The first zero offset ends the list:
//!
//! ```text
//! offsets = end0 | end1 << 32 | end2 << 64 | ...
//! data    = op0[0..end0] ‖ op1[end0..end1] ‖ op2[end1..end2] ‖ ...
//! ```
//!
//! ## Fallbacks
//!
//! Any fragment whose selector is not a predicate primitive is kept as a
//! [`Predicate::SelfCall`] and resolved against the protocol's views at
//! evaluation time. Below the root, fragments that fail to decode are kept
//! the same way, so one broken operand only makes that operand false.
//!
//! An offset that points outside the data ends the list with an empty
//! self call. Operands before it still decode, so `or(true, <bad offset>)`
//! short-circuits to true and `and(true, <bad offset>)` is false.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::{SolCall, SolInterface};

use super::expr::Predicate;
use super::{MAX_OPERANDS, MAX_PREDICATE_DEPTH};
use crate::abi::IPredicates::{self, IPredicatesCalls};
use crate::error::CodecError;

impl Predicate {
    /// Encode to a call fragment.
    ///
    /// # Errors
    ///
    /// An operand list longer than eight, an operand that does not fit a
    /// 32-bit offset, or nesting deeper than [`MAX_PREDICATE_DEPTH`].
    pub fn encode(&self) -> Result<Bytes, CodecError> {
        if self.depth() > MAX_PREDICATE_DEPTH {
            return Err(CodecError::TooDeep(MAX_PREDICATE_DEPTH));
        }
        self.encode_unchecked().map(Bytes::from)
    }

    fn encode_unchecked(&self) -> Result<Vec<u8>, CodecError> {
        let encoded = match self {
            Predicate::And(operands) => {
                let (offsets, data) = join(operands)?;
                IPredicates::andCall { offsets, data }.abi_encode()
            }
            Predicate::Or(operands) => {
                let (offsets, data) = join(operands)?;
                IPredicates::orCall { offsets, data }.abi_encode()
            }
            Predicate::Eq { value, call } => IPredicates::eqCall {
                value: *value,
                data: call.encode_unchecked()?.into(),
            }
            .abi_encode(),
            Predicate::Lt { value, call } => IPredicates::ltCall {
                value: *value,
                data: call.encode_unchecked()?.into(),
            }
            .abi_encode(),
            Predicate::Gt { value, call } => IPredicates::gtCall {
                value: *value,
                data: call.encode_unchecked()?.into(),
            }
            .abi_encode(),
            Predicate::TimestampBelow(time) => IPredicates::timestampBelowCall { time: *time }.abi_encode(),
            Predicate::NonceEquals { account, nonce } => IPredicates::nonceEqualsCall {
                makerAddress: *account,
                makerNonce: *nonce,
            }
            .abi_encode(),
            Predicate::ArbitraryStaticCall { target, data } => IPredicates::arbitraryStaticCallCall {
                target: *target,
                data: data.clone(),
            }
            .abi_encode(),
            Predicate::SelfCall(raw) => raw.to_vec(),
        };
        Ok(encoded)
    }

    /// Decode a call fragment.
    ///
    /// # Errors
    ///
    /// The root fragment is shorter than a selector, carries a predicate
    /// selector with undecodable arguments, or the buffer nests deeper than
    /// [`MAX_PREDICATE_DEPTH`].
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        decode_at(bytes, 1)
    }
}

fn decode_at(bytes: &[u8], depth: usize) -> Result<Predicate, CodecError> {
    if depth > MAX_PREDICATE_DEPTH {
        return Err(CodecError::TooDeep(MAX_PREDICATE_DEPTH));
    }
    let selector: [u8; 4] = bytes
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or(CodecError::Truncated)?;
    if !IPredicatesCalls::valid_selector(selector) {
        return Ok(Predicate::SelfCall(Bytes::copy_from_slice(bytes)));
    }

    let call = IPredicatesCalls::abi_decode(bytes).map_err(|_| CodecError::BadCallData("predicate"))?;
    let predicate = match call {
        IPredicatesCalls::and(call) => Predicate::And(split(call.offsets, &call.data, depth)?),
        IPredicatesCalls::or(call) => Predicate::Or(split(call.offsets, &call.data, depth)?),
        IPredicatesCalls::eq(call) => Predicate::Eq {
            value: call.value,
            call: Box::new(operand(&call.data, depth)?),
        },
        IPredicatesCalls::lt(call) => Predicate::Lt {
            value: call.value,
            call: Box::new(operand(&call.data, depth)?),
        },
        IPredicatesCalls::gt(call) => Predicate::Gt {
            value: call.value,
            call: Box::new(operand(&call.data, depth)?),
        },
        IPredicatesCalls::timestampBelow(call) => Predicate::TimestampBelow(call.time),
        IPredicatesCalls::nonceEquals(call) => Predicate::NonceEquals {
            account: call.makerAddress,
            nonce: call.makerNonce,
        },
        IPredicatesCalls::arbitraryStaticCall(call) => Predicate::ArbitraryStaticCall {
            target: call.target,
            data: call.data,
        },
    };
    Ok(predicate)
}

/// Decode a nested fragment. Only the depth bound is fatal; anything else
/// becomes a raw self call that fails when evaluated.
fn operand(bytes: &[u8], parent_depth: usize) -> Result<Predicate, CodecError> {
    match decode_at(bytes, parent_depth + 1) {
        Err(CodecError::TooDeep(max)) => Err(CodecError::TooDeep(max)),
        Err(_) => Ok(Predicate::SelfCall(Bytes::copy_from_slice(bytes))),
        Ok(predicate) => Ok(predicate),
    }
}

/// Split an operand list by its packed offsets. A bad offset becomes an
/// empty self call, which never evaluates true, and ends the list.
fn split(offsets: U256, data: &[u8], depth: usize) -> Result<Vec<Predicate>, CodecError> {
    let packed = offsets.to_le_bytes::<32>();
    let mut operands = Vec::new();
    let mut start = 0usize;

    for chunk in packed.chunks_exact(4) {
        let end = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        if end == 0 {
            break;
        }
        if end < start || end > data.len() {
            operands.push(Predicate::SelfCall(Bytes::new()));
            break;
        }
        operands.push(operand(&data[start..end], depth)?);
        start = end;
    }
    Ok(operands)
}

/// Concatenate operands and pack their end offsets.
fn join(operands: &[Predicate]) -> Result<(U256, Bytes), CodecError> {
    if operands.len() > MAX_OPERANDS {
        return Err(CodecError::TooManyOperands(operands.len()));
    }
    let mut offsets = U256::ZERO;
    let mut data = Vec::new();

    for (i, operand) in operands.iter().enumerate() {
        data.extend_from_slice(&operand.encode_unchecked()?);
        let end = u32::try_from(data.len()).map_err(|_| CodecError::BadOffsets)?;
        offsets |= U256::from(end) << (32 * i);
    }
    Ok((offsets, data.into()))
}
