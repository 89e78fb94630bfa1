//! ECDSA signature recovery.
//!
//! Accepts the two encodings in use on EVM chains:
//!
//! - 65 bytes: `r ‖ s ‖ v`, with `v` in `{0, 1, 27, 28}` (EIP-155 style
//!   `v` values are rejected)
//! - 64 bytes: EIP-2098 compact `r ‖ (yParity << 255 | s)`
//!
//! Signatures with `s` in the upper half of the curve order are malleable
//! and rejected.

use alloy::primitives::{uint, Address, Signature, B256, U256};

/// `secp256k1n / 2`. Larger `s` values are rejected.
pub const SECP256K1N_HALF: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// Parse a 65- or 64-byte signature. `None` for any other length, a bad
/// recovery id, or a high `s`.
pub fn parse_signature(bytes: &[u8]) -> Option<Signature> {
    let signature = match bytes.len() {
        65 if matches!(bytes[64], 0 | 1 | 27 | 28) => Signature::from_raw(bytes).ok()?,
        64 => Signature::from_erc2098(bytes),
        _ => return None,
    };
    if signature.s() > SECP256K1N_HALF || signature.r().is_zero() || signature.s().is_zero() {
        return None;
    }
    Some(signature)
}

/// Address that signed `hash`, or `None` if the signature is unusable.
pub fn recover_signer(hash: &B256, signature: &[u8]) -> Option<Address> {
    parse_signature(signature)?
        .recover_address_from_prehash(hash)
        .ok()
}
