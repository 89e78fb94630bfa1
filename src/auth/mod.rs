//! Order authorization (EIP-712).
//!
//! ## Hashing
//!
//! An order's identity is its EIP-712 signing digest:
//!
//! ```text
//! keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ hashStruct(order))
//! ```
//!
//! The domain binds the protocol name, version, chain id and verifying
//! contract, so the same order on another deployment is a different order.
//! The digest keys the remaining-amount ledger.
//!
//! ## Verification
//!
//! [`OrderAuthorization::verify`] fails closed: wrong lengths, malformed or
//! malleable signatures and recovery failures all yield `false`.
//!
//! ```
//! use alloy::primitives::{address, B256, U256};
//! use alloy::signers::local::PrivateKeySigner;
//! use limit_order_protocol::auth::OrderAuthorization;
//! use limit_order_protocol::config::ProtocolConfig;
//! use limit_order_protocol::types::Order;
//!
//! let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(1)).unwrap();
//! let auth = OrderAuthorization::new(&ProtocolConfig::default());
//!
//! let order = Order::new(
//!     U256::from(1),
//!     address!("0x00000000000000000000000000000000000000a0"),
//!     address!("0x00000000000000000000000000000000000000b0"),
//!     signer.address(),
//!     U256::from(100),
//!     U256::from(250),
//! )
//! .unwrap();
//!
//! let signature = auth.sign(&order, &signer).unwrap();
//! assert!(auth.verify(&order, &signature));
//! ```

mod signature;

use alloy::primitives::{Bytes, B256};
use alloy::signers::SignerSync;
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct};

use crate::config::ProtocolConfig;
use crate::types::Order;

pub use signature::{parse_signature, recover_signer, SECP256K1N_HALF};

/// Hashes, signs and verifies orders for one protocol deployment.
#[derive(Debug, Clone)]
pub struct OrderAuthorization {
    domain: Eip712Domain,
    separator: B256,
}

impl OrderAuthorization {
    pub fn new(config: &ProtocolConfig) -> Self {
        let domain = eip712_domain! {
            name: config.name.clone(),
            version: config.version.clone(),
            chain_id: config.chain_id,
            verifying_contract: config.verifying_contract,
        };
        let separator = domain.separator();
        Self { domain, separator }
    }

    #[inline]
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    #[inline]
    pub fn domain_separator(&self) -> B256 {
        self.separator
    }

    /// EIP-712 signing digest; the order's identity.
    pub fn hash(&self, order: &Order) -> B256 {
        order.to_message().eip712_signing_hash(&self.domain)
    }

    /// Domain-free `hashStruct(order)`.
    pub fn struct_hash(&self, order: &Order) -> B256 {
        order.to_message().eip712_hash_struct()
    }

    /// True iff `signature` over [`hash`](Self::hash) recovers to the maker.
    pub fn verify(&self, order: &Order, signature: &[u8]) -> bool {
        self.verify_hash(order, &self.hash(order), signature)
    }

    /// [`verify`](Self::verify) with a precomputed digest.
    pub fn verify_hash(&self, order: &Order, hash: &B256, signature: &[u8]) -> bool {
        recover_signer(hash, signature) == Some(order.maker)
    }

    /// Sign `order` with `signer`; returns the 65-byte `r ‖ s ‖ v` form.
    pub fn sign<S: SignerSync>(&self, order: &Order, signer: &S) -> Result<Bytes, alloy::signers::Error> {
        let signature = signer.sign_hash_sync(&self.hash(order))?;
        Ok(Bytes::copy_from_slice(&signature.as_bytes()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AmountGetter, Interaction};
    use alloy::primitives::{address, keccak256, Address, U256};
    use alloy::signers::local::PrivateKeySigner;

    const ORDER_TYPE: &str = "Order(uint256 salt,address makerAsset,address takerAsset,address maker,address receiver,address allowedSender,uint256 makingAmount,uint256 takingAmount,bytes makerAssetData,bytes takerAssetData,bytes getMakingAmount,bytes getTakingAmount,bytes predicate,bytes permit,bytes interaction)";

    fn signer() -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(0x33)).unwrap()
    }

    fn order(maker: Address) -> Order {
        Order::new(
            U256::from(7),
            address!("0x00000000000000000000000000000000000000a0"),
            address!("0x00000000000000000000000000000000000000b0"),
            maker,
            U256::from(100),
            U256::from(250),
        )
        .unwrap()
    }

    fn auth() -> OrderAuthorization {
        OrderAuthorization::new(&ProtocolConfig::new(
            1,
            address!("0x1111111111111111111111111111111111111111"),
        ))
    }

    #[test]
    fn test_type_string() {
        let message = order(Address::ZERO).to_message();
        assert_eq!(crate::abi::Order::eip712_encode_type(), ORDER_TYPE);
        assert_eq!(message.eip712_type_hash(), keccak256(ORDER_TYPE));
    }

    #[test]
    fn test_sign_then_verify() {
        let signer = signer();
        let auth = auth();
        let order = order(signer.address());
        let signature = auth.sign(&order, &signer).unwrap();
        assert_eq!(signature.len(), 65);
        assert!(auth.verify(&order, &signature));
    }

    #[test]
    fn test_any_field_change_invalidates() {
        let signer = signer();
        let auth = auth();
        let original = order(signer.address());
        let signature = auth.sign(&original, &signer).unwrap();

        let mutations: Vec<Order> = vec![
            Order { salt: U256::from(8), ..original.clone() },
            Order { making_amount: U256::from(101), ..original.clone() },
            Order { taking_amount: U256::from(249), ..original.clone() },
            original.clone().with_receiver(Address::repeat_byte(9)),
            original.clone().with_allowed_sender(Address::repeat_byte(9)),
            original.clone().with_maker_asset_data(vec![1u8]),
            original.clone().without_partial_fills(),
            original.clone().with_getters(AmountGetter::Linear, AmountGetter::external(Address::repeat_byte(5), vec![1u8])),
            original.clone().with_predicate(vec![0u8; 4]),
            original.clone().with_interaction(Interaction::new(Address::repeat_byte(3), vec![0u8])),
        ];
        for mutated in mutations {
            assert_ne!(auth.hash(&mutated), auth.hash(&original));
            assert!(!auth.verify(&mutated, &signature));
        }
    }

    #[test]
    fn test_domain_binds_hash() {
        let order = order(Address::ZERO);
        let other = OrderAuthorization::new(&ProtocolConfig::new(
            5,
            address!("0x1111111111111111111111111111111111111111"),
        ));
        assert_ne!(auth().hash(&order), other.hash(&order));
        assert_eq!(auth().struct_hash(&order), other.struct_hash(&order));
        assert_ne!(auth().domain_separator(), other.domain_separator());
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let signer = signer();
        let auth = auth();
        let order = order(Address::repeat_byte(0xaa));
        let signature = auth.sign(&order, &signer).unwrap();
        assert!(!auth.verify(&order, &signature));
        assert!(!auth.verify(&order, &signature[..10]));
    }
}
