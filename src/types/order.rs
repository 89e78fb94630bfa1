//! Signed limit orders.
//!
//! ## Identity
//!
//! An [`Order`] is content-addressed: its hash (see [`crate::auth`]) is a
//! pure function of every field below. Typed fields (`AmountGetter`,
//! `Permit`, `Interaction`) have exactly one byte encoding, and
//! [`Order::from_message`] rejects signed bytes that would not re-encode to
//! themselves, so decoding never changes an order's identity.
//!
//! ## Example
//!
//! ```
//! use alloy::primitives::{address, U256};
//! use limit_order_protocol::types::Order;
//!
//! let order = Order::new(
//!     U256::from(1),                                              // salt
//!     address!("0x00000000000000000000000000000000000000a0"),     // maker asset
//!     address!("0x00000000000000000000000000000000000000b0"),     // taker asset
//!     address!("0x00000000000000000000000000000000000000c0"),     // maker
//!     U256::from(100),                                            // making amount
//!     U256::from(250),                                            // taking amount
//! )
//! .unwrap();
//!
//! assert_eq!(order.receiver_or_maker(), order.maker);
//! assert!(order.allows(address!("0x00000000000000000000000000000000000000d0")));
//! ```

use alloy::primitives::{Address, Bytes, U256};

use crate::abi;
use crate::error::OrderError;
use crate::types::getter::{AmountGetter, GetterKind};
use crate::types::interaction::Interaction;
use crate::types::permit::Permit;

// ============================================================================
// Order struct
// ============================================================================

/// A maker's signed intent to swap `making_amount` of `maker_asset` for
/// `taking_amount` of `taker_asset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Arbitrary disambiguator
    pub salt: U256,

    /// Asset the maker gives
    pub maker_asset: Address,

    /// Asset the maker receives
    pub taker_asset: Address,

    /// Authorizing account
    pub maker: Address,

    /// Receives the taker asset; zero means the maker
    pub receiver: Address,

    /// Zero means any taker; otherwise the only account allowed to fill
    pub allowed_sender: Address,

    /// Total maker asset on offer
    pub making_amount: U256,

    /// Total taker asset requested
    pub taking_amount: U256,

    /// Transfer data for the maker asset; empty means a standard transfer
    pub maker_asset_data: Bytes,

    /// Transfer data for the taker asset; empty means a standard transfer
    pub taker_asset_data: Bytes,

    /// Making amount derived from a taking amount
    pub get_making_amount: AmountGetter,

    /// Taking amount derived from a making amount
    pub get_taking_amount: AmountGetter,

    /// Encoded predicate (see [`crate::predicate`]); empty means none
    pub predicate: Bytes,

    /// Maker permit for `maker_asset`, executed on the first fill
    pub permit: Option<Permit>,

    /// Post-fill callback
    pub interaction: Option<Interaction>,
}

impl Order {
    /// Create a public order with linear pricing and no conditions.
    ///
    /// # Errors
    ///
    /// Either amount is zero.
    pub fn new(
        salt: U256,
        maker_asset: Address,
        taker_asset: Address,
        maker: Address,
        making_amount: U256,
        taking_amount: U256,
    ) -> Result<Self, OrderError> {
        let order = Self {
            salt,
            maker_asset,
            taker_asset,
            maker,
            receiver: Address::ZERO,
            allowed_sender: Address::ZERO,
            making_amount,
            taking_amount,
            maker_asset_data: Bytes::new(),
            taker_asset_data: Bytes::new(),
            get_making_amount: AmountGetter::Linear,
            get_taking_amount: AmountGetter::Linear,
            predicate: Bytes::new(),
            permit: None,
            interaction: None,
        };
        order.validate()?;
        Ok(order)
    }

    // ========================================================================
    // Builder-style setters
    // ========================================================================

    #[must_use]
    pub fn with_receiver(mut self, receiver: Address) -> Self {
        self.receiver = receiver;
        self
    }

    #[must_use]
    pub fn with_allowed_sender(mut self, sender: Address) -> Self {
        self.allowed_sender = sender;
        self
    }

    #[must_use]
    pub fn with_maker_asset_data(mut self, data: impl Into<Bytes>) -> Self {
        self.maker_asset_data = data.into();
        self
    }

    #[must_use]
    pub fn with_taker_asset_data(mut self, data: impl Into<Bytes>) -> Self {
        self.taker_asset_data = data.into();
        self
    }

    #[must_use]
    pub fn with_getters(mut self, making: AmountGetter, taking: AmountGetter) -> Self {
        self.get_making_amount = making;
        self.get_taking_amount = taking;
        self
    }

    /// Reject any fill that is not for the full declared size.
    #[must_use]
    pub fn without_partial_fills(self) -> Self {
        self.with_getters(AmountGetter::Disabled, AmountGetter::Disabled)
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<Bytes>) -> Self {
        self.predicate = predicate.into();
        self
    }

    #[must_use]
    pub fn with_permit(mut self, permit: Permit) -> Self {
        self.permit = Some(permit);
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Check the size invariant.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.making_amount.is_zero() {
            return Err(OrderError::ZeroMakingAmount);
        }
        if self.taking_amount.is_zero() {
            return Err(OrderError::ZeroTakingAmount);
        }
        Ok(())
    }

    /// Account that receives the taker asset.
    #[inline]
    pub fn receiver_or_maker(&self) -> Address {
        if self.receiver.is_zero() {
            self.maker
        } else {
            self.receiver
        }
    }

    /// Whether `sender` may fill this order.
    #[inline]
    pub fn allows(&self, sender: Address) -> bool {
        self.allowed_sender.is_zero() || self.allowed_sender == sender
    }

    #[inline]
    pub fn has_predicate(&self) -> bool {
        !self.predicate.is_empty()
    }

    // ========================================================================
    // Wire conversion
    // ========================================================================

    /// The EIP-712 message signed by the maker.
    pub fn to_message(&self) -> abi::Order {
        abi::Order {
            salt: self.salt,
            makerAsset: self.maker_asset,
            takerAsset: self.taker_asset,
            maker: self.maker,
            receiver: self.receiver,
            allowedSender: self.allowed_sender,
            makingAmount: self.making_amount,
            takingAmount: self.taking_amount,
            makerAssetData: self.maker_asset_data.clone(),
            takerAssetData: self.taker_asset_data.clone(),
            getMakingAmount: self.get_making_amount.encode(GetterKind::Making),
            getTakingAmount: self.get_taking_amount.encode(GetterKind::Taking),
            predicate: self.predicate.clone(),
            permit: self.permit.as_ref().map(Permit::encode).unwrap_or_default(),
            interaction: self
                .interaction
                .as_ref()
                .map(Interaction::encode)
                .unwrap_or_default(),
        }
    }

    /// Decode a signed message.
    ///
    /// # Errors
    ///
    /// Zero amounts, undecodable fields, or fields whose canonical
    /// re-encoding differs from the signed bytes.
    pub fn from_message(message: &abi::Order) -> Result<Self, OrderError> {
        let get_making_amount = AmountGetter::decode(GetterKind::Making, &message.getMakingAmount)?;
        let get_taking_amount = AmountGetter::decode(GetterKind::Taking, &message.getTakingAmount)?;
        let permit = Permit::decode_field(&message.permit)?;
        let interaction = Interaction::decode(&message.interaction)?;

        let order = Self {
            salt: message.salt,
            maker_asset: message.makerAsset,
            taker_asset: message.takerAsset,
            maker: message.maker,
            receiver: message.receiver,
            allowed_sender: message.allowedSender,
            making_amount: message.makingAmount,
            taking_amount: message.takingAmount,
            maker_asset_data: message.makerAssetData.clone(),
            taker_asset_data: message.takerAssetData.clone(),
            get_making_amount,
            get_taking_amount,
            predicate: message.predicate.clone(),
            permit,
            interaction,
        };
        order.validate()?;

        if let Some(permit) = &order.permit {
            if permit.encode() != message.permit {
                return Err(OrderError::NonCanonical { field: "permit" });
            }
        }
        Ok(order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
