//! Core data types for the limit order protocol.
//!
//! ## Types
//!
//! - [`Order`]: A maker's signed swap intent
//! - [`AmountGetter`]: Linear, disabled, or external amount conversion
//! - [`Permit`] / [`AssetPermit`]: Signature-based allowances
//! - [`Interaction`]: Post-fill callback target and data
//! - [`FillRequest`] / [`FillResult`]: Input and output of a fill
//!
//! ## Amounts
//!
//! All amounts are raw `U256` token units. There is no decimal scaling in
//! the protocol; conversions round with floor/ceil as described in
//! [`crate::amount`].

mod fill;
mod getter;
mod interaction;
mod order;
mod permit;

pub use fill::{FillMode, FillRequest, FillResult, OrderStatus};
pub use getter::{AmountGetter, GetterKind};
pub use interaction::Interaction;
pub use order::Order;
pub use permit::{AssetPermit, Permit};
