//! Amount calculation.
//!
//! Converts between the two sides of an order and resolves a fill request
//! against what remains of it.
//!
//! ## Rounding
//!
//! The derived side always rounds in the maker's favour:
//!
//! - taking derived from making rounds **up**
//! - making derived from taking rounds **down**
//!
//! A derived amount of zero is a degenerate swap and is rejected.

use alloy::primitives::{Address, Bytes, U256};

use crate::error::{OrderError, ProtocolError, ProtocolResult};
use crate::host::ChainView;
use crate::types::{AmountGetter, FillMode, Order};

// ============================================================================
// Linear formulas
// ============================================================================

/// Making amount bought by `swap_taking`, rounded down.
///
/// # Arguments
///
/// * `order_making` - Order's declared making amount
/// * `order_taking` - Order's declared taking amount
/// * `swap_taking` - Taking amount of this fill
///
/// # Returns
///
/// * `Ok(U256)` - `floor(swap_taking * order_making / order_taking)`
/// * `Err(AmountOverflow)` - If the product does not fit 256 bits
///
/// # Example
///
/// ```
/// use alloy::primitives::U256;
/// use limit_order_protocol::amount::get_making_amount;
///
/// let making = get_making_amount(U256::from(2), U256::from(10), U256::from(9)).unwrap();
/// assert_eq!(making, U256::from(1));
/// ```
pub fn get_making_amount(order_making: U256, order_taking: U256, swap_taking: U256) -> ProtocolResult<U256> {
    if order_taking.is_zero() {
        return Err(OrderError::ZeroTakingAmount.into());
    }
    let product = swap_taking
        .checked_mul(order_making)
        .ok_or(ProtocolError::AmountOverflow)?;
    Ok(product / order_taking)
}

/// Taking amount owed for `swap_making`, rounded up.
///
/// # Arguments
///
/// * `order_making` - Order's declared making amount
/// * `order_taking` - Order's declared taking amount
/// * `swap_making` - Making amount of this fill
///
/// # Returns
///
/// * `Ok(U256)` - `ceil(swap_making * order_taking / order_making)`
/// * `Err(AmountOverflow)` - If the product does not fit 256 bits
///
/// # Example
///
/// ```
/// use alloy::primitives::U256;
/// use limit_order_protocol::amount::get_taking_amount;
///
/// let taking = get_taking_amount(U256::from(10), U256::from(2), U256::from(4)).unwrap();
/// assert_eq!(taking, U256::from(1));
/// ```
pub fn get_taking_amount(order_making: U256, order_taking: U256, swap_making: U256) -> ProtocolResult<U256> {
    if order_making.is_zero() {
        return Err(OrderError::ZeroMakingAmount.into());
    }
    let product = swap_making
        .checked_mul(order_taking)
        .ok_or(ProtocolError::AmountOverflow)?;
    let quotient = product / order_making;
    if (product % order_making).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1))
    }
}

/// Linear making equivalent of `taking`, ignoring the order's making getter.
fn linear_making(order: &Order, taking: U256) -> ProtocolResult<U256> {
    get_making_amount(order.making_amount, order.taking_amount, taking)
}

// ============================================================================
// Calculator
// ============================================================================

/// Applies an order's amount getters, calling out to external calculators
/// through the host view.
pub struct AmountCalculator<'a, V: ChainView + ?Sized> {
    view: &'a V,
}

impl<'a, V: ChainView + ?Sized> AmountCalculator<'a, V> {
    pub fn new(view: &'a V) -> Self {
        Self { view }
    }

    /// Making amount for a fill of `taking` taker units.
    pub fn making_for(&self, order: &Order, taking: U256) -> ProtocolResult<U256> {
        match &order.get_making_amount {
            AmountGetter::Linear => get_making_amount(order.making_amount, order.taking_amount, taking),
            AmountGetter::Disabled if taking == order.taking_amount => Ok(order.making_amount),
            AmountGetter::Disabled => Err(ProtocolError::WrongAmount),
            AmountGetter::External { target, data } => self.call(*target, data, order, taking),
        }
    }

    /// Taking amount for a fill of `making` maker units.
    pub fn taking_for(&self, order: &Order, making: U256) -> ProtocolResult<U256> {
        match &order.get_taking_amount {
            AmountGetter::Linear => get_taking_amount(order.making_amount, order.taking_amount, making),
            AmountGetter::Disabled if making == order.making_amount => Ok(order.taking_amount),
            AmountGetter::Disabled => Err(ProtocolError::WrongAmount),
            AmountGetter::External { target, data } => self.call(*target, data, order, making),
        }
    }

    /// `data ‖ orderMaking ‖ orderTaking ‖ requested`, first returned word.
    fn call(&self, target: Address, data: &Bytes, order: &Order, requested: U256) -> ProtocolResult<U256> {
        let mut input = Vec::with_capacity(data.len() + 96);
        input.extend_from_slice(data);
        input.extend_from_slice(&order.making_amount.to_be_bytes::<32>());
        input.extend_from_slice(&order.taking_amount.to_be_bytes::<32>());
        input.extend_from_slice(&requested.to_be_bytes::<32>());

        self.view
            .static_call(target, &input)
            .ok()
            .filter(|out| out.len() >= 32)
            .map(|out| U256::from_be_slice(&out[..32]))
            .ok_or(ProtocolError::AmountCallFailed { target })
    }

    /// Resolve a fill request against `available` taker units.
    ///
    /// Exactly one of `making` / `taking` is the request; both zero means
    /// "fill everything that remains". Requests larger than `available`
    /// are silently capped.
    ///
    /// # Returns
    ///
    /// `(mode, making, taking)` with both amounts non-zero and
    /// `taking <= available`.
    pub fn resolve(
        &self,
        order: &Order,
        available: U256,
        making: U256,
        taking: U256,
    ) -> ProtocolResult<(FillMode, U256, U256)> {
        let (mode, making, taking) = match (making.is_zero(), taking.is_zero()) {
            (false, false) => return Err(ProtocolError::OnlyOneAmountShouldBeZero),
            (false, true) => self.by_making(order, available, making)?,
            (true, false) => self.by_taking(order, available, taking)?,
            // Drive from the side without an override, linear first.
            (true, true) => match (&order.get_making_amount, &order.get_taking_amount) {
                (AmountGetter::Linear, _) => self.by_taking(order, available, available)?,
                (_, AmountGetter::Linear) => self.by_making(order, available, linear_making(order, available)?)?,
                (AmountGetter::Disabled, _) => self.by_taking(order, available, available)?,
                (_, AmountGetter::Disabled) => self.by_making(order, available, linear_making(order, available)?)?,
                _ => return Err(ProtocolError::OnlyOneAmountShouldBeZero),
            },
        };

        if making.is_zero() || taking.is_zero() {
            return Err(ProtocolError::SwapWithZeroAmount);
        }
        Ok((mode, making, taking))
    }

    fn by_making(&self, order: &Order, available: U256, requested: U256) -> ProtocolResult<(FillMode, U256, U256)> {
        let mut making = requested;
        let mut taking = self.taking_for(order, making)?;

        if taking > available {
            making = linear_making(order, available)?.min(requested);
            taking = self.taking_for(order, making)?;
            if taking > available {
                return Err(ProtocolError::WrongAmount);
            }
        }
        Ok((FillMode::ByMaking, making, taking))
    }

    fn by_taking(&self, order: &Order, available: U256, requested: U256) -> ProtocolResult<(FillMode, U256, U256)> {
        let taking = requested.min(available);
        let making = self.making_for(order, taking)?;
        Ok((FillMode::ByTaking, making, taking))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
