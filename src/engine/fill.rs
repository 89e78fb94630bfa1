//! Fill entry points and the fill pipeline.

use alloy::primitives::{Address, Bytes, U256};
use tracing::{debug, info, warn};

use super::protocol::LimitOrderProtocol;
use crate::amount::AmountCalculator;
use crate::error::{ProtocolError, ProtocolResult};
use crate::host::{FillNotice, Host, Transfer};
use crate::types::{AssetPermit, FillMode, FillRequest, FillResult, Order};

impl LimitOrderProtocol {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Fill `order` for `caller`, delivering the maker asset to the caller.
    ///
    /// # Arguments
    ///
    /// * `host` - Environment to run in
    /// * `caller` - Taker
    /// * `order` - Signed order
    /// * `signature` - Maker's signature (65 or 64 bytes, or a contract
    ///   signature the host accepts)
    /// * `interaction` - Taker data forwarded to the order's callback
    /// * `making_amount` - Requested making amount, or zero
    /// * `taking_amount` - Requested taking amount, or zero
    /// * `threshold_amount` - Max taking (by making) or min making (by taking)
    #[allow(clippy::too_many_arguments)]
    pub fn fill_order<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        order: &Order,
        signature: &[u8],
        interaction: Bytes,
        making_amount: U256,
        taking_amount: U256,
        threshold_amount: U256,
    ) -> ProtocolResult<FillResult> {
        let request = FillRequest::new(order, signature)
            .interaction(interaction)
            .making(making_amount)
            .taking(taking_amount)
            .threshold(threshold_amount);
        self.execute(host, caller, &request)
    }

    /// [`fill_order`](Self::fill_order), delivering the maker asset to `target`.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_order_to<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        order: &Order,
        signature: &[u8],
        interaction: Bytes,
        making_amount: U256,
        taking_amount: U256,
        threshold_amount: U256,
        target: Address,
    ) -> ProtocolResult<FillResult> {
        let request = FillRequest::new(order, signature)
            .interaction(interaction)
            .making(making_amount)
            .taking(taking_amount)
            .threshold(threshold_amount)
            .to(target);
        self.execute(host, caller, &request)
    }

    /// [`fill_order_to`](Self::fill_order_to) with a taker permit executed
    /// first. `permit` is `asset (20 bytes) ‖ abi(permit)`.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_order_to_with_permit<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        order: &Order,
        signature: &[u8],
        interaction: Bytes,
        making_amount: U256,
        taking_amount: U256,
        threshold_amount: U256,
        target: Address,
        permit: &[u8],
    ) -> ProtocolResult<FillResult> {
        let permit = AssetPermit::decode(permit)?;
        let request = FillRequest::new(order, signature)
            .interaction(interaction)
            .making(making_amount)
            .taking(taking_amount)
            .threshold(threshold_amount)
            .to(target)
            .with_permit(permit);
        self.execute(host, caller, &request)
    }

    /// Run one fill atomically.
    ///
    /// On error every ledger, nonce and host change made by this fill
    /// (including fills nested in its callback) is rolled back.
    pub fn execute<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        request: &FillRequest<'_>,
    ) -> ProtocolResult<FillResult> {
        let checkpoint = self.state.checkpoint();
        let snapshot = host.snapshot();

        match self.fill_unchecked(host, caller, request) {
            Ok(result) => {
                host.release(snapshot);
                self.state.commit(checkpoint);
                info!(
                    order_hash = %result.order_hash,
                    taker = %caller,
                    making = %result.making_amount,
                    taking = %result.taking_amount,
                    remaining = %result.remaining,
                    "order filled"
                );
                Ok(result)
            }
            Err(err) => {
                host.revert_to(snapshot);
                self.state.revert(checkpoint);
                warn!(taker = %caller, error = %err, "fill reverted");
                Err(err)
            }
        }
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// The fill steps without rollback. Callers must wrap this in a
    /// checkpoint and snapshot (see [`execute`](Self::execute)).
    ///
    /// The ledger write is the last step before the first host mutation.
    fn fill_unchecked<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        request: &FillRequest<'_>,
    ) -> ProtocolResult<FillResult> {
        let order = request.order;

        if !request.making_amount.is_zero() && !request.taking_amount.is_zero() {
            return Err(ProtocolError::OnlyOneAmountShouldBeZero);
        }
        order.validate()?;

        let order_hash = self.auth.hash(order);
        if !self.auth.verify_hash(order, &order_hash, request.signature)
            && !host.is_valid_signature(order.maker, order_hash, request.signature)
        {
            return Err(ProtocolError::BadSignature);
        }

        if !order.allows(caller) {
            return Err(ProtocolError::PrivateOrder);
        }

        let entry = self.state.ledger().get(&order_hash);
        if entry == Some(U256::ZERO) {
            return Err(ProtocolError::RemainingAmountIsZero);
        }
        let first_fill = entry.is_none();
        let available = entry.unwrap_or(order.taking_amount);

        if !self.check_predicate(&*host, order)? {
            return Err(ProtocolError::PredicateIsNotTrue);
        }

        let (mode, making_amount, taking_amount) = AmountCalculator::new(&*host).resolve(
            order,
            available,
            request.making_amount,
            request.taking_amount,
        )?;

        let threshold = request.threshold_amount;
        match mode {
            FillMode::ByMaking if taking_amount > threshold => {
                return Err(ProtocolError::TakingAmountTooHigh);
            }
            FillMode::ByTaking if making_amount < threshold => {
                return Err(ProtocolError::MakingAmountTooLow);
            }
            _ => {}
        }

        let remaining = available
            .checked_sub(taking_amount)
            .ok_or(ProtocolError::WrongAmount)?;
        self.state.set_remaining(order_hash, remaining);
        debug!(
            order_hash = %order_hash,
            mode = ?mode,
            making = %making_amount,
            taking = %taking_amount,
            remaining = %remaining,
            "ledger updated"
        );

        // Interactions start here.

        if let Some(AssetPermit { asset, permit }) = &request.permit {
            host.permit(*asset, permit)?;
        }
        if first_fill {
            if let Some(permit) = &order.permit {
                host.permit(order.maker_asset, permit)?;
            }
        }

        let operator = self.address();
        host.transfer(&Transfer {
            asset: order.taker_asset,
            operator,
            from: caller,
            to: order.receiver_or_maker(),
            amount: taking_amount,
            data: &order.taker_asset_data,
        })?;
        host.transfer(&Transfer {
            asset: order.maker_asset,
            operator,
            from: order.maker,
            to: request.target.unwrap_or(caller),
            amount: making_amount,
            data: &order.maker_asset_data,
        })?;

        if let Some(interaction) = &order.interaction {
            let notice = FillNotice {
                order_hash,
                taker: caller,
                maker_asset: order.maker_asset,
                taker_asset: order.taker_asset,
                making_amount,
                taking_amount,
                maker_data: interaction.data.clone(),
                taker_data: request.interaction.clone(),
            };
            debug!(order_hash = %order_hash, target = %interaction.target, "notifying interaction");
            host.notify_fill(self, interaction.target, &notice)?;
        }

        Ok(FillResult {
            order_hash,
            making_amount,
            taking_amount,
            remaining,
        })
    }
}
