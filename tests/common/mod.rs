//! Shared fixture for the integration tests.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;

use limit_order_protocol::{FillResult, LimitOrderProtocol, MemoryHost, Order, ProtocolConfig, ProtocolResult};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const CHAIN_ID: u64 = 31_337;
pub const PROTOCOL: Address = address!("0x1111111111111111111111111111111111111111");
pub const WETH: Address = address!("0x00000000000000000000000000000000000000a0");
pub const DAI: Address = address!("0x00000000000000000000000000000000000000b0");
pub const ITEMS: Address = address!("0x00000000000000000000000000000000000000e1");
pub const TAKER: Address = address!("0x00000000000000000000000000000000000000d0");
pub const OTHER: Address = address!("0x00000000000000000000000000000000000000d1");
pub const START_TIME: u64 = 1_700_000_000;
pub const FUNDS: u64 = 1_000_000;

pub fn key(byte: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(byte)).expect("valid key")
}

pub fn u(v: u64) -> U256 {
    U256::from(v)
}

// ============================================================================
// FIXTURE
// ============================================================================

/// Protocol, host and a funded maker / two funded takers.
pub struct Fixture {
    pub protocol: LimitOrderProtocol,
    pub host: MemoryHost,
    pub maker: PrivateKeySigner,
}

impl Fixture {
    pub fn new() -> Self {
        let maker = key(0x01);
        let mut host = MemoryHost::new(CHAIN_ID, START_TIME);
        host.deploy_token(WETH, "Wrapped Ether");
        host.deploy_token(DAI, "Dai Stablecoin");

        host.mint(WETH, maker.address(), u(FUNDS));
        host.approve(WETH, maker.address(), PROTOCOL, U256::MAX);
        for taker in [TAKER, OTHER] {
            host.mint(DAI, taker, u(FUNDS));
            host.approve(DAI, taker, PROTOCOL, U256::MAX);
        }

        Self {
            protocol: LimitOrderProtocol::new(ProtocolConfig::new(CHAIN_ID, PROTOCOL)),
            host,
            maker,
        }
    }

    /// WETH-for-DAI order from the fixture maker.
    pub fn order(&self, making: u64, taking: u64) -> Order {
        Order::new(u(1), WETH, DAI, self.maker.address(), u(making), u(taking)).expect("valid order")
    }

    pub fn sign(&self, order: &Order) -> Bytes {
        self.protocol
            .authorization()
            .sign(order, &self.maker)
            .expect("signing succeeds")
    }

    /// Fill as `TAKER` with a threshold that accepts any price and no
    /// interaction data.
    pub fn fill(&mut self, order: &Order, signature: &[u8], making: u64, taking: u64) -> ProtocolResult<FillResult> {
        self.fill_as(TAKER, order, signature, making, taking)
    }

    pub fn fill_as(
        &mut self,
        caller: Address,
        order: &Order,
        signature: &[u8],
        making: u64,
        taking: u64,
    ) -> ProtocolResult<FillResult> {
        let threshold = if making == 0 { U256::ZERO } else { U256::MAX };
        self.protocol.fill_order(
            &mut self.host,
            caller,
            order,
            signature,
            Bytes::new(),
            u(making),
            u(taking),
            threshold,
        )
    }

    pub fn balance(&self, asset: Address, holder: Address) -> U256 {
        self.host.balance_of(asset, holder)
    }
}
