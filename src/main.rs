//! Limit Order Protocol - demo binary
//!
//! Signs one order with a local key, fills part of it, then fills the rest
//! against an in-memory host. Set `RUST_LOG=debug` to see the fill pipeline.

use alloy::primitives::{address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use tracing_subscriber::EnvFilter;

use limit_order_protocol::predicate::Predicate;
use limit_order_protocol::{LimitOrderProtocol, MemoryHost, Order, ProtocolConfig, ProtocolError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("===========================================");
    println!("  Limit Order Protocol");
    println!("===========================================");
    println!();

    let mut config = ProtocolConfig::from_env();
    if config.verifying_contract.is_zero() {
        config.verifying_contract = address!("0x1111111111111111111111111111111111111111");
    }
    let protocol_address = config.verifying_contract;
    let mut protocol = LimitOrderProtocol::new(config.clone());

    let weth = address!("0x00000000000000000000000000000000000000a0");
    let dai = address!("0x00000000000000000000000000000000000000b0");
    let taker = address!("0x00000000000000000000000000000000000000d0");
    let maker = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x01))?;

    let mut host = MemoryHost::new(config.chain_id, 1_700_000_000);
    host.deploy_token(weth, "Wrapped Ether");
    host.deploy_token(dai, "Dai Stablecoin");
    host.mint(weth, maker.address(), U256::from(10));
    host.mint(dai, taker, U256::from(30_000));
    host.approve(weth, maker.address(), protocol_address, U256::MAX);
    host.approve(dai, taker, protocol_address, U256::MAX);

    // 10 WETH for 30,000 DAI, valid for one hour.
    let predicate = Predicate::timestamp_below(1_700_003_600).encode()?;
    let order = Order::new(U256::from(1), weth, dai, maker.address(), U256::from(10), U256::from(30_000))?
        .with_predicate(predicate);
    let signature = protocol.authorization().sign(&order, &maker)?;

    println!("Order {}", protocol.hash_order(&order));
    println!("  maker:  {}", order.maker);
    println!("  offers: {} WETH for {} DAI", order.making_amount, order.taking_amount);
    println!();

    let partial = protocol.fill_order(
        &mut host,
        taker,
        &order,
        &signature,
        Bytes::new(),
        U256::from(4),
        U256::ZERO,
        U256::from(12_000),
    )?;
    println!(
        "Partial fill: {} WETH for {} DAI, {} DAI remaining",
        partial.making_amount, partial.taking_amount, partial.remaining
    );

    let rest = protocol.fill_order(
        &mut host,
        taker,
        &order,
        &signature,
        Bytes::new(),
        U256::ZERO,
        U256::ZERO,
        U256::ZERO,
    )?;
    println!(
        "Final fill:   {} WETH for {} DAI, {} DAI remaining",
        rest.making_amount, rest.taking_amount, rest.remaining
    );

    match protocol.fill_order(&mut host, taker, &order, &signature, Bytes::new(), U256::from(1), U256::ZERO, U256::ZERO) {
        Err(ProtocolError::RemainingAmountIsZero) => println!("Further fills rejected: order closed"),
        other => println!("Unexpected result: {other:?}"),
    }
    println!();

    println!("Balances");
    println!("  maker WETH: {}", host.balance_of(weth, maker.address()));
    println!("  maker DAI:  {}", host.balance_of(dai, maker.address()));
    println!("  taker WETH: {}", host.balance_of(weth, taker));
    println!("  taker DAI:  {}", host.balance_of(dai, taker));
    println!();
    println!("State root: {}", protocol.state_root_hex());

    Ok(())
}
