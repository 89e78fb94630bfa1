//! Determinism and invariant tests over seeded random operation sequences.
//!
//! These tests verify:
//! 1. Replaying the same seed yields the same state root and balances
//! 2. Every fill respects the maker's price (rounding never favours the taker)
//! 3. Remaining amounts never exceed the order size
//! 4. Token supply is conserved across fills, failures and reverts
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test determinism_test -- --nocapture
//! ```

mod common;

use alloy::primitives::{Bytes, U256};
use alloy::signers::local::PrivateKeySigner;

use limit_order_protocol::predicate::Predicate;
use limit_order_protocol::{LimitOrderProtocol, MemoryHost, Order, ProtocolConfig};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use common::{key, u, CHAIN_ID, DAI, OTHER, PROTOCOL, START_TIME, TAKER, WETH};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Orders per scenario
const ORDER_COUNT: usize = 40;

/// Random operations per scenario
const OPERATION_COUNT: usize = 600;

/// Initial balance of every participant
const FUNDS: u64 = 1_000_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

struct Scenario {
    protocol: LimitOrderProtocol,
    host: MemoryHost,
    makers: Vec<PrivateKeySigner>,
    orders: Vec<(Order, Bytes)>,
}

/// Build a funded scenario with seeded random orders.
fn generate_scenario(rng: &mut ChaCha8Rng) -> Scenario {
    let protocol = LimitOrderProtocol::new(ProtocolConfig::new(CHAIN_ID, PROTOCOL));
    let mut host = MemoryHost::new(CHAIN_ID, START_TIME);
    host.deploy_token(WETH, "Wrapped Ether");
    host.deploy_token(DAI, "Dai Stablecoin");

    let makers: Vec<PrivateKeySigner> = (0x10..0x13).map(key).collect();
    for maker in &makers {
        host.mint(WETH, maker.address(), u(FUNDS));
        host.approve(WETH, maker.address(), PROTOCOL, U256::MAX);
    }
    for taker in [TAKER, OTHER] {
        host.mint(DAI, taker, u(FUNDS));
        host.approve(DAI, taker, PROTOCOL, U256::MAX);
    }

    let mut orders = Vec::with_capacity(ORDER_COUNT);
    for i in 0..ORDER_COUNT {
        let maker = &makers[rng.gen_range(0..makers.len())];
        let making = rng.gen_range(1..=10_000u64);
        let taking = rng.gen_range(1..=10_000u64);
        let mut order = Order::new(u(i as u64), WETH, DAI, maker.address(), u(making), u(taking))
            .expect("non-zero amounts");

        match rng.gen_range(0..4) {
            0 => {
                let predicate = Predicate::nonce_equals(maker.address(), U256::ZERO);
                order = order.with_predicate(predicate.encode().expect("encodable"));
            }
            1 => {
                let deadline = START_TIME + rng.gen_range(0..600u64);
                order = order.with_predicate(Predicate::timestamp_below(deadline).encode().expect("encodable"));
            }
            2 if rng.gen_bool(0.5) => order = order.without_partial_fills(),
            _ => {}
        }

        let signature = protocol
            .authorization()
            .sign(&order, maker)
            .expect("signing succeeds");
        orders.push((order, signature));
    }

    Scenario {
        protocol,
        host,
        makers,
        orders,
    }
}

/// Run a seeded operation sequence, checking per-fill invariants along the
/// way. Returns the state root and every participant's balances.
fn run_deterministic_sequence(seed: u64) -> ([u8; 32], Vec<U256>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut s = generate_scenario(&mut rng);
    let mut now = START_TIME;

    for _ in 0..OPERATION_COUNT {
        let (order, signature) = s.orders[rng.gen_range(0..s.orders.len())].clone();
        let taker = if rng.gen_bool(0.5) { TAKER } else { OTHER };

        match rng.gen_range(0..10) {
            0..=3 => {
                let making = rng.gen_range(0..=order.making_amount.to::<u64>());
                let result = s.protocol.fill_order(
                    &mut s.host, taker, &order, &signature, Bytes::new(), u(making), U256::ZERO, U256::MAX,
                );
                if let Ok(fill) = result {
                    assert_price_respected(&order, fill.making_amount, fill.taking_amount);
                }
            }
            4..=6 => {
                let taking = rng.gen_range(0..=order.taking_amount.to::<u64>());
                let result = s.protocol.fill_order(
                    &mut s.host, taker, &order, &signature, Bytes::new(), U256::ZERO, u(taking), U256::ZERO,
                );
                if let Ok(fill) = result {
                    assert_price_respected(&order, fill.making_amount, fill.taking_amount);
                }
            }
            7 => {
                let _ = s.protocol.cancel_order(order.maker, &order);
            }
            8 => {
                let maker = &s.makers[rng.gen_range(0..s.makers.len())];
                let _ = s.protocol.increase_nonce(maker.address());
            }
            _ => {
                now += rng.gen_range(1..30u64);
                s.host.set_timestamp(now);
            }
        }
    }

    for (order, _) in &s.orders {
        assert!(s.protocol.remaining_for(order) <= order.taking_amount);
    }

    let mut holders: Vec<_> = s.makers.iter().map(|m| m.address()).collect();
    holders.extend([TAKER, OTHER]);
    let balances = holders
        .iter()
        .flat_map(|holder| [s.host.balance_of(WETH, *holder), s.host.balance_of(DAI, *holder)])
        .collect::<Vec<_>>();

    let total = |asset| {
        holders
            .iter()
            .fold(U256::ZERO, |acc, holder| acc + s.host.balance_of(asset, *holder))
    };
    let weth_total = total(WETH);
    let dai_total = total(DAI);
    assert_eq!(weth_total, u(FUNDS) * U256::from(s.makers.len()));
    assert_eq!(dai_total, u(FUNDS) * U256::from(2));

    (s.protocol.state_root(), balances)
}

/// `taking / making >= order_taking / order_making`
fn assert_price_respected(order: &Order, making: U256, taking: U256) {
    assert!(!making.is_zero() && !taking.is_zero());
    assert!(making * order.taking_amount <= taking * order.making_amount);
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_replay_is_deterministic() {
    let (root_a, balances_a) = run_deterministic_sequence(42);
    let (root_b, balances_b) = run_deterministic_sequence(42);
    assert_eq!(root_a, root_b);
    assert_eq!(balances_a, balances_b);
    println!("state root (seed 42): {}", hex::encode(root_a));
}

#[test]
fn test_different_seeds_diverge() {
    let (root_a, _) = run_deterministic_sequence(1);
    let (root_b, _) = run_deterministic_sequence(2);
    assert_ne!(root_a, root_b);
}

#[test]
fn test_invariants_hold_across_seeds() {
    for seed in 100..105 {
        run_deterministic_sequence(seed);
    }
}
