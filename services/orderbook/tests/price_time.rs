//! End-to-end matching behavior through the public exchange API:
//! price-time priority, quantity conservation, and expiry handling.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, U256};
use orderbook::{BookError, Exchange};
use settlement::{SettlementLedger, TradeFilter};
use signing::{Eip712Domain, OrderCodec};
use types::order::{Order, OrderStatus, Side, SigningScheme};
use types::pair::LimitPrice;

const NOW: u64 = 1_700_000_000;

fn domain() -> Eip712Domain {
    Eip712Domain::new(1, Address::from([0x0C; 20]))
}

fn exchange() -> Exchange {
    Exchange::new(domain(), SettlementLedger::in_memory())
}

fn wallet(seed: u8) -> LocalWallet {
    LocalWallet::from_bytes(&[seed; 32]).unwrap()
}

fn base() -> Address {
    Address::from([0x11; 20])
}

fn quote() -> Address {
    Address::from([0x22; 20])
}

fn signed(
    wallet: &LocalWallet,
    side: Side,
    amount: u64,
    price: u64,
    valid_to: u64,
    nonce: u64,
) -> (Order, String) {
    let (sell_token, buy_token, sell_amount, buy_amount) = match side {
        Side::Sell => (base(), quote(), amount, amount * price),
        Side::Buy => (quote(), base(), amount * price, amount),
    };
    let order = Order {
        sell_token,
        buy_token,
        sell_amount: U256::from(sell_amount),
        buy_amount: U256::from(buy_amount),
        valid_to,
        signer: wallet.address(),
        receiver: wallet.address(),
        app_data: Bytes::default(),
        fee_amount: U256::zero(),
        partially_fillable: true,
        side,
        signing_scheme: SigningScheme::Eip712,
        nonce,
    };
    let digest = OrderCodec::fingerprint(&order, &domain()).unwrap();
    let signature = format!("0x{}", wallet.sign_hash(digest).unwrap());
    (order, signature)
}

#[test]
fn price_time_priority_across_levels() {
    let exchange = exchange();

    // Sells resting at prices [10, 10, 12], admitted in that time order.
    let (o1, s1) = signed(&wallet(1), Side::Sell, 5, 10, NOW + 3600, 1);
    let (o2, s2) = signed(&wallet(2), Side::Sell, 5, 10, NOW + 3600, 1);
    let (o3, s3) = signed(&wallet(3), Side::Sell, 5, 12, NOW + 3600, 1);
    let fp1 = exchange.submit(o1, &s1, NOW).unwrap().fingerprint;
    let fp2 = exchange.submit(o2, &s2, NOW + 1).unwrap().fingerprint;
    let fp3 = exchange.submit(o3, &s3, NOW + 2).unwrap().fingerprint;

    // Incoming buy for 12 at limit 12 sweeps 5+5 at 10, then 2 at 12.
    let (taker, taker_sig) = signed(&wallet(4), Side::Buy, 12, 12, NOW + 3600, 1);
    let result = exchange.submit(taker, &taker_sig, NOW + 3).unwrap();

    assert_eq!(result.status, OrderStatus::Filled);
    assert_eq!(result.trades.len(), 3);

    let ten = LimitPrice::new(U256::from(50u64), U256::from(5u64));
    let twelve = LimitPrice::new(U256::from(60u64), U256::from(5u64));

    // Better price first; among equal prices, earlier admission first.
    assert_eq!(result.trades[0].sell_order, fp1);
    assert_eq!(result.trades[0].price, ten);
    assert_eq!(result.trades[0].amount, U256::from(5u64));

    assert_eq!(result.trades[1].sell_order, fp2);
    assert_eq!(result.trades[1].price, ten);
    assert_eq!(result.trades[1].amount, U256::from(5u64));

    assert_eq!(result.trades[2].sell_order, fp3);
    assert_eq!(result.trades[2].price, twelve);
    assert_eq!(result.trades[2].amount, U256::from(2u64));
}

#[test]
fn matching_conserves_quantity() {
    let exchange = exchange();

    let (maker, maker_sig) = signed(&wallet(1), Side::Sell, 100, 2, NOW + 3600, 1);
    let maker_fp = exchange.submit(maker, &maker_sig, NOW).unwrap().fingerprint;

    // Several takers chip away at the resting order, over-demanding at
    // the end. Fills against the maker can never exceed its size.
    let mut total_filled = U256::zero();
    for (i, amount) in [30u64, 30, 30, 30].iter().enumerate() {
        let (taker, taker_sig) = signed(
            &wallet(10 + i as u8),
            Side::Buy,
            *amount,
            2,
            NOW + 3600,
            1,
        );
        let result = exchange.submit(taker, &taker_sig, NOW + 1 + i as u64).unwrap();
        for trade in &result.trades {
            total_filled += trade.amount;
        }
    }

    assert_eq!(
        total_filled,
        U256::from(100u64),
        "fills sum to exactly the maker's size"
    );

    let maker_trades = exchange.trades(&TradeFilter::by_order(maker_fp));
    let maker_sum: U256 = maker_trades
        .iter()
        .fold(U256::zero(), |acc, t| acc + t.amount);
    assert_eq!(maker_sum, U256::from(100u64));
}

#[test]
fn expired_resting_order_is_skipped_and_retired() {
    let exchange = exchange();

    // Better-priced sell expires before the taker arrives.
    let (stale, stale_sig) = signed(&wallet(1), Side::Sell, 10, 9, NOW + 10, 1);
    let (live, live_sig) = signed(&wallet(2), Side::Sell, 10, 10, NOW + 3600, 1);
    let stale_fp = exchange.submit(stale, &stale_sig, NOW).unwrap().fingerprint;
    let live_fp = exchange.submit(live, &live_sig, NOW).unwrap().fingerprint;

    let (taker, taker_sig) = signed(&wallet(3), Side::Buy, 10, 10, NOW + 3600, 1);
    let result = exchange.submit(taker, &taker_sig, NOW + 60).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].sell_order, live_fp);

    // The expired order never traded and no longer rests.
    assert!(exchange.trades(&TradeFilter::by_order(stale_fp)).is_empty());
    let pair = types::pair::TokenPair::new(base(), quote());
    let snapshot = exchange.snapshot(pair, 10, NOW + 61);
    assert!(snapshot.asks.is_empty());
}

#[test]
fn cancel_race_leaves_prior_fills_standing() {
    let exchange = exchange();

    let (maker, maker_sig) = signed(&wallet(1), Side::Sell, 100, 2, NOW + 3600, 1);
    let maker_fp = exchange.submit(maker, &maker_sig, NOW).unwrap().fingerprint;

    let (taker, taker_sig) = signed(&wallet(2), Side::Buy, 60, 2, NOW + 3600, 1);
    exchange.submit(taker, &taker_sig, NOW + 1).unwrap();

    // Cancel lands after a partial fill; only the remainder is pulled.
    let status = exchange.cancel(maker_fp, wallet(1).address()).unwrap();
    assert_eq!(status, OrderStatus::Cancelled);
    assert_eq!(exchange.trades(&TradeFilter::by_order(maker_fp)).len(), 1);
}

#[test]
fn duplicate_fingerprint_resubmission_returns_prior_result() {
    let exchange = exchange();
    let (order, sig) = signed(&wallet(1), Side::Sell, 100, 2, NOW + 3600, 1);

    let first = exchange.submit(order.clone(), &sig, NOW).unwrap();
    let second = exchange.submit(order, &sig, NOW + 5).unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(second.status, OrderStatus::Open);
}

#[test]
fn malformed_signature_is_a_distinct_error() {
    let exchange = exchange();
    let (order, _) = signed(&wallet(1), Side::Sell, 100, 2, NOW + 3600, 1);

    let result = exchange.submit(order, "0x1234", NOW);
    assert!(matches!(result, Err(BookError::Signing(_))));
}
