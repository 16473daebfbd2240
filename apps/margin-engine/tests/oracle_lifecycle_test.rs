//! Integration tests for the expiry price lifecycle.
//!
//! A round feed pricer submits the first round after expiry, the disputer
//! corrects it, and settlement pays out from the corrected price.

use std::sync::Arc;

use alloy_primitives::{Address, I256, U256};
use margin_engine::domain::oracle::RoundFeed;
use margin_engine::infrastructure::pricers::FixedExchangeRate;
use margin_engine::{
    Asset, DerivedPricer, ExpiryPriceState, InMemoryRoundFeed, MarginCalculator, OracleError,
    Otoken, PriceOracle, PricerError, RoundFeedPricer, Timestamp,
};

const EXPIRY: Timestamp = Timestamp::from_unix(1_700_000_000);
const LOCKING: u64 = 600;
const DISPUTE: u64 = 3_600;

fn owner() -> Address {
    Address::repeat_byte(0xa0)
}

fn bot() -> Address {
    Address::repeat_byte(0xb0)
}

fn disputer() -> Address {
    Address::repeat_byte(0xd0)
}

fn keeper() -> Address {
    Address::repeat_byte(0xee)
}

fn weth() -> Asset {
    Asset::new(Address::repeat_byte(0x01), 18)
}

fn usdc() -> Asset {
    Asset::new(Address::repeat_byte(0x02), 6)
}

fn answer(dollars: i64) -> I256 {
    I256::try_from(dollars * 100_000_000).unwrap()
}

fn price(dollars: u64) -> U256 {
    U256::from(dollars) * U256::from(100_000_000u64)
}

struct Fixture {
    oracle: PriceOracle,
    feed: Arc<InMemoryRoundFeed>,
    pricer: RoundFeedPricer,
}

fn fixture() -> Fixture {
    let feed = Arc::new(InMemoryRoundFeed::new(8));
    let pricer = RoundFeedPricer::new(
        Address::repeat_byte(0x51),
        weth().address,
        bot(),
        Arc::clone(&feed) as Arc<dyn RoundFeed>,
    )
    .with_open_submission(true);

    let mut oracle = PriceOracle::new(owner());
    oracle.set_disputer(owner(), disputer()).unwrap();
    oracle
        .set_stable_price(owner(), usdc().address, price(1))
        .unwrap();
    oracle
        .set_asset_pricer(owner(), weth().address, Arc::new(pricer.clone()))
        .unwrap();
    oracle
        .set_locking_period(owner(), Address::repeat_byte(0x51), LOCKING)
        .unwrap();
    oracle
        .set_dispute_period(owner(), Address::repeat_byte(0x51), DISPUTE)
        .unwrap();

    Fixture {
        oracle,
        feed,
        pricer,
    }
}

#[test]
fn test_round_price_locking_dispute_and_settlement() {
    let Fixture {
        mut oracle,
        feed,
        pricer,
    } = fixture();
    let before = feed.push_round(answer(1_900), Timestamp::from_unix(EXPIRY.unix_seconds() - 100));
    let after = feed.push_round(answer(2_000), EXPIRY.plus_seconds(50));
    let weth_addr = weth().address;

    // Locking period still running
    let locked = EXPIRY.plus_seconds(LOCKING);
    assert_eq!(
        oracle.expiry_price_state(weth_addr, EXPIRY, locked),
        ExpiryPriceState::Pending
    );
    assert_eq!(
        pricer.set_expiry_price_in_oracle(&mut oracle, keeper(), EXPIRY, after, locked),
        Err(OracleError::LockingPeriodNotOver {
            asset: weth_addr,
            expiry: EXPIRY
        })
    );

    // A round before expiry is never the expiry price
    let open = EXPIRY.plus_seconds(LOCKING + 1);
    assert_eq!(
        oracle.expiry_price_state(weth_addr, EXPIRY, open),
        ExpiryPriceState::Unset
    );
    assert!(matches!(
        pricer.set_expiry_price_in_oracle(&mut oracle, keeper(), EXPIRY, before, open),
        Err(OracleError::Pricer(PricerError::RoundNotFirstAfterExpiry { .. }))
    ));

    // Anyone may submit the first round after expiry
    pricer
        .set_expiry_price_in_oracle(&mut oracle, keeper(), EXPIRY, after, open)
        .unwrap();
    assert_eq!(
        oracle.expiry_price_state(weth_addr, EXPIRY, open),
        ExpiryPriceState::Unfinalized
    );
    assert_eq!(
        pricer.set_expiry_price_in_oracle(&mut oracle, bot(), EXPIRY, after, open),
        Err(OracleError::PriceAlreadySubmitted {
            asset: weth_addr,
            expiry: EXPIRY
        })
    );

    // An unfinalized price cannot settle options
    let put = Otoken::put(
        Address::repeat_byte(0x10),
        weth(),
        usdc(),
        usdc(),
        price(2_100),
        EXPIRY,
    );
    let calculator = MarginCalculator::new(owner());
    assert!(calculator.get_payout(&oracle, &put, price(2), open).is_err());

    // The disputer overrides once, which finalizes the price
    let disputed_at = open.plus_seconds(60);
    oracle
        .dispute_expiry_price(disputer(), weth_addr, EXPIRY, price(2_010), disputed_at)
        .unwrap();
    assert_eq!(
        oracle.expiry_price_state(weth_addr, EXPIRY, disputed_at),
        ExpiryPriceState::Finalized
    );
    assert_eq!(
        oracle.dispute_expiry_price(disputer(), weth_addr, EXPIRY, price(1), disputed_at),
        Err(OracleError::DisputeWindowClosed {
            asset: weth_addr,
            expiry: EXPIRY
        })
    );

    // Put struck at 2100 settles at 2010: 90 USDC per option
    assert_eq!(
        calculator.get_expired_payout_rate(&oracle, &put, disputed_at),
        Ok(U256::from(90_000_000u64))
    );
    assert_eq!(
        calculator.get_payout(&oracle, &put, price(2), disputed_at),
        Ok(U256::from(180_000_000u64))
    );
}

#[test]
fn test_undisputed_price_finalizes_after_dispute_period() {
    let Fixture {
        mut oracle,
        feed,
        pricer,
    } = fixture();
    let round = feed.push_round(answer(2_000), EXPIRY.plus_seconds(5));
    let submitted_at = EXPIRY.plus_seconds(LOCKING + 1);
    pricer
        .set_expiry_price_in_oracle(&mut oracle, bot(), EXPIRY, round, submitted_at)
        .unwrap();

    let weth_addr = weth().address;
    let window_end = submitted_at.plus_seconds(DISPUTE);
    assert_eq!(
        oracle.expiry_price_state(weth_addr, EXPIRY, window_end),
        ExpiryPriceState::Unfinalized
    );
    assert_eq!(
        oracle.expiry_price_state(weth_addr, EXPIRY, window_end.plus_seconds(1)),
        ExpiryPriceState::Finalized
    );
    assert_eq!(
        oracle.dispute_expiry_price(disputer(), weth_addr, EXPIRY, price(1), window_end.plus_seconds(1)),
        Err(OracleError::DisputeWindowClosed {
            asset: weth_addr,
            expiry: EXPIRY
        })
    );
}

#[test]
fn test_derived_price_follows_underlying_expiry_price() {
    let Fixture {
        mut oracle,
        feed,
        pricer,
    } = fixture();
    let wrapped = Address::repeat_byte(0x04);
    let rate = Arc::new(FixedExchangeRate::new(U256::from(1_050_000u64), 6));
    let derived = DerivedPricer::new(Address::repeat_byte(0x53), wrapped, weth().address, rate);
    oracle
        .set_asset_pricer(owner(), wrapped, Arc::new(derived.clone()))
        .unwrap();

    let now = EXPIRY.plus_seconds(LOCKING + 1);
    assert!(matches!(
        derived.set_expiry_price_in_oracle(&mut oracle, EXPIRY, now),
        Err(OracleError::Pricer(PricerError::UnderlyingPriceNotSet { .. }))
    ));

    let round = feed.push_round(answer(2_000), EXPIRY.plus_seconds(5));
    pricer
        .set_expiry_price_in_oracle(&mut oracle, bot(), EXPIRY, round, now)
        .unwrap();
    derived
        .set_expiry_price_in_oracle(&mut oracle, EXPIRY, now)
        .unwrap();
    assert_eq!(
        oracle.get_expiry_price(wrapped, EXPIRY, now).unwrap().price,
        price(2_100)
    );
    assert_eq!(oracle.get_price(wrapped), Ok(price(2_100)));
}

#[test]
fn test_migration_imports_final_prices_until_closed() {
    let mut oracle = fixture().oracle;
    let weth_addr = weth().address;
    let earlier = Timestamp::from_unix(1_600_000_000);
    let now = Timestamp::from_unix(1_650_000_000);

    assert_eq!(
        oracle.migrate_oracle(owner(), weth_addr, &[earlier], &[], now),
        Err(OracleError::MigrationDataMismatch {
            timestamps: 1,
            prices: 0
        })
    );
    oracle
        .migrate_oracle(owner(), weth_addr, &[earlier], &[price(1_500)], now)
        .unwrap();
    let migrated = oracle.get_expiry_price(weth_addr, earlier, now).unwrap();
    assert_eq!(migrated.price, price(1_500));
    assert!(migrated.is_finalized);

    assert!(matches!(
        oracle.migrate_oracle(keeper(), weth_addr, &[earlier], &[price(1)], now),
        Err(OracleError::Access(_))
    ));

    oracle.end_migration(owner()).unwrap();
    assert!(oracle.is_migration_ended());
    assert_eq!(
        oracle.migrate_oracle(owner(), weth_addr, &[earlier], &[price(1)], now),
        Err(OracleError::MigrationEnded)
    );
}
