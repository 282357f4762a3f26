use rand::Rng;

use crate::market::token::TokenRecord;

/// Market cap never walks below this.
pub const MARKET_CAP_FLOOR: f64 = 500.0;
pub const TX_COUNT_MIN: u32 = 1;
pub const TX_COUNT_MAX: u32 = 50;

/// Largest single-tick move as a fraction of the current market cap.
const MAX_STEP_FRACTION: f64 = 0.02;
/// Centre of the walk; slightly below 0.5 gives a small upward drift.
const WALK_BIAS: f64 = 0.49;
const VOLUME_BUMP_PROBABILITY: f64 = 0.3;

/// Advance one record by one tick.
pub fn step<R: Rng + ?Sized>(token: &mut TokenRecord, rng: &mut R) {
    let change = (rng.random::<f64>() - WALK_BIAS) * (token.market_cap * MAX_STEP_FRACTION);
    token.market_cap = (token.market_cap + change).max(MARKET_CAP_FLOOR);

    if rng.random_bool(VOLUME_BUMP_PROBABILITY) {
        token.volume += rng.random_range(10..=100);
    }

    let delta: i64 = rng.random_range(-1..=2);
    token.tx_count = (i64::from(token.tx_count) + delta).clamp(
        i64::from(TX_COUNT_MIN),
        i64::from(TX_COUNT_MAX)
    ) as u32;
}

/// Advance every record by one tick.
pub fn step_all<R: Rng + ?Sized>(tokens: &mut [TokenRecord], rng: &mut R) {
    for token in tokens.iter_mut() {
        step(token, rng);
    }
}
