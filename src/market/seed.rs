//! Initial population of the market.

use chrono::{ DateTime, Duration, Utc };
use rand::Rng;

use crate::enums::TokenStatus;
use crate::market::token::{ Badge, TokenRecord };

/// Token names, paired index-for-index with [`SYMBOLS`].
pub const NAMES: [&str; 14] = [
    "BARRON",
    "JailLawrence",
    "VictimA",
    "MOON2",
    "Pumpdrop",
    "MTXMAX",
    "chimp",
    "Tesla AI",
    "MetaMask",
    "Jem",
    "T2GAI",
    "NICHE",
    "NVIDIA",
    "LIFE",
];

pub const SYMBOLS: [&str; 14] = [
    "Fed Chair",
    "Reed",
    "Vic",
    "BOOTS",
    "Pump",
    "Multi-Tx",
    "chimp",
    "AI",
    "MASK",
    "Jem",
    "GameAI",
    "Memes",
    "NVIDIA",
    "Feels",
];

const MIN_AGE_MS: i64 = 5_000;
const MAX_AGE_MS: i64 = 86_400_000;

/// Builds the seed collection from any injected random source.
pub struct SeedGenerator<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    now: DateTime<Utc>,
}

impl<'a, R: Rng + ?Sized> SeedGenerator<'a, R> {
    pub fn new(rng: &'a mut R, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    /// `count` records for one column. Ids are `<status>-<index>`.
    pub fn generate(&mut self, count: usize, status: TokenStatus) -> Vec<TokenRecord> {
        (0..count).map(|i| self.record(i, status)).collect()
    }

    /// `per_column` records for every status, in column order.
    pub fn generate_all(&mut self, per_column: usize) -> Vec<TokenRecord> {
        let mut items = Vec::with_capacity(per_column * TokenStatus::all().len());
        for status in TokenStatus::all() {
            items.extend(self.generate(per_column, *status));
        }
        tracing::debug!("Seeded {} records ({} per column)", items.len(), per_column);
        items
    }

    fn record(&mut self, i: usize, status: TokenStatus) -> TokenRecord {
        let rng = &mut *self.rng;
        let name_index = rng.random_range(0..NAMES.len());

        let name = if i > 0 {
            format!("{} {}", NAMES[name_index], i)
        } else {
            NAMES[name_index].to_string()
        };

        let market_cap = match status {
            TokenStatus::Migrated => rng.random_range(10_000..=100_000),
            _ => rng.random_range(1_000..=5_000),
        };

        TokenRecord {
            id: format!("{}-{}", status, i),
            name,
            symbol: SYMBOLS[name_index].to_string(),
            image_url: format!("https://picsum.photos/seed/{}{}/100/100", status, i),
            created_at: self.now - Duration::milliseconds(rng.random_range(MIN_AGE_MS..=MAX_AGE_MS)),
            market_cap: market_cap as f64,
            volume: rng.random_range(100..=5_000),
            fdv: rng.random_range(10_000..=500_000),
            transactions: rng.random_range(10..=200),
            tx_count: rng.random_range(1..=50),
            status,
            bonding_progress: rng.random_range(0..=100),
            holders: rng.random_range(5..=500),
            top10_holders: rng.random_range(1..=60),
            has_audit: rng.random_bool(0.5),
            is_safe: rng.random_bool(0.8),
            badges: Badge::template(status),
            price_change_5m: (rng.random::<f64>() - 0.5) * 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generate_ids_and_status() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let items = SeedGenerator::new(&mut rng, now).generate(20, TokenStatus::New);

        assert_eq!(items.len(), 20);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.id, format!("new-{}", i));
            assert_eq!(item.status, TokenStatus::New);
            assert_eq!(item.badges, Badge::template(TokenStatus::New));
        }
    }

    #[test]
    fn test_values_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();
        let items = SeedGenerator::new(&mut rng, now).generate_all(50);

        for item in &items {
            let age_ms = (now - item.created_at).num_milliseconds();
            assert!((MIN_AGE_MS..=MAX_AGE_MS).contains(&age_ms));
            assert!((1..=50).contains(&item.tx_count));
            assert!((5..=500).contains(&item.holders));
            assert!(item.price_change_5m.abs() <= 5.0);
            match item.status {
                TokenStatus::Migrated => assert!(item.market_cap >= 10_000.0),
                _ => assert!(item.market_cap <= 5_000.0),
            }
        }
    }

    #[test]
    fn test_generate_all_ids_unique() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = SeedGenerator::new(&mut rng, Utc::now()).generate_all(20);

        let ids: HashSet<_> = items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(items.len(), 60);
        assert_eq!(ids.len(), 60);
    }

    #[test]
    fn test_same_seed_same_output() {
        let now = Utc::now();
        let a = SeedGenerator::new(&mut StdRng::seed_from_u64(42), now).generate_all(5);
        let b = SeedGenerator::new(&mut StdRng::seed_from_u64(42), now).generate_all(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_record_has_bare_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = SeedGenerator::new(&mut rng, Utc::now()).generate(3, TokenStatus::Final);
        assert!(NAMES.contains(&items[0].name.as_str()));
        assert!(items[1].name.ends_with(" 1"));
    }
}
