//! Reducer-style container for the shared token collection.

use rand::Rng;
use serde::Serialize;

use crate::enums::TokenStatus;
use crate::market::token::TokenRecord;
use crate::market::walk;

/// Upper bound on the shared collection; `AddToken` evicts from the tail past this.
pub const MAX_ITEMS: usize = 150;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseState {
    pub items: Vec<TokenRecord>,
    pub is_live: bool,
}

/// Mutations the store accepts.
#[derive(Debug, Clone)]
pub enum PulseAction {
    /// One random-walk step over every record. Ignored while not live.
    UpdatePrices,
    /// Prepend a record; rejected if its id is already present.
    AddToken(TokenRecord),
    SetLive(bool),
}

/// What a dispatch changed, for logging and subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    PricesUpdated(usize),
    TokenAdded {
        id: String,
        evicted: Option<String>,
    },
    LiveChanged(bool),
    Unchanged,
}

pub struct PulseStore {
    state: PulseState,
}

impl PulseStore {
    pub fn new(items: Vec<TokenRecord>, is_live: bool) -> Self {
        Self {
            state: PulseState { items, is_live },
        }
    }

    pub fn state(&self) -> &PulseState {
        &self.state
    }

    pub fn items(&self) -> &[TokenRecord] {
        &self.state.items
    }

    pub fn is_live(&self) -> bool {
        self.state.is_live
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.state.items.iter().any(|t| t.id == id)
    }

    pub fn dispatch<R: Rng + ?Sized>(&mut self, action: PulseAction, rng: &mut R) -> StoreChange {
        match action {
            PulseAction::UpdatePrices => {
                if !self.state.is_live {
                    return StoreChange::Unchanged;
                }
                walk::step_all(&mut self.state.items, rng);
                tracing::trace!("Walked {} records", self.state.items.len());
                StoreChange::PricesUpdated(self.state.items.len())
            }
            PulseAction::AddToken(token) => {
                if self.contains_id(&token.id) {
                    tracing::warn!("Rejected duplicate token id {}", token.id);
                    return StoreChange::Unchanged;
                }
                let id = token.id.clone();
                self.state.items.insert(0, token);
                let evicted = if self.state.items.len() > MAX_ITEMS {
                    self.state.items.pop().map(|t| t.id)
                } else {
                    None
                };
                StoreChange::TokenAdded { id, evicted }
            }
            PulseAction::SetLive(live) => {
                if self.state.is_live == live {
                    return StoreChange::Unchanged;
                }
                self.state.is_live = live;
                tracing::info!("Live updates {}", if live { "resumed" } else { "paused" });
                StoreChange::LiveChanged(live)
            }
        }
    }

    /// Records of one status, newest first.
    pub fn column(&self, status: TokenStatus) -> Vec<TokenRecord> {
        column_of(&self.state.items, status)
    }
}

/// Filter `items` to `status` and order newest first.
pub fn column_of(items: &[TokenRecord], status: TokenStatus) -> Vec<TokenRecord> {
    let mut column: Vec<TokenRecord> = items
        .iter()
        .filter(|t| t.status == status)
        .cloned()
        .collect();
    sort_by_recency(&mut column);
    column
}

/// Newest first. Stable, so equal timestamps keep their relative order.
pub fn sort_by_recency(tokens: &mut [TokenRecord]) {
    tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::seed::SeedGenerator;
    use crate::market::walk::MARKET_CAP_FLOOR;
    use chrono::{ Duration, Utc };
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn seeded_store(per_column: usize) -> (PulseStore, StdRng) {
        let mut rng = StdRng::seed_from_u64(17);
        let items = SeedGenerator::new(&mut rng, Utc::now()).generate_all(per_column);
        (PulseStore::new(items, true), rng)
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let (store, _) = seeded_store(20);

        let mut seen = HashSet::new();
        let mut total = 0;
        for status in TokenStatus::all() {
            for token in store.column(*status) {
                assert_eq!(token.status, *status);
                assert!(seen.insert(token.id.clone()), "{} in two columns", token.id);
                total += 1;
            }
        }
        assert_eq!(total, store.len());
    }

    #[test]
    fn test_column_sorted_newest_first() {
        let (store, _) = seeded_store(20);
        let column = store.column(TokenStatus::Final);
        assert!(column.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_update_prices_respects_live_flag() {
        let (mut store, mut rng) = seeded_store(5);
        let before = store.items().to_vec();

        assert_eq!(store.dispatch(PulseAction::SetLive(false), &mut rng), StoreChange::LiveChanged(false));
        assert_eq!(store.dispatch(PulseAction::UpdatePrices, &mut rng), StoreChange::Unchanged);
        assert_eq!(store.items(), before.as_slice());

        store.dispatch(PulseAction::SetLive(true), &mut rng);
        assert_eq!(store.dispatch(PulseAction::UpdatePrices, &mut rng), StoreChange::PricesUpdated(15));
    }

    #[test]
    fn test_set_live_same_value_is_unchanged() {
        let (mut store, mut rng) = seeded_store(1);
        assert_eq!(store.dispatch(PulseAction::SetLive(true), &mut rng), StoreChange::Unchanged);
    }

    #[test]
    fn test_many_ticks_keep_floor() {
        let (mut store, mut rng) = seeded_store(20);
        for _ in 0..500 {
            store.dispatch(PulseAction::UpdatePrices, &mut rng);
        }
        assert!(store.items().iter().all(|t| t.market_cap >= MARKET_CAP_FLOOR));
    }

    #[test]
    fn test_add_token_prepends_and_caps() {
        let (mut store, mut rng) = seeded_store(50);
        assert_eq!(store.len(), MAX_ITEMS);
        let last_id = store.items().last().unwrap().id.clone();

        let template = store.items()[0].clone();
        let token = template.respawn("new-fresh".to_string(), TokenStatus::New, Utc::now());
        let change = store.dispatch(PulseAction::AddToken(token), &mut rng);

        assert_eq!(change, StoreChange::TokenAdded {
            id: "new-fresh".to_string(),
            evicted: Some(last_id.clone()),
        });
        assert_eq!(store.len(), MAX_ITEMS);
        assert_eq!(store.items()[0].id, "new-fresh");
        assert!(!store.contains_id(&last_id));
    }

    #[test]
    fn test_add_token_rejects_duplicate_id() {
        let (mut store, mut rng) = seeded_store(3);
        let duplicate = store.items()[1].clone();
        assert_eq!(store.dispatch(PulseAction::AddToken(duplicate), &mut rng), StoreChange::Unchanged);
        assert_eq!(store.len(), 9);
    }

    #[test]
    fn test_sort_by_recency_is_stable() {
        let (store, _) = seeded_store(3);
        let mut tokens = store.column(TokenStatus::New);
        let stamp = Utc::now() - Duration::minutes(1);
        for token in tokens.iter_mut() {
            token.created_at = stamp;
        }
        let order: Vec<_> = tokens.iter().map(|t| t.id.clone()).collect();
        sort_by_recency(&mut tokens);
        let after: Vec<_> = tokens.iter().map(|t| t.id.clone()).collect();
        assert_eq!(order, after);
    }
}
