use std::collections::HashSet;

use chrono::{ DateTime, Utc };
use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Builder;

use crate::enums::TokenStatus;
use crate::market::store::{ self, PulseStore };
use crate::market::token::TokenRecord;
use crate::market::walk;

/// Where an inserted record was cloned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionSource {
    /// A pool record whose name was not on screen.
    Pool,
    /// Every pool name was already shown; an older displayed record came back.
    Recycled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub inserted_id: String,
    pub evicted_id: Option<String>,
    pub source: InsertionSource,
}

/// The New Pairs column's own copy of its records.
///
/// Seeded once from the shared store and then evolved locally so that simulated
/// arrivals survive upstream refreshes. The list length never changes after
/// seeding.
#[derive(Debug, Clone)]
pub struct NewPairsFeed {
    tokens: Vec<TokenRecord>,
}

impl NewPairsFeed {
    pub fn from_store(store: &PulseStore) -> Self {
        Self::new(store.column(TokenStatus::New))
    }

    pub fn new(mut tokens: Vec<TokenRecord>) -> Self {
        store::sort_by_recency(&mut tokens);
        Self { tokens }
    }

    pub fn tokens(&self) -> &[TokenRecord] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Apply one market tick to the local copy.
    pub fn walk<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        walk::step_all(&mut self.tokens, rng);
    }

    /// Simulate one arrival: clone a candidate under a fresh id stamped `now`,
    /// put it on top and drop the oldest. Returns `None` when the column is empty.
    pub fn insert_next<R: Rng + ?Sized>(
        &mut self,
        pool: &[TokenRecord],
        now: DateTime<Utc>,
        rng: &mut R
    ) -> Option<Insertion> {
        if self.tokens.is_empty() {
            return None;
        }

        let (template, source) = self.pick_candidate(pool, rng)?;
        let id = self.fresh_id(rng);
        let token = template.respawn(id.clone(), TokenStatus::New, now);

        self.tokens.insert(0, token);
        let evicted_id = self.tokens.pop().map(|t| t.id);

        tracing::debug!(
            "New pair {} ({:?}), evicted {}",
            id,
            source,
            evicted_id.as_deref().unwrap_or("-")
        );

        Some(Insertion {
            inserted_id: id,
            evicted_id,
            source,
        })
    }

    fn pick_candidate<R: Rng + ?Sized>(
        &self,
        pool: &[TokenRecord],
        rng: &mut R
    ) -> Option<(TokenRecord, InsertionSource)> {
        let shown: HashSet<&str> = self.tokens
            .iter()
            .map(|t| t.name.as_str())
            .collect();

        let fresh: Vec<&TokenRecord> = pool
            .iter()
            .filter(|t| !shown.contains(t.name.as_str()))
            .collect();

        if let Some(candidate) = fresh.choose(rng) {
            return Some(((*candidate).clone(), InsertionSource::Pool));
        }

        let older_half = &self.tokens[self.tokens.len() / 2..];
        older_half.choose(rng).map(|t| (t.clone(), InsertionSource::Recycled))
    }

    fn fresh_id<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        loop {
            let uuid = Builder::from_random_bytes(rng.random::<[u8; 16]>()).into_uuid();
            let id = format!("{}-{}", TokenStatus::New, uuid.simple());
            if !self.tokens.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }
}
