//! Application state container driving the simulated feed.

use std::collections::HashSet;

use chrono::{ DateTime, Utc };
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::enums::TokenStatus;
use crate::market::seed::SeedGenerator;
use crate::market::store::{ PulseAction, PulseStore, StoreChange };
use crate::market::token::TokenRecord;
use crate::scheduler::TickEvent;
use crate::services::filter_service::{ ColumnFilter, ColumnFilters };
use crate::services::highlight_service::{
    ConversionHighlighter,
    ConversionPolicy,
    LeadingPrefixPolicy,
};
use crate::services::new_pairs_service::{ Insertion, NewPairsFeed };
use crate::services::search_service::{ self, SearchQuery };
use crate::view::board::{ BoardCard, BoardColumn, BoardSnapshot, ImageFailures };
use crate::view::card::DisplaySettings;

/// What handling a tick changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Market(StoreChange),
    Inserted(Option<Insertion>),
    Highlighted {
        flagged: usize,
        changed: bool,
    },
    Aged,
}

impl TickOutcome {
    /// Whether the board looks different afterwards.
    pub fn needs_render(&self) -> bool {
        match self {
            TickOutcome::Market(change) => *change != StoreChange::Unchanged,
            TickOutcome::Inserted(insertion) => insertion.is_some(),
            TickOutcome::Highlighted { changed, .. } => *changed,
            // Age labels move even while the market is paused
            TickOutcome::Aged => true,
        }
    }
}

pub struct PulseApp {
    store: PulseStore,
    new_pairs: NewPairsFeed,
    highlighter: ConversionHighlighter,
    filters: ColumnFilters,
    display: DisplaySettings,
    images: ImageFailures,
    rng: StdRng,
}

impl PulseApp {
    pub fn new(config: &Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let policy = Box::new(LeadingPrefixPolicy::new(config.highlight_count));
        Self::with_rng(config.seed_per_column, config.live, policy, rng, Utc::now())
    }

    /// Build with an explicit random source and clock reading.
    pub fn with_rng(
        per_column: usize,
        live: bool,
        policy: Box<dyn ConversionPolicy>,
        mut rng: StdRng,
        now: DateTime<Utc>
    ) -> Self {
        let items = SeedGenerator::new(&mut rng, now).generate_all(per_column);
        let store = PulseStore::new(items, live);
        let new_pairs = NewPairsFeed::from_store(&store);

        tracing::info!(
            "Pulse seeded: {} records, {} new pairs, live={}",
            store.len(),
            new_pairs.len(),
            live
        );

        let mut app = Self {
            store,
            new_pairs,
            highlighter: ConversionHighlighter::new(policy),
            filters: ColumnFilters::default(),
            display: DisplaySettings::default(),
            images: ImageFailures::default(),
            rng,
        };
        app.on_highlight_tick(now);
        app
    }

    pub fn store(&self) -> &PulseStore {
        &self.store
    }

    pub fn new_pairs(&self) -> &NewPairsFeed {
        &self.new_pairs
    }

    pub fn is_live(&self) -> bool {
        self.store.is_live()
    }

    pub fn display_settings(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn display_settings_mut(&mut self) -> &mut DisplaySettings {
        &mut self.display
    }

    pub fn images(&self) -> &ImageFailures {
        &self.images
    }

    pub fn handle(&mut self, event: TickEvent, now: DateTime<Utc>) -> TickOutcome {
        match event {
            TickEvent::Market => TickOutcome::Market(self.on_market_tick()),
            TickEvent::Insertion => TickOutcome::Inserted(self.on_insertion_tick(now)),
            TickEvent::Highlight => {
                let before = self.highlighter.converting().clone();
                let flagged = self.on_highlight_tick(now);
                TickOutcome::Highlighted {
                    flagged,
                    changed: *self.highlighter.converting() != before,
                }
            }
            TickEvent::Age => TickOutcome::Aged,
        }
    }

    /// Random-walk the shared collection and the New Pairs copy. No-op while paused.
    pub fn on_market_tick(&mut self) -> StoreChange {
        let change = self.store.dispatch(PulseAction::UpdatePrices, &mut self.rng);
        if change != StoreChange::Unchanged {
            self.new_pairs.walk(&mut self.rng);
        }
        change
    }

    pub fn on_insertion_tick(&mut self, now: DateTime<Utc>) -> Option<Insertion> {
        let insertion = self.new_pairs.insert_next(self.store.items(), now, &mut self.rng)?;

        if let Some(evicted) = insertion.evicted_id.as_deref() {
            self.forget_image(evicted);
        }

        tracing::info!(
            "New pair {} arrived, {} dropped",
            insertion.inserted_id,
            insertion.evicted_id.as_deref().unwrap_or("-")
        );
        Some(insertion)
    }

    /// Recompute which Final Stretch records are converting.
    pub fn on_highlight_tick(&mut self, now: DateTime<Utc>) -> usize {
        let column = self.filters.apply(
            TokenStatus::Final,
            self.store.column(TokenStatus::Final),
            now
        );
        let flagged = self.highlighter.recompute(&column);
        tracing::trace!("{} converting in Final Stretch", flagged);
        flagged
    }

    pub fn set_live(&mut self, live: bool) -> StoreChange {
        self.store.dispatch(PulseAction::SetLive(live), &mut self.rng)
    }

    pub fn add_token(&mut self, token: TokenRecord) -> StoreChange {
        let change = self.store.dispatch(PulseAction::AddToken(token), &mut self.rng);
        if let StoreChange::TokenAdded { evicted: Some(evicted), .. } = &change {
            self.forget_image(evicted);
        }
        change
    }

    /// Drop failed-image state once `evicted` is nowhere on the board.
    fn forget_image(&mut self, evicted: &str) {
        if !self.images.has_failed(evicted) {
            return;
        }
        let live: Vec<&str> = self.new_pairs
            .tokens()
            .iter()
            .chain(self.store.items())
            .map(|t| t.id.as_str())
            .collect();
        self.images.retain_live(live);
    }

    pub fn set_conversion_policy(&mut self, policy: Box<dyn ConversionPolicy>, now: DateTime<Utc>) {
        self.highlighter.set_policy(policy);
        self.on_highlight_tick(now);
    }

    pub fn is_converting(&self, id: &str) -> bool {
        self.highlighter.is_converting(id)
    }

    pub fn set_filter(&mut self, status: TokenStatus, filter: ColumnFilter) {
        self.filters.set(status, filter);
    }

    pub fn reset_filter(&mut self, status: TokenStatus) {
        self.filters.reset(status);
    }

    pub fn filter(&self, status: TokenStatus) -> ColumnFilter {
        self.filters.get(status)
    }

    pub fn mark_image_failed(&mut self, id: &str) -> bool {
        let first = self.images.mark_failed(id);
        if first {
            tracing::debug!("Image for {} failed, showing fallback icon", id);
        }
        first
    }

    /// Search every record on the board, New Pairs copy included.
    pub fn search(&self, query: &SearchQuery) -> Vec<TokenRecord> {
        let mut seen = HashSet::new();
        let pool: Vec<TokenRecord> = self.new_pairs
            .tokens()
            .iter()
            .chain(self.store.items().iter().filter(|t| t.status != TokenStatus::New))
            .filter(|t| seen.insert(t.id.clone()))
            .cloned()
            .collect();
        search_service::search(&pool, query)
    }

    /// One column as it should be displayed.
    pub fn column(&self, status: TokenStatus, now: DateTime<Utc>) -> BoardColumn {
        let tokens = match status {
            TokenStatus::New => self.new_pairs.tokens().to_vec(),
            _ => self.store.column(status),
        };
        let mut tokens = self.filters.apply(status, tokens, now);
        if status == TokenStatus::Final {
            tokens = self.highlighter.order(tokens);
        }

        let cards = tokens
            .into_iter()
            .map(|token| {
                let converting =
                    status == TokenStatus::Final && self.highlighter.is_converting(&token.id);
                BoardCard::new(token, converting, &self.images)
            })
            .collect();

        BoardColumn {
            status,
            title: status.title(),
            cards,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> BoardSnapshot {
        BoardSnapshot {
            generated_at: now,
            is_live: self.is_live(),
            columns: TokenStatus::all()
                .iter()
                .map(|status| self.column(*status, now))
                .collect(),
        }
    }

    pub fn render_text(&self, now: DateTime<Utc>, rows: usize) -> String {
        self.snapshot(now).render_text(&self.display, rows)
    }
}
