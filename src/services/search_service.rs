use crate::enums::SortOption;
use crate::market::token::TokenRecord;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub sort: SortOption,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sort: SortOption::default(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn sort_by(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Case-insensitive match on name, symbol or id; an empty query matches all.
pub fn matches(token: &TokenRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    token.name.to_lowercase().contains(needle) ||
        token.symbol.to_lowercase().contains(needle) ||
        token.id.to_lowercase().contains(needle)
}

pub fn search(items: &[TokenRecord], query: &SearchQuery) -> Vec<TokenRecord> {
    let needle = query.text.trim().to_lowercase();

    let mut results: Vec<TokenRecord> = items
        .iter()
        .filter(|t| matches(t, &needle))
        .cloned()
        .collect();

    match query.sort {
        SortOption::Time => results.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOption::MarketCap => results.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap)),
        SortOption::Volume => results.sort_by(|a, b| b.volume.cmp(&a.volume)),
        SortOption::Transactions => results.sort_by(|a, b| b.transactions.cmp(&a.transactions)),
    }

    results.truncate(query.limit);
    results
}
