use std::collections::HashMap;

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::enums::TokenStatus;
use crate::error::{ AppError, Result };
use crate::market::token::TokenRecord;

/// Per-column filter settings. The default lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub min_age_minutes: Option<u64>,
    pub max_age_minutes: Option<u64>,
    pub min_top10_holders: Option<u8>,
    pub max_top10_holders: Option<u8>,
}

impl ColumnFilter {
    /// Split a "keyword1, keyword2" field into lowercase terms.
    pub fn parse_keywords(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn with_include(mut self, input: &str) -> Self {
        self.include_keywords = Self::parse_keywords(input);
        self
    }

    pub fn with_exclude(mut self, input: &str) -> Self {
        self.exclude_keywords = Self::parse_keywords(input);
        self
    }

    pub fn with_age_minutes(mut self, min: Option<u64>, max: Option<u64>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(AppError::InvalidInput(format!("Age range {}..{} is empty", lo, hi)));
            }
        }
        self.min_age_minutes = min;
        self.max_age_minutes = max;
        Ok(self)
    }

    pub fn with_top10_holders(mut self, min: Option<u8>, max: Option<u8>) -> Result<Self> {
        for bound in [min, max].into_iter().flatten() {
            if bound > 100 {
                return Err(
                    AppError::InvalidInput(format!("Top 10 holders % out of range: {}", bound))
                );
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(
                    AppError::InvalidInput(format!("Top 10 holders range {}..{} is empty", lo, hi))
                );
            }
        }
        self.min_top10_holders = min;
        self.max_top10_holders = max;
        Ok(self)
    }

    pub fn is_default(&self) -> bool {
        *self == ColumnFilter::default()
    }

    pub fn matches(&self, token: &TokenRecord, now: DateTime<Utc>) -> bool {
        let name = token.name.to_lowercase();
        let symbol = token.symbol.to_lowercase();
        let hit = |k: &String| name.contains(k.as_str()) || symbol.contains(k.as_str());

        if !self.include_keywords.is_empty() && !self.include_keywords.iter().any(hit) {
            return false;
        }
        if self.exclude_keywords.iter().any(hit) {
            return false;
        }

        let age_minutes = (token.age_secs(now) / 60) as u64;
        if self.min_age_minutes.is_some_and(|min| age_minutes < min) {
            return false;
        }
        if self.max_age_minutes.is_some_and(|max| age_minutes > max) {
            return false;
        }

        if self.min_top10_holders.is_some_and(|min| token.top10_holders < min) {
            return false;
        }
        if self.max_top10_holders.is_some_and(|max| token.top10_holders > max) {
            return false;
        }

        true
    }

    /// Keep matching records, preserving order.
    pub fn apply(&self, tokens: Vec<TokenRecord>, now: DateTime<Utc>) -> Vec<TokenRecord> {
        if self.is_default() {
            return tokens;
        }
        tokens
            .into_iter()
            .filter(|t| self.matches(t, now))
            .collect()
    }
}

/// Filters for all three columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnFilters {
    filters: HashMap<TokenStatus, ColumnFilter>,
}

impl ColumnFilters {
    pub fn get(&self, status: TokenStatus) -> ColumnFilter {
        self.filters.get(&status).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, status: TokenStatus, filter: ColumnFilter) {
        tracing::debug!("Filter for {} updated: {:?}", status, filter);
        self.filters.insert(status, filter);
    }

    pub fn reset(&mut self, status: TokenStatus) {
        self.filters.remove(&status);
    }

    pub fn apply(
        &self,
        status: TokenStatus,
        tokens: Vec<TokenRecord>,
        now: DateTime<Utc>
    ) -> Vec<TokenRecord> {
        match self.filters.get(&status) {
            Some(filter) => filter.apply(tokens, now),
            None => tokens,
        }
    }
}
