use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ─── TokenStatus ─────────────────────────────────────────────────────

/// Lifecycle stage of a token; decides which column it is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    New,
    Final,
    Migrated,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::New => "new",
            TokenStatus::Final => "final",
            TokenStatus::Migrated => "migrated",
        }
    }

    /// Column header shown above the cards.
    pub fn title(&self) -> &'static str {
        match self {
            TokenStatus::New => "New Pairs",
            TokenStatus::Final => "Final Stretch",
            TokenStatus::Migrated => "Migrated",
        }
    }

    /// Column order on the board.
    pub fn all() -> &'static [TokenStatus] {
        &[TokenStatus::New, TokenStatus::Final, TokenStatus::Migrated]
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" | "new pairs" => Ok(TokenStatus::New),
            "final" | "final stretch" => Ok(TokenStatus::Final),
            "migrated" => Ok(TokenStatus::Migrated),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid token status: {}. Supported: new, final, migrated",
                s
            ))),
        }
    }
}

// ─── BadgeType ───────────────────────────────────────────────────────

/// Colour class of a card badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    Success,
    Danger,
    Neutral,
    Warning,
    Info,
}

impl BadgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeType::Success => "success",
            BadgeType::Danger => "danger",
            BadgeType::Neutral => "neutral",
            BadgeType::Warning => "warning",
            BadgeType::Info => "info",
        }
    }

    /// Single-character marker used by the text renderer.
    pub fn marker(&self) -> char {
        match self {
            BadgeType::Success => '+',
            BadgeType::Danger => '!',
            BadgeType::Neutral => '·',
            BadgeType::Warning => '~',
            BadgeType::Info => 'i',
        }
    }
}

impl fmt::Display for BadgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── BadgeIcon ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeIcon {
    Shield,
    Lock,
    User,
    Rocket,
}

impl BadgeIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeIcon::Shield => "shield",
            BadgeIcon::Lock => "lock",
            BadgeIcon::User => "user",
            BadgeIcon::Rocket => "rocket",
        }
    }
}

// ─── SortOption ──────────────────────────────────────────────────────

/// Ordering applied to search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Time,
    MarketCap,
    Volume,
    Transactions,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Time => "time",
            SortOption::MarketCap => "mc",
            SortOption::Volume => "volume",
            SortOption::Transactions => "txns",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" | "age" => Ok(SortOption::Time),
            "mc" | "market_cap" | "marketcap" => Ok(SortOption::MarketCap),
            "volume" | "vol" => Ok(SortOption::Volume),
            "txns" | "transactions" | "tx" => Ok(SortOption::Transactions),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid sort option: {}. Supported: time, mc, volume, txns",
                s
            ))),
        }
    }
}

// ─── MetricSize ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSize {
    #[default]
    Small,
    Large,
}

impl FromStr for MetricSize {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(MetricSize::Small),
            "large" => Ok(MetricSize::Large),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid metric size: {}. Supported: small, large",
                s
            ))),
        }
    }
}

// ─── CardMetric ──────────────────────────────────────────────────────

/// Metrics a card can show; the visible set is a display setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardMetric {
    MarketCap,
    Volume,
    Transactions,
    Holders,
    Top10Holders,
}

impl CardMetric {
    pub fn label(&self) -> &'static str {
        match self {
            CardMetric::MarketCap => "MC",
            CardMetric::Volume => "V",
            CardMetric::Transactions => "TX",
            CardMetric::Holders => "H",
            CardMetric::Top10Holders => "T10",
        }
    }

    pub fn all() -> &'static [CardMetric] {
        &[
            CardMetric::MarketCap,
            CardMetric::Volume,
            CardMetric::Transactions,
            CardMetric::Holders,
            CardMetric::Top10Holders,
        ]
    }
}

impl FromStr for CardMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "market_cap" | "mc" => Ok(CardMetric::MarketCap),
            "volume" | "v" => Ok(CardMetric::Volume),
            "tx" | "transactions" => Ok(CardMetric::Transactions),
            "holders" | "h" => Ok(CardMetric::Holders),
            "top_10_holders" | "top10_holders" | "t10" => Ok(CardMetric::Top10Holders),
            _ => Err(AppError::InvalidInput(format!("Invalid card metric: {}", s))),
        }
    }
}
