use std::collections::BTreeSet;

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::enums::{ CardMetric, MetricSize, TokenStatus };
use crate::market::token::TokenRecord;
use crate::view::format::{ format_currency, format_number, format_time_ago, image_host, short_id };
use crate::view::variant;

const BADGES_PER_CARD: usize = 4;
const PROGRESS_WIDTH: usize = 10;

/// Card display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub metric_size: MetricSize,
    pub no_decimals: bool,
    pub progress_bar: bool,
    pub visible_metrics: BTreeSet<CardMetric>,
    pub color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            metric_size: MetricSize::Small,
            no_decimals: false,
            progress_bar: false,
            visible_metrics: [
                CardMetric::MarketCap,
                CardMetric::Volume,
                CardMetric::Holders,
                CardMetric::Top10Holders,
            ]
                .into_iter()
                .collect(),
            color: false,
        }
    }
}

impl DisplaySettings {
    /// Flip a metric on or off; returns whether it is now visible.
    pub fn toggle_metric(&mut self, metric: CardMetric) -> bool {
        if !self.visible_metrics.remove(&metric) {
            self.visible_metrics.insert(metric);
            return true;
        }
        false
    }
}

/// Per-render inputs that are not part of the record itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardState {
    pub converting: bool,
    pub image_failed: bool,
}

fn metric_value(token: &TokenRecord, metric: CardMetric, settings: &DisplaySettings) -> String {
    match metric {
        CardMetric::MarketCap => format_currency(token.market_cap, settings.no_decimals),
        CardMetric::Volume => format_currency(token.volume as f64, settings.no_decimals),
        CardMetric::Transactions => format_number(u64::from(token.tx_count)),
        CardMetric::Holders => format_number(u64::from(token.holders)),
        CardMetric::Top10Holders => format!("{}%", token.top10_holders),
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = (usize::from(progress.min(100)) * PROGRESS_WIDTH) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        progress
    )
}

/// Render one card as terminal lines.
pub fn render_card(
    token: &TokenRecord,
    now: DateTime<Utc>,
    settings: &DisplaySettings,
    state: CardState
) -> Vec<String> {
    let look = variant::for_token(token);

    let image = match image_host(&token.image_url) {
        Some(host) if !state.image_failed => format!("[{}]", host),
        _ => format!("[{}]", look.icon.glyph()),
    };
    let marker = if state.converting { '»' } else { ' ' };
    let security = if token.is_safe { "safe" } else { "lock" };
    let stage = match token.status {
        TokenStatus::New => '♣',
        _ => '▲',
    };

    let mut symbol = token.symbol.clone();
    if settings.color {
        symbol = format!("\x1b[{}m{}\x1b[0m", look.palette.ansi, symbol);
    }

    let mut lines = vec![
        format!(
            "{}{}{} {} {} · {} · {} · {}",
            marker,
            image,
            stage,
            symbol,
            token.name,
            format_time_ago(token.created_at, now),
            security,
            short_id(&token.id)
        )
    ];

    let metrics: Vec<String> = settings.visible_metrics
        .iter()
        .map(|m| format!("{} {}", m.label(), metric_value(token, *m, settings)))
        .collect();

    let badges: Vec<String> = token.badges
        .iter()
        .take(BADGES_PER_CARD)
        .map(|b| format!("{}{}", b.kind.marker(), b.label))
        .collect();

    match settings.metric_size {
        MetricSize::Small => {
            let mut row = badges.join(" ");
            if !metrics.is_empty() {
                row = format!("{}  |  {}", row, metrics.join("  "));
            }
            lines.push(format!("   {}", row));
        }
        MetricSize::Large => {
            lines.push(format!("   {}", badges.join(" ")));
            if !metrics.is_empty() {
                lines.push(format!("   {}", metrics.join("   ")));
            }
        }
    }

    if settings.progress_bar && token.status != TokenStatus::Migrated {
        lines.push(format!("   {}", progress_bar(token.bonding_progress)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::token::Badge;
    use chrono::Duration;

    fn token(now: DateTime<Utc>) -> TokenRecord {
        TokenRecord {
            id: "new-0".to_string(),
            name: "MOON2".to_string(),
            symbol: "BOOTS".to_string(),
            image_url: "https://picsum.photos/seed/new0/100/100".to_string(),
            created_at: now - Duration::seconds(42),
            market_cap: 4_560.0,
            volume: 1_200,
            fdv: 20_000,
            transactions: 50,
            tx_count: 3,
            status: TokenStatus::New,
            bonding_progress: 50,
            holders: 1_500,
            top10_holders: 12,
            has_audit: false,
            is_safe: true,
            badges: Badge::template(TokenStatus::New),
            price_change_5m: 0.0,
        }
    }

    #[test]
    fn test_small_card_has_header_and_metric_row() {
        let now = Utc::now();
        let lines = render_card(&token(now), now, &DisplaySettings::default(), CardState::default());

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[picsum.photos]"));
        assert!(lines[0].contains("BOOTS MOON2"));
        assert!(lines[0].contains("42s"));
        assert!(lines[1].contains("MC $4.56K"));
        assert!(lines[1].contains("H 1.5K"));
        assert!(lines[1].contains("iDS 3mo"));
    }

    #[test]
    fn test_large_metrics_and_progress_bar() {
        let now = Utc::now();
        let settings = DisplaySettings {
            metric_size: MetricSize::Large,
            progress_bar: true,
            no_decimals: true,
            ..DisplaySettings::default()
        };
        let lines = render_card(&token(now), now, &settings, CardState::default());

        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("MC $5K"));
        assert!(lines[3].contains("[#####-----] 50%"));
    }

    #[test]
    fn test_converting_and_image_fallback() {
        let now = Utc::now();
        let t = token(now);
        let state = CardState { converting: true, image_failed: true };
        let lines = render_card(&t, now, &DisplaySettings::default(), state);

        let glyph = variant::for_token(&t).icon.glyph();
        assert!(lines[0].starts_with('»'));
        assert!(lines[0].contains(&format!("[{}]", glyph)));
        assert!(!lines[0].contains("picsum.photos"));
    }

    #[test]
    fn test_missing_image_url_uses_glyph() {
        let now = Utc::now();
        let mut t = token(now);
        t.image_url = String::new();
        let lines = render_card(&t, now, &DisplaySettings::default(), CardState::default());

        let glyph = variant::for_token(&t).icon.glyph();
        assert!(lines[0].contains(&format!("[{}]", glyph)));
    }

    #[test]
    fn test_toggle_metric() {
        let mut settings = DisplaySettings::default();
        assert!(settings.toggle_metric(CardMetric::Transactions));
        assert!(!settings.toggle_metric(CardMetric::Transactions));
        assert!(!settings.visible_metrics.contains(&CardMetric::Transactions));
    }

    #[test]
    fn test_variant_falls_back_to_symbol() {
        let now = Utc::now();
        let mut t = token(now);
        t.id = String::new();
        assert_eq!(variant::for_token(&t), variant::select("BOOTS"));
    }
}
