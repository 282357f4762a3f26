use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{ DateTime, Utc };
use serde::Serialize;

use crate::enums::TokenStatus;
use crate::market::token::TokenRecord;
use crate::view::card::{ render_card, CardState, DisplaySettings };
use crate::view::variant::{ self, DisplayVariant };

/// Ids whose image failed to load. Once failed, a card stays on its fallback icon.
#[derive(Debug, Clone, Default)]
pub struct ImageFailures {
    failed: HashSet<String>,
}

impl ImageFailures {
    /// Returns `true` the first time an id is marked.
    pub fn mark_failed(&mut self, id: &str) -> bool {
        self.failed.insert(id.to_string())
    }

    pub fn has_failed(&self, id: &str) -> bool {
        self.failed.contains(id)
    }

    /// Forget ids that are no longer on the board.
    pub fn retain_live<'a>(&mut self, live_ids: impl IntoIterator<Item = &'a str>) {
        let live: HashSet<&str> = live_ids.into_iter().collect();
        self.failed.retain(|id| live.contains(id.as_str()));
    }
}

/// A record as placed on the board, with its per-render state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    #[serde(flatten)]
    pub token: TokenRecord,
    pub converting: bool,
    pub image_failed: bool,
    /// Look to draw in place of the image, set only when the image failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<DisplayVariant>,
}

impl BoardCard {
    pub fn new(token: TokenRecord, converting: bool, images: &ImageFailures) -> Self {
        let image_failed = images.has_failed(&token.id);
        let fallback = if image_failed { Some(variant::for_token(&token)) } else { None };
        Self {
            token,
            converting,
            image_failed,
            fallback,
        }
    }

    pub fn state(&self) -> CardState {
        CardState {
            converting: self.converting,
            image_failed: self.image_failed,
        }
    }
}

/// One column as displayed: partitioned, ordered and filtered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: TokenStatus,
    pub title: &'static str,
    pub cards: Vec<BoardCard>,
}

impl BoardColumn {
    pub fn is_converting(&self, id: &str) -> bool {
        self.cards.iter().any(|c| c.converting && c.token.id == id)
    }

    pub fn converting_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.converting)
            .count()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &TokenRecord> {
        self.cards.iter().map(|c| &c.token)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub is_live: bool,
    pub columns: Vec<BoardColumn>,
}

impl BoardSnapshot {
    pub fn column(&self, status: TokenStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text rendering, `rows` cards per column, columns stacked vertically.
    pub fn render_text(&self, settings: &DisplaySettings, rows: usize) -> String {
        let mut out = String::new();
        let live = if self.is_live { "LIVE" } else { "PAUSED" };
        let _ = writeln!(out, "Pulse  [{}]  {}", live, self.generated_at.format("%H:%M:%S"));

        for column in &self.columns {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "── {} ({}) {}",
                column.title,
                column.cards.len(),
                "─".repeat(40usize.saturating_sub(column.title.len()))
            );

            if column.cards.is_empty() {
                let _ = writeln!(out, "   (no tokens match)");
                continue;
            }

            for card in column.cards.iter().take(rows) {
                for line in render_card(&card.token, self.generated_at, settings, card.state()) {
                    let _ = writeln!(out, "{}", line);
                }
            }
        }

        out
    }
}
