use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::enums::{ BadgeIcon, BadgeType, TokenStatus };

/// Annotation pill shown under a token's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: BadgeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<BadgeIcon>,
}

impl Badge {
    fn new(label: &str, kind: BadgeType, value: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            kind,
            value: value.map(str::to_string),
            icon: None,
        }
    }

    /// Fixed badge set for each column.
    pub fn template(status: TokenStatus) -> Vec<Badge> {
        match status {
            TokenStatus::New =>
                vec![
                    Badge::new("DS 3mo", BadgeType::Info, None),
                    Badge::new("1%", BadgeType::Success, Some("1%")),
                    Badge::new("0%", BadgeType::Success, Some("0%")),
                    Badge::new("0%", BadgeType::Success, Some("0%"))
                ],
            TokenStatus::Final =>
                vec![
                    Badge::new("44%", BadgeType::Danger, Some("44%")),
                    Badge::new("0% 6mo", BadgeType::Success, Some("0%")),
                    Badge::new("69%", BadgeType::Danger, Some("69%"))
                ],
            TokenStatus::Migrated =>
                vec![
                    Badge::new("10%", BadgeType::Success, None),
                    Badge::new("DS 2mo", BadgeType::Info, None),
                    Badge::new("50%", BadgeType::Danger, None),
                    Badge::new("50%", BadgeType::Danger, None)
                ],
        }
    }
}

/// One simulated tradable token.
///
/// `status` is fixed for the life of a record; a token that appears in another
/// column is a new record with its own `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,

    pub market_cap: f64,
    pub volume: u64,
    pub fdv: u64,
    pub transactions: u64,
    pub tx_count: u32,

    pub status: TokenStatus,
    pub bonding_progress: u8,

    pub holders: u32,
    pub top10_holders: u8,
    pub has_audit: bool,
    pub is_safe: bool,

    pub badges: Vec<Badge>,
    pub price_change_5m: f64,
}

impl TokenRecord {
    /// Copy of this record re-issued into `status` under a fresh identity.
    pub fn respawn(&self, id: String, status: TokenStatus, created_at: DateTime<Utc>) -> Self {
        let badges = if status == self.status {
            self.badges.clone()
        } else {
            Badge::template(status)
        };

        Self {
            id,
            status,
            created_at,
            badges,
            ..self.clone()
        }
    }

    /// Age at `now`, never negative.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> TokenRecord {
        TokenRecord {
            id: "final-3".to_string(),
            name: "NICHE 3".to_string(),
            symbol: "Memes".to_string(),
            image_url: "https://picsum.photos/seed/final3/100/100".to_string(),
            created_at: Utc::now() - Duration::minutes(10),
            market_cap: 4200.0,
            volume: 900,
            fdv: 120_000,
            transactions: 80,
            tx_count: 12,
            status: TokenStatus::Final,
            bonding_progress: 44,
            holders: 150,
            top10_holders: 20,
            has_audit: true,
            is_safe: true,
            badges: Badge::template(TokenStatus::Final),
            price_change_5m: 1.5,
        }
    }

    #[test]
    fn test_badge_templates_differ_per_status() {
        assert_eq!(Badge::template(TokenStatus::New).len(), 4);
        assert_eq!(Badge::template(TokenStatus::Final).len(), 3);
        assert_ne!(Badge::template(TokenStatus::New), Badge::template(TokenStatus::Migrated));
    }

    #[test]
    fn test_respawn_into_other_column_takes_its_badges() {
        let original = sample();
        let now = Utc::now();
        let clone = original.respawn("new-abc".to_string(), TokenStatus::New, now);

        assert_eq!(clone.id, "new-abc");
        assert_eq!(clone.status, TokenStatus::New);
        assert_eq!(clone.created_at, now);
        assert_eq!(clone.name, original.name);
        assert_eq!(clone.badges, Badge::template(TokenStatus::New));
    }

    #[test]
    fn test_age_is_clamped_at_zero() {
        let mut token = sample();
        let now = Utc::now();
        token.created_at = now + Duration::seconds(30);
        assert_eq!(token.age_secs(now), 0);
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("marketCap").is_some());
        assert!(json.get("top10Holders").is_some());
        assert_eq!(json["status"], "final");
        assert_eq!(json["badges"][0]["type"], "danger");
    }
}
