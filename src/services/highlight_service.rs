use std::collections::HashSet;

use crate::market::token::TokenRecord;

/// Decides which Final Stretch records are shown as "converting".
pub trait ConversionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ids to flag, given the column in display order.
    fn select(&self, column: &[TokenRecord]) -> HashSet<String>;
}

/// Flags the first `count` records of the column.
///
/// Stands in until a metrics-based rule exists.
#[derive(Debug, Clone)]
pub struct LeadingPrefixPolicy {
    count: usize,
}

impl LeadingPrefixPolicy {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl Default for LeadingPrefixPolicy {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ConversionPolicy for LeadingPrefixPolicy {
    fn name(&self) -> &'static str {
        "leading_prefix"
    }

    fn select(&self, column: &[TokenRecord]) -> HashSet<String> {
        column
            .iter()
            .take(self.count)
            .map(|t| t.id.clone())
            .collect()
    }
}

/// Holds the current converting set and applies it to column ordering.
pub struct ConversionHighlighter {
    policy: Box<dyn ConversionPolicy>,
    converting: HashSet<String>,
}

impl ConversionHighlighter {
    pub fn new(policy: Box<dyn ConversionPolicy>) -> Self {
        Self {
            policy,
            converting: HashSet::new(),
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Swap the policy; the current flags are dropped until the next recompute.
    pub fn set_policy(&mut self, policy: Box<dyn ConversionPolicy>) {
        tracing::info!("Conversion policy {} -> {}", self.policy.name(), policy.name());
        self.policy = policy;
        self.converting.clear();
    }

    /// Re-run the policy over `column`. Returns how many records are flagged.
    pub fn recompute(&mut self, column: &[TokenRecord]) -> usize {
        self.converting = self.policy.select(column);
        self.converting.len()
    }

    pub fn is_converting(&self, id: &str) -> bool {
        self.converting.contains(id)
    }

    pub fn converting(&self) -> &HashSet<String> {
        &self.converting
    }

    /// Flagged records first; each group keeps its incoming order.
    pub fn order(&self, column: Vec<TokenRecord>) -> Vec<TokenRecord> {
        let (mut flagged, rest): (Vec<_>, Vec<_>) = column
            .into_iter()
            .partition(|t| self.converting.contains(&t.id));
        flagged.extend(rest);
        flagged
    }
}

impl Default for ConversionHighlighter {
    fn default() -> Self {
        Self::new(Box::new(LeadingPrefixPolicy::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TokenStatus;
    use crate::market::seed::SeedGenerator;
    use crate::market::store::column_of;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct SafeOnly;

    impl ConversionPolicy for SafeOnly {
        fn name(&self) -> &'static str {
            "safe_only"
        }

        fn select(&self, column: &[TokenRecord]) -> HashSet<String> {
            column
                .iter()
                .filter(|t| t.is_safe)
                .map(|t| t.id.clone())
                .collect()
        }
    }

    fn final_column() -> Vec<TokenRecord> {
        let mut rng = StdRng::seed_from_u64(12);
        let items = SeedGenerator::new(&mut rng, Utc::now()).generate(20, TokenStatus::Final);
        column_of(&items, TokenStatus::Final)
    }

    #[test]
    fn test_default_policy_flags_top_five() {
        let column = final_column();
        let mut highlighter = ConversionHighlighter::default();

        assert_eq!(highlighter.recompute(&column), 5);
        for token in &column[..5] {
            assert!(highlighter.is_converting(&token.id));
        }
        assert!(!highlighter.is_converting(&column[5].id));
    }

    #[test]
    fn test_prefix_policy_with_short_column() {
        let column = final_column();
        let mut highlighter = ConversionHighlighter::default();
        assert_eq!(highlighter.recompute(&column[..3]), 3);
    }

    #[test]
    fn test_order_promotes_flagged_and_keeps_recency() {
        let column = final_column();
        let mut highlighter = ConversionHighlighter::new(Box::new(SafeOnly));
        highlighter.recompute(&column);

        let ordered = highlighter.order(column.clone());
        assert_eq!(ordered.len(), column.len());

        let split = ordered.iter().position(|t| !t.is_safe).unwrap_or(ordered.len());
        assert!(ordered[..split].iter().all(|t| t.is_safe));
        assert!(ordered[split..].iter().all(|t| !t.is_safe));
        assert!(ordered[..split].windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert!(ordered[split..].windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_set_policy_clears_flags() {
        let column = final_column();
        let mut highlighter = ConversionHighlighter::default();
        highlighter.recompute(&column);

        highlighter.set_policy(Box::new(SafeOnly));
        assert!(highlighter.converting().is_empty());
        assert_eq!(highlighter.policy_name(), "safe_only");
    }
}
