//! GameSpecification entity - The rules of a generated card game

use serde::{Deserialize, Serialize};

/// A requested count of cards sharing one thematic/mechanical category.
///
/// Drives the outer generation loop; read-only after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTypeQuota {
    /// Category name (e.g. "Action", "Item")
    pub card_type: String,
    /// Number of cards of this type to generate
    pub quantity: u32,
    /// What cards of this type do
    pub description: String,
}

impl CardTypeQuota {
    pub fn new(card_type: impl Into<String>, quantity: u32, description: impl Into<String>) -> Self {
        Self {
            card_type: card_type.into(),
            quantity,
            description: description.into(),
        }
    }
}

/// A complete game specification produced once per run.
///
/// `total_cards` is whatever the text service reported. It is supposed to
/// equal the sum of the quotas but nothing enforces that; use
/// [`GameSpecification::quota_total`] when the real unit count matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSpecification {
    pub title: String,
    pub objective: String,
    pub setup: String,
    pub gameplay: String,
    pub winning_conditions: String,
    pub card_types: Vec<CardTypeQuota>,
    pub total_cards: u32,
}

impl GameSpecification {
    /// Sum of `quantity` across all card types.
    pub fn quota_total(&self) -> u32 {
        self.card_types
            .iter()
            .fold(0u32, |acc, quota| acc.saturating_add(quota.quantity))
    }

    /// Whether the reported `total_cards` matches the quota sum.
    pub fn has_consistent_total(&self) -> bool {
        self.total_cards == self.quota_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(quotas: Vec<CardTypeQuota>, total_cards: u32) -> GameSpecification {
        GameSpecification {
            title: "Market Day".to_string(),
            objective: "Trade your way to the most coins".to_string(),
            setup: "Shuffle the deck".to_string(),
            gameplay: "Take turns trading".to_string(),
            winning_conditions: "Most coins wins".to_string(),
            card_types: quotas,
            total_cards,
        }
    }

    #[test]
    fn quota_total_sums_quantities() {
        let spec = spec_with(
            vec![
                CardTypeQuota::new("Goods", 5, "Things to trade"),
                CardTypeQuota::new("Event", 3, "Market events"),
            ],
            8,
        );

        assert_eq!(spec.quota_total(), 8);
        assert!(spec.has_consistent_total());
    }

    #[test]
    fn reports_mismatched_total() {
        let spec = spec_with(vec![CardTypeQuota::new("Goods", 4, "Things to trade")], 40);

        assert_eq!(spec.quota_total(), 4);
        assert!(!spec.has_consistent_total());
    }

    #[test]
    fn zero_quantity_quota_contributes_nothing() {
        let spec = spec_with(
            vec![
                CardTypeQuota::new("Goods", 0, "Things to trade"),
                CardTypeQuota::new("Event", 2, "Market events"),
            ],
            2,
        );

        assert_eq!(spec.quota_total(), 2);
    }
}
