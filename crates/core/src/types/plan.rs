//! Health-plan catalog types.
//!
//! Plans are immutable reference data loaded from the catalog at startup;
//! nothing in the portal mutates them. Prices are kept in
//! [`rust_decimal::Decimal`] so monthly premiums add up exactly.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::PlanId;

/// ANS age brackets used by every price table.
///
/// Declaration order is bracket order, which gives the derived `Ord` the
/// right sort for price-table rendering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AgeRange {
    #[serde(rename = "0-18")]
    R0To18,
    #[serde(rename = "19-23")]
    R19To23,
    #[serde(rename = "24-28")]
    R24To28,
    #[serde(rename = "29-33")]
    R29To33,
    #[serde(rename = "34-38")]
    R34To38,
    #[serde(rename = "39-43")]
    R39To43,
    #[serde(rename = "44-48")]
    R44To48,
    #[serde(rename = "49-53")]
    R49To53,
    #[serde(rename = "54-58")]
    R54To58,
    #[serde(rename = "59+")]
    R59Plus,
}

impl AgeRange {
    /// All brackets in ascending order.
    pub const ALL: [Self; 10] = [
        Self::R0To18,
        Self::R19To23,
        Self::R24To28,
        Self::R29To33,
        Self::R34To38,
        Self::R39To43,
        Self::R44To48,
        Self::R49To53,
        Self::R54To58,
        Self::R59Plus,
    ];

    /// The bracket's display label (`"0-18"` … `"59+"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::R0To18 => "0-18",
            Self::R19To23 => "19-23",
            Self::R24To28 => "24-28",
            Self::R29To33 => "29-33",
            Self::R34To38 => "34-38",
            Self::R39To43 => "39-43",
            Self::R44To48 => "44-48",
            Self::R49To53 => "49-53",
            Self::R54To58 => "54-58",
            Self::R59Plus => "59+",
        }
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Contract category a plan can be quoted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteCategory {
    /// Individual / family.
    #[serde(rename = "PF")]
    Pf,
    /// Small business, 1+ lives.
    #[serde(rename = "PME_1")]
    Pme1,
    /// Small business, 2+ lives.
    #[serde(rename = "PME_2")]
    Pme2,
    /// Small business, 30+ lives.
    #[serde(rename = "PME_30")]
    Pme30,
}

/// Accommodation tier covered by a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accommodation {
    Enfermaria,
    Apartamento,
}

impl std::fmt::Display for Accommodation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enfermaria => write!(f, "Enfermaria"),
            Self::Apartamento => write!(f, "Apartamento"),
        }
    }
}

/// Coparticipation model of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coparticipation {
    Full,
    Partial,
    None,
}

impl Coparticipation {
    /// Display label used on the quoting screen.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Full => "Coparticipação total",
            Self::Partial => "Coparticipação parcial",
            Self::None => "Sem coparticipação",
        }
    }
}

/// A per-service copay fee, kept as display strings from the operator table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopayFee {
    pub service: String,
    pub value: String,
}

/// A pricing catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPlan {
    pub id: PlanId,
    pub name: String,
    pub operator: String,
    pub accommodation: Accommodation,
    pub coparticipation: Coparticipation,
    /// Monthly premium per age bracket. Brackets a plan does not sell are
    /// simply absent.
    pub prices: BTreeMap<AgeRange, Decimal>,
    pub hospitals: Vec<String>,
    pub description: String,
    pub categories: Vec<QuoteCategory>,
    pub coverage: String,
    pub grace_periods: Vec<String>,
    pub copay_fees: Vec<CopayFee>,
}

impl HealthPlan {
    /// The monthly premium for one life in the given bracket, if priced.
    #[must_use]
    pub fn price_for(&self, range: AgeRange) -> Option<Decimal> {
        self.prices.get(&range).copied()
    }

    /// Whether the plan can be quoted under the given category.
    #[must_use]
    pub fn offers_category(&self, category: QuoteCategory) -> bool {
        self.categories.contains(&category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn sample_plan() -> HealthPlan {
        HealthPlan {
            id: PlanId::new("vida-plus-enf"),
            name: "Vida Plus".to_owned(),
            operator: "Vida Seguradora".to_owned(),
            accommodation: Accommodation::Enfermaria,
            coparticipation: Coparticipation::Partial,
            prices: BTreeMap::from([
                (AgeRange::R0To18, dec!(180.50)),
                (AgeRange::R59Plus, dec!(890.00)),
            ]),
            hospitals: vec!["Hospital Central".to_owned()],
            description: "Plano de entrada".to_owned(),
            categories: vec![QuoteCategory::Pf, QuoteCategory::Pme1],
            coverage: "Ambulatorial + Hospitalar".to_owned(),
            grace_periods: vec!["24h urgência".to_owned()],
            copay_fees: vec![CopayFee {
                service: "Consulta".to_owned(),
                value: "R$ 25,00".to_owned(),
            }],
        }
    }

    #[test]
    fn test_age_range_serde_labels() {
        let json = serde_json::to_string(&AgeRange::R59Plus).unwrap();
        assert_eq!(json, "\"59+\"");
        let parsed: AgeRange = serde_json::from_str("\"0-18\"").unwrap();
        assert_eq!(parsed, AgeRange::R0To18);
    }

    #[test]
    fn test_age_range_order_matches_declaration() {
        let mut sorted = AgeRange::ALL;
        sorted.sort();
        assert_eq!(sorted, AgeRange::ALL);
    }

    #[test]
    fn test_price_table_as_json_map() {
        let plan = sample_plan();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["prices"]["0-18"], serde_json::json!("180.50"));
    }

    #[test]
    fn test_price_for_absent_bracket() {
        let plan = sample_plan();
        assert_eq!(plan.price_for(AgeRange::R0To18), Some(dec!(180.50)));
        assert_eq!(plan.price_for(AgeRange::R24To28), None);
    }

    #[test]
    fn test_offers_category() {
        let plan = sample_plan();
        assert!(plan.offers_category(QuoteCategory::Pf));
        assert!(!plan.offers_category(QuoteCategory::Pme30));
    }
}
