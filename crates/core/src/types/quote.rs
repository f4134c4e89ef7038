//! Quote calculation over the plan catalog.
//!
//! A quote is derived, ephemeral data: a plan plus a computed total and a
//! per-bracket breakdown, recomputed fresh for every request and never
//! persisted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::plan::{AgeRange, HealthPlan};

/// How many lives the customer wants covered per age bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanSelection(BTreeMap<AgeRange, u32>);

impl PlanSelection {
    /// An empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the life count for a bracket. A zero count removes the bracket.
    pub fn set(&mut self, range: AgeRange, count: u32) {
        if count == 0 {
            self.0.remove(&range);
        } else {
            self.0.insert(range, count);
        }
    }

    /// The life count for a bracket.
    #[must_use]
    pub fn count(&self, range: AgeRange) -> u32 {
        self.0.get(&range).copied().unwrap_or(0)
    }

    /// Total lives across all brackets.
    #[must_use]
    pub fn total_lives(&self) -> u32 {
        self.0.values().sum()
    }

    /// Whether no lives were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(bracket, count)` pairs in bracket order.
    pub fn iter(&self) -> impl Iterator<Item = (AgeRange, u32)> + '_ {
        self.0.iter().map(|(range, count)| (*range, *count))
    }
}

/// One line of a quote breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub age_range: AgeRange,
    pub count: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// A plan priced against a concrete selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedPlan {
    pub plan: HealthPlan,
    pub total: Decimal,
    pub lines: Vec<QuoteLine>,
}

impl CalculatedPlan {
    /// Price a plan against a selection.
    ///
    /// Brackets with a zero count and brackets the plan does not price are
    /// skipped; the total is the sum of `count × unit price` over the
    /// remaining lines.
    #[must_use]
    pub fn quote(plan: &HealthPlan, selection: &PlanSelection) -> Self {
        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;

        for (range, count) in selection.iter() {
            let Some(unit_price) = plan.price_for(range) else {
                continue;
            };
            let subtotal = unit_price * Decimal::from(count);
            total += subtotal;
            lines.push(QuoteLine {
                age_range: range,
                count,
                unit_price,
                subtotal,
            });
        }

        Self {
            plan: plan.clone(),
            total,
            lines,
        }
    }
}

/// Quote every plan in `plans` against `selection`, cheapest total first.
#[must_use]
pub fn quote_all(plans: &[HealthPlan], selection: &PlanSelection) -> Vec<CalculatedPlan> {
    let mut quotes: Vec<CalculatedPlan> = plans
        .iter()
        .map(|plan| CalculatedPlan::quote(plan, selection))
        .collect();
    quotes.sort_by(|a, b| a.total.cmp(&b.total));
    quotes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::dec;

    use super::*;
    use crate::types::id::PlanId;
    use crate::types::plan::{Accommodation, Coparticipation, QuoteCategory};

    fn plan(id: &str, prices: &[(AgeRange, Decimal)]) -> HealthPlan {
        HealthPlan {
            id: PlanId::new(id),
            name: id.to_owned(),
            operator: "Operadora".to_owned(),
            accommodation: Accommodation::Apartamento,
            coparticipation: Coparticipation::None,
            prices: BTreeMap::from_iter(prices.iter().copied()),
            hospitals: vec![],
            description: String::new(),
            categories: vec![QuoteCategory::Pf],
            coverage: String::new(),
            grace_periods: vec![],
            copay_fees: vec![],
        }
    }

    #[test]
    fn test_quote_sums_count_times_unit_price() {
        let plan = plan(
            "p1",
            &[
                (AgeRange::R0To18, dec!(100.00)),
                (AgeRange::R59Plus, dec!(500.00)),
            ],
        );
        let mut selection = PlanSelection::new();
        selection.set(AgeRange::R0To18, 2);
        selection.set(AgeRange::R59Plus, 1);

        let quote = CalculatedPlan::quote(&plan, &selection);
        assert_eq!(quote.total, dec!(700.00));
        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].subtotal, dec!(200.00));
    }

    #[test]
    fn test_quote_skips_unpriced_brackets() {
        let plan = plan("p1", &[(AgeRange::R0To18, dec!(100.00))]);
        let mut selection = PlanSelection::new();
        selection.set(AgeRange::R0To18, 1);
        selection.set(AgeRange::R34To38, 3);

        let quote = CalculatedPlan::quote(&plan, &selection);
        assert_eq!(quote.total, dec!(100.00));
        assert_eq!(quote.lines.len(), 1);
    }

    #[test]
    fn test_zero_count_removes_bracket() {
        let mut selection = PlanSelection::new();
        selection.set(AgeRange::R0To18, 2);
        selection.set(AgeRange::R0To18, 0);
        assert!(selection.is_empty());
        assert_eq!(selection.total_lives(), 0);
    }

    #[test]
    fn test_empty_selection_quotes_to_zero() {
        let plan = plan("p1", &[(AgeRange::R0To18, dec!(100.00))]);
        let quote = CalculatedPlan::quote(&plan, &PlanSelection::new());
        assert_eq!(quote.total, Decimal::ZERO);
        assert!(quote.lines.is_empty());
    }

    #[test]
    fn test_quote_all_sorts_cheapest_first() {
        let expensive = plan("caro", &[(AgeRange::R0To18, dec!(300.00))]);
        let cheap = plan("barato", &[(AgeRange::R0To18, dec!(100.00))]);
        let mut selection = PlanSelection::new();
        selection.set(AgeRange::R0To18, 1);

        let quotes = quote_all(&[expensive, cheap], &selection);
        assert_eq!(quotes[0].plan.id, PlanId::new("barato"));
        assert_eq!(quotes[1].plan.id, PlanId::new("caro"));
    }
}
