//! Monetary summary of a cost sheet.
//!
//! A summary is derived, never stored: it is regenerated from the rows, flags
//! and adjustments on every edit, on load and on save. Figures are kept
//! unrounded here; rounding to cents happens when a payload is produced.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use workshop_core::numeric::{lenient, non_negative};
use workshop_core::ValueObject;

use crate::group::GroupSnapshot;
use crate::line_item::CostCategory;
use crate::tax::TaxRates;

/// Flat proforma adjustments. Negative inputs clamp to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub other_cost: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub discount: Decimal,
}

impl ValueObject for Adjustments {}

impl Adjustments {
    pub fn new(other_cost: Decimal, discount: Decimal) -> Self {
        Self {
            other_cost,
            discount,
        }
    }
}

/// Which screen's totals rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SummaryVariant {
    /// Quotation: adds other cost, subtracts discount, then deducts withholding
    /// when a withholding rate is configured.
    Proforma(Adjustments),
    /// Payment cost editor: subtotal plus VAT, nothing else.
    Payment,
}

/// Subtotal, VAT and VAT-inclusive total of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTotals {
    pub category: CostCategory,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

/// Every figure of a sheet. Serialized with JSON numbers, like the save payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(with = "float_map")]
    pub subtotal_per_group: BTreeMap<CostCategory, Decimal>,
    #[serde(with = "float_map")]
    pub vat_per_group: BTreeMap<CostCategory, Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub grand_subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vat: Decimal,
    /// Proforma: subtotal + VAT + other cost − discount. Payment: subtotal + VAT.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_total: Decimal,
    /// `None` when no withholding applies (payment sheets, or no rate configured).
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub withholding: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_pay: Decimal,
}

mod float_map {
    use std::collections::BTreeMap;

    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    use workshop_core::numeric::coerce_f64;

    use crate::line_item::CostCategory;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<CostCategory, Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(map.iter().map(|(k, v)| (k, v.to_f64().unwrap_or_default())))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<CostCategory, Decimal>, D::Error> {
        let raw = BTreeMap::<CostCategory, f64>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|(k, v)| (k, coerce_f64(v))).collect())
    }
}

impl ValueObject for Summary {}

impl Summary {
    pub fn subtotal_of(&self, category: CostCategory) -> Decimal {
        self.subtotal_per_group
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn vat_of(&self, category: CostCategory) -> Decimal {
        self.vat_per_group
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn group(&self, category: CostCategory) -> GroupTotals {
        let subtotal = self.subtotal_of(category);
        let vat = self.vat_of(category);
        GroupTotals {
            category,
            subtotal,
            vat,
            total: subtotal.saturating_add(vat),
        }
    }

    /// Payment-screen name for the VAT-inclusive total.
    pub fn grand_total(&self) -> Decimal {
        self.gross_total
    }
}

/// Compute every figure a cost screen shows or persists.
///
/// Groups sharing a category are merged. Categories with no group report zero.
pub fn compute_summary(
    groups: &[GroupSnapshot],
    variant: &SummaryVariant,
    rates: &TaxRates,
) -> Summary {
    let mut subtotal_per_group = BTreeMap::new();
    let mut vat_per_group = BTreeMap::new();
    for category in CostCategory::ALL {
        subtotal_per_group.insert(category, Decimal::ZERO);
        vat_per_group.insert(category, Decimal::ZERO);
    }

    for group in groups {
        let vat = rates.vat_on(group.subtotal, group.apply_vat);
        let subtotal = subtotal_per_group.entry(group.category).or_insert(Decimal::ZERO);
        *subtotal = subtotal.saturating_add(group.subtotal);
        let group_vat = vat_per_group.entry(group.category).or_insert(Decimal::ZERO);
        *group_vat = group_vat.saturating_add(vat);
    }

    let grand_subtotal = subtotal_per_group
        .values()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));
    let total_vat = vat_per_group
        .values()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v));
    let vat_inclusive = grand_subtotal.saturating_add(total_vat);

    let (gross_total, withholding) = match variant {
        SummaryVariant::Proforma(adj) => {
            let gross = vat_inclusive
                .saturating_add(non_negative(adj.other_cost))
                .saturating_sub(non_negative(adj.discount));
            let withholding = rates.withholding_rate.map(|rate| gross.saturating_mul(rate));
            (gross, withholding)
        }
        SummaryVariant::Payment => (vat_inclusive, None),
    };

    let net_pay = gross_total.saturating_sub(withholding.unwrap_or(Decimal::ZERO));

    Summary {
        subtotal_per_group,
        vat_per_group,
        grand_subtotal,
        total_vat,
        gross_total,
        withholding,
        net_pay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot(category: CostCategory, subtotal: &str, apply_vat: bool) -> GroupSnapshot {
        GroupSnapshot {
            category,
            subtotal: dec(subtotal),
            apply_vat,
        }
    }

    #[test]
    fn summary_serializes_numbers_not_strings() {
        let summary = compute_summary(
            &[snapshot(CostCategory::Labour, "200", true)],
            &SummaryVariant::Proforma(Adjustments::default()),
            &TaxRates::default(),
        );
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["subtotalPerGroup"]["labour"], serde_json::json!(200.0));
        assert_eq!(value["vatPerGroup"]["labour"], serde_json::json!(30.0));
        assert_eq!(value["grossTotal"], serde_json::json!(230.0));
        assert_eq!(value["withholding"], serde_json::json!(4.6));
        assert_eq!(value["netPay"], serde_json::json!(225.4));
    }

    #[test]
    fn labour_without_vat() {
        let summary = compute_summary(
            &[snapshot(CostCategory::Labour, "200", false)],
            &SummaryVariant::Payment,
            &TaxRates::default(),
        );
        let labour = summary.group(CostCategory::Labour);
        assert_eq!(labour.subtotal, dec("200"));
        assert_eq!(labour.vat, Decimal::ZERO);
        assert_eq!(labour.total, dec("200"));
    }

    #[test]
    fn spare_with_vat() {
        let summary = compute_summary(
            &[snapshot(CostCategory::Spare, "150", true)],
            &SummaryVariant::Payment,
            &TaxRates::default(),
        );
        let spare = summary.group(CostCategory::Spare);
        assert_eq!(spare.subtotal, dec("150"));
        assert_eq!(spare.vat, dec("22.5"));
        assert_eq!(spare.total, dec("172.5"));
        assert_eq!(summary.grand_total(), dec("172.5"));
        assert_eq!(summary.withholding, None);
    }

    #[test]
    fn proforma_with_adjustments_and_withholding() {
        let groups = [
            snapshot(CostCategory::Labour, "200", true),
            snapshot(CostCategory::Spare, "150", true),
        ];
        let variant = SummaryVariant::Proforma(Adjustments::new(dec("20"), dec("10")));

        let summary = compute_summary(&groups, &variant, &TaxRates::default());
        assert_eq!(summary.grand_subtotal, dec("350"));
        assert_eq!(summary.total_vat, dec("52.5"));
        assert_eq!(summary.gross_total, dec("412.5"));
        assert_eq!(summary.withholding, Some(dec("8.25")));
        assert_eq!(summary.net_pay, dec("404.25"));
    }

    #[test]
    fn proforma_without_withholding_pays_gross() {
        let groups = [
            snapshot(CostCategory::Labour, "200", true),
            snapshot(CostCategory::Spare, "150", true),
        ];
        let variant = SummaryVariant::Proforma(Adjustments::new(dec("20"), dec("10")));
        let rates = TaxRates::default().without_withholding();

        let summary = compute_summary(&groups, &variant, &rates);
        assert_eq!(summary.withholding, None);
        assert_eq!(summary.net_pay, dec("412.5"));
    }

    #[test]
    fn payment_ignores_withholding_rate() {
        let summary = compute_summary(
            &[snapshot(CostCategory::Other, "100", true)],
            &SummaryVariant::Payment,
            &TaxRates::default(),
        );
        assert_eq!(summary.net_pay, dec("115"));
        assert_eq!(summary.withholding, None);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = compute_summary(
            &[],
            &SummaryVariant::Proforma(Adjustments::default()),
            &TaxRates::default(),
        );
        for category in CostCategory::ALL {
            assert_eq!(summary.subtotal_of(category), Decimal::ZERO);
            assert_eq!(summary.vat_of(category), Decimal::ZERO);
        }
        assert_eq!(summary.gross_total, Decimal::ZERO);
        assert_eq!(summary.withholding, Some(Decimal::ZERO));
        assert_eq!(summary.net_pay, Decimal::ZERO);
    }

    #[test]
    fn negative_adjustments_clamp_to_zero() {
        let summary = compute_summary(
            &[snapshot(CostCategory::Spare, "100", false)],
            &SummaryVariant::Proforma(Adjustments::new(dec("-5"), dec("-5"))),
            &TaxRates::default().without_withholding(),
        );
        assert_eq!(summary.gross_total, dec("100"));
    }

    #[test]
    fn discount_may_exceed_total() {
        let summary = compute_summary(
            &[snapshot(CostCategory::Spare, "10", false)],
            &SummaryVariant::Proforma(Adjustments::new(Decimal::ZERO, dec("30"))),
            &TaxRates::default().without_withholding(),
        );
        assert_eq!(summary.gross_total, dec("-20"));
        assert_eq!(summary.net_pay, dec("-20"));
    }

    #[test]
    fn duplicate_categories_merge() {
        let summary = compute_summary(
            &[
                snapshot(CostCategory::Spare, "100", true),
                snapshot(CostCategory::Spare, "50", false),
            ],
            &SummaryVariant::Payment,
            &TaxRates::default(),
        );
        assert_eq!(summary.subtotal_of(CostCategory::Spare), dec("150"));
        assert_eq!(summary.vat_of(CostCategory::Spare), dec("15"));
    }

    fn arb_group() -> impl Strategy<Value = GroupSnapshot> {
        (0usize..3, 0i64..100_000_000, any::<bool>()).prop_map(|(c, cents, apply_vat)| GroupSnapshot {
            category: CostCategory::ALL[c],
            subtotal: Decimal::new(cents, 2),
            apply_vat,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: same inputs, same summary (no hidden state).
        #[test]
        fn summary_is_idempotent(
            groups in prop::collection::vec(arb_group(), 0..6),
            other_cents in 0i64..1_000_000,
            discount_cents in 0i64..1_000_000,
        ) {
            let variant = SummaryVariant::Proforma(Adjustments::new(
                Decimal::new(other_cents, 2),
                Decimal::new(discount_cents, 2),
            ));
            let rates = TaxRates::default();
            let first = compute_summary(&groups, &variant, &rates);
            let second = compute_summary(&groups, &variant, &rates);
            prop_assert_eq!(first, second);
        }

        /// Property: totals are the sums of their per-group parts.
        #[test]
        fn totals_are_sums_of_groups(groups in prop::collection::vec(arb_group(), 0..6)) {
            let summary = compute_summary(&groups, &SummaryVariant::Payment, &TaxRates::default());
            let subtotal: Decimal = groups.iter().map(|g| g.subtotal).sum();
            prop_assert_eq!(summary.grand_subtotal, subtotal);
            prop_assert_eq!(summary.gross_total, summary.grand_subtotal + summary.total_vat);
            prop_assert_eq!(summary.net_pay, summary.gross_total);
        }
    }
}
