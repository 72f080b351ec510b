use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use workshop_core::numeric::round_for_display;

use crate::line_item::CostCategory;
use crate::summary::Summary;
use crate::words::amount_to_words;

// -------------------------
// Save payloads
// -------------------------

/// Totals persisted with a proforma. Figures are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProformaPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_total: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub withholding: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_pay: Decimal,
    pub net_pay_in_words: String,
}

impl From<&Summary> for ProformaPayload {
    fn from(summary: &Summary) -> Self {
        let net_pay = round_for_display(summary.net_pay);
        Self {
            total: round_for_display(summary.grand_subtotal),
            total_vat: round_for_display(summary.total_vat),
            gross_total: round_for_display(summary.gross_total),
            withholding: summary.withholding.map(round_for_display),
            net_pay,
            net_pay_in_words: amount_to_words(net_pay),
        }
    }
}

/// Totals persisted with a payment's cost breakdown. Figures are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub labour_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub spare_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub other_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,
}

impl From<&Summary> for PaymentPayload {
    fn from(summary: &Summary) -> Self {
        Self {
            labour_total: round_for_display(summary.subtotal_of(CostCategory::Labour)),
            spare_total: round_for_display(summary.subtotal_of(CostCategory::Spare)),
            other_total: round_for_display(summary.subtotal_of(CostCategory::Other)),
            subtotal: round_for_display(summary.grand_subtotal),
            vat_amount: round_for_display(summary.total_vat),
            grand_total: round_for_display(summary.grand_total()),
        }
    }
}

/// Either payload, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SavePayload {
    Proforma(ProformaPayload),
    Payment(PaymentPayload),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupSnapshot;
    use crate::summary::{compute_summary, Adjustments, SummaryVariant};
    use crate::tax::TaxRates;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn example_groups() -> [GroupSnapshot; 2] {
        [
            GroupSnapshot {
                category: CostCategory::Labour,
                subtotal: dec("200"),
                apply_vat: true,
            },
            GroupSnapshot {
                category: CostCategory::Spare,
                subtotal: dec("150"),
                apply_vat: true,
            },
        ]
    }

    #[test]
    fn proforma_payload_uses_screen_field_names() {
        let summary = compute_summary(
            &example_groups(),
            &SummaryVariant::Proforma(Adjustments::new(dec("20"), dec("10"))),
            &TaxRates::default(),
        );
        let payload = ProformaPayload::from(&summary);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "total": 350.0,
                "totalVat": 52.5,
                "grossTotal": 412.5,
                "withholding": 8.25,
                "netPay": 404.25,
                "netPayInWords": "Four hundred and four and twenty-five Cents Birr",
            })
        );
    }

    #[test]
    fn withholding_is_omitted_when_not_applied() {
        let summary = compute_summary(
            &example_groups(),
            &SummaryVariant::Proforma(Adjustments::default()),
            &TaxRates::default().without_withholding(),
        );
        let value = serde_json::to_value(ProformaPayload::from(&summary)).unwrap();
        assert!(value.get("withholding").is_none());
        assert_eq!(value["netPay"], json!(402.5));
    }

    #[test]
    fn payment_payload_uses_screen_field_names() {
        let summary = compute_summary(&example_groups(), &SummaryVariant::Payment, &TaxRates::default());
        let value = serde_json::to_value(SavePayload::Payment(PaymentPayload::from(&summary))).unwrap();
        assert_eq!(
            value,
            json!({
                "labourTotal": 200.0,
                "spareTotal": 150.0,
                "otherTotal": 0.0,
                "subtotal": 350.0,
                "vatAmount": 52.5,
                "grandTotal": 402.5,
            })
        );
    }

    #[test]
    fn payload_rounds_only_at_the_edge() {
        let groups = [GroupSnapshot {
            category: CostCategory::Spare,
            subtotal: dec("0.33"),
            apply_vat: true,
        }];
        let summary = compute_summary(&groups, &SummaryVariant::Payment, &TaxRates::default());
        assert_eq!(summary.total_vat, dec("0.0495"));

        let payload = PaymentPayload::from(&summary);
        assert_eq!(payload.vat_amount, dec("0.05"));
        assert_eq!(payload.grand_total, dec("0.38"));
    }
}
