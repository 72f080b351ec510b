use serde::{Deserialize, Serialize};

use workshop_core::numeric::lenient;
use workshop_core::{DomainError, DomainResult, SheetId};

use crate::group::{CostGroup, GroupSnapshot};
use crate::line_item::{LabourItem, OtherCostItem, SpareItem};
use crate::payload::{PaymentPayload, ProformaPayload, SavePayload};
use crate::summary::{compute_summary, Adjustments, Summary, SummaryVariant};
use crate::tax::TaxRates;

/// Which cost screen a sheet belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    #[default]
    Proforma,
    Payment,
}

impl core::str::FromStr for SheetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proforma" => Ok(SheetKind::Proforma),
            "payment" => Ok(SheetKind::Payment),
            other => Err(DomainError::validation(format!("unknown sheet kind: {other}"))),
        }
    }
}

/// Persisted inputs of a cost sheet, as the forms save them.
///
/// Only inputs are stored; every total is regenerated on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SheetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SheetKind>,
    #[serde(default, alias = "labourItems")]
    pub labour: Vec<LabourItem>,
    #[serde(default, alias = "spareItems", alias = "spares")]
    pub spare: Vec<SpareItem>,
    #[serde(default, alias = "otherItems", alias = "otherCosts")]
    pub other: Vec<OtherCostItem>,
    #[serde(default, alias = "vatLabour", deserialize_with = "lenient::flag")]
    pub labour_vat: bool,
    #[serde(default, alias = "vatSpare", deserialize_with = "lenient::flag")]
    pub spare_vat: bool,
    #[serde(default, alias = "vatOther", deserialize_with = "lenient::flag")]
    pub other_vat: bool,
    #[serde(flatten)]
    pub adjustments: Adjustments,
}

/// An editable cost sheet: three groups, adjustments and the screen kind.
///
/// The sheet is owned by the form. Edits go through the groups; totals are
/// recomputed on demand with [`CostSheet::summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct CostSheet {
    pub id: SheetId,
    pub kind: SheetKind,
    pub labour: CostGroup<LabourItem>,
    pub spare: CostGroup<SpareItem>,
    pub other: CostGroup<OtherCostItem>,
    /// Ignored on payment sheets.
    pub adjustments: Adjustments,
}

impl CostSheet {
    pub fn new(kind: SheetKind) -> Self {
        Self {
            id: SheetId::new(),
            kind,
            labour: CostGroup::default(),
            spare: CostGroup::default(),
            other: CostGroup::default(),
            adjustments: Adjustments::default(),
        }
    }

    pub fn proforma() -> Self {
        Self::new(SheetKind::Proforma)
    }

    pub fn payment() -> Self {
        Self::new(SheetKind::Payment)
    }

    /// Load a stored document. Blank rows left behind by older editors are pruned.
    pub fn from_document(doc: SheetDocument) -> Self {
        let mut sheet = Self {
            id: doc.id.unwrap_or_default(),
            kind: doc.kind.unwrap_or_default(),
            labour: CostGroup::with_rows(doc.labour, doc.labour_vat),
            spare: CostGroup::with_rows(doc.spare, doc.spare_vat),
            other: CostGroup::with_rows(doc.other, doc.other_vat),
            adjustments: doc.adjustments,
        };
        let pruned = sheet.prune_blank();
        if pruned > 0 {
            tracing::debug!(sheet_id = %sheet.id, pruned, "dropped blank rows on load");
        }
        sheet
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        let doc: SheetDocument =
            serde_json::from_str(json).map_err(|e| DomainError::invalid_document(e.to_string()))?;
        Ok(Self::from_document(doc))
    }

    pub fn to_document(&self) -> SheetDocument {
        SheetDocument {
            id: Some(self.id),
            kind: Some(self.kind),
            labour: self.labour.rows().to_vec(),
            spare: self.spare.rows().to_vec(),
            other: self.other.rows().to_vec(),
            labour_vat: self.labour.apply_vat(),
            spare_vat: self.spare.apply_vat(),
            other_vat: self.other.apply_vat(),
            adjustments: self.adjustments,
        }
    }

    /// Drop blank rows from every group. Returns how many were removed.
    pub fn prune_blank(&mut self) -> usize {
        self.labour.prune_blank() + self.spare.prune_blank() + self.other.prune_blank()
    }

    pub fn snapshots(&self) -> [GroupSnapshot; 3] {
        [
            self.labour.snapshot(),
            self.spare.snapshot(),
            self.other.snapshot(),
        ]
    }

    pub fn variant(&self) -> SummaryVariant {
        match self.kind {
            SheetKind::Proforma => SummaryVariant::Proforma(self.adjustments),
            SheetKind::Payment => SummaryVariant::Payment,
        }
    }

    pub fn summary(&self, rates: &TaxRates) -> Summary {
        let summary = compute_summary(&self.snapshots(), &self.variant(), rates);
        tracing::debug!(
            sheet_id = %self.id,
            kind = ?self.kind,
            grand_subtotal = %summary.grand_subtotal,
            total_vat = %summary.total_vat,
            net_pay = %summary.net_pay,
            "cost summary recomputed"
        );
        summary
    }

    /// Totals in the shape the sheet's screen persists.
    pub fn save_payload(&self, rates: &TaxRates) -> SavePayload {
        let summary = self.summary(rates);
        match self.kind {
            SheetKind::Proforma => SavePayload::Proforma(ProformaPayload::from(&summary)),
            SheetKind::Payment => SavePayload::Payment(PaymentPayload::from(&summary)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::CostCategory;
    use rust_decimal::Decimal;
    use workshop_core::Entity;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn edits_are_reflected_on_next_summary() {
        let mut sheet = CostSheet::payment();
        let rates = TaxRates::default();

        let labour = sheet.labour.push(LabourItem::new("Clutch", dec(100), dec(2)));
        assert_eq!(sheet.summary(&rates).grand_total(), dec(200));

        sheet.labour.set_apply_vat(true);
        assert_eq!(sheet.summary(&rates).grand_total(), dec(230));

        sheet.labour.update(labour, |row| row.estimated_time = dec(1)).unwrap();
        assert_eq!(sheet.summary(&rates).grand_total(), dec(115));

        sheet.labour.remove(labour).unwrap();
        assert_eq!(sheet.summary(&rates).grand_total(), Decimal::ZERO);
    }

    #[test]
    fn payment_sheet_ignores_adjustments() {
        let mut sheet = CostSheet::payment();
        sheet.spare.push(SpareItem::new("Filter", dec(3), dec(50)));
        sheet.adjustments = Adjustments::new(dec(20), dec(10));

        let summary = sheet.summary(&TaxRates::default());
        assert_eq!(summary.grand_total(), dec(150));
        assert_eq!(summary.withholding, None);
    }

    #[test]
    fn loading_prunes_blank_rows() {
        let json = r#"{
            "kind": "proforma",
            "spare": [
                {"description": "", "qty": "", "unit_price": ""},
                {"description": "Filter", "qty": 3, "unit_price": 50}
            ],
            "spareVat": true
        }"#;
        let sheet = CostSheet::from_json(json).unwrap();
        assert_eq!(sheet.spare.len(), 1);
        assert_eq!(sheet.summary(&TaxRates::default()).subtotal_of(CostCategory::Spare), dec(150));
    }

    #[test]
    fn document_round_trip_keeps_ids_and_flags() {
        let mut sheet = CostSheet::proforma();
        let id = sheet.spare.push(SpareItem::new("Filter", dec(3), dec(50)));
        sheet.spare.set_apply_vat(true);
        sheet.adjustments = Adjustments::new(dec(20), dec(10));

        let json = serde_json::to_string(&sheet.to_document()).unwrap();
        let loaded = CostSheet::from_json(&json).unwrap();

        assert_eq!(loaded, sheet);
        assert_eq!(loaded.spare.rows()[0].id(), id);
    }

    #[test]
    fn vat_flags_accept_form_checkbox_values() {
        let json = r#"{
            "kind": "payment",
            "spare": [{"qty": 3, "unit_price": 50, "remark": false}],
            "spareVat": "true",
            "labourVat": null
        }"#;
        let sheet = CostSheet::from_json(json).unwrap();
        assert!(sheet.spare.apply_vat());
        assert!(!sheet.labour.apply_vat());
        assert_eq!(sheet.summary(&TaxRates::default()).grand_total(), Decimal::new(1725, 1));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        match CostSheet::from_json("[1, 2, 3]").unwrap_err() {
            DomainError::InvalidDocument(_) => {}
            other => panic!("Expected InvalidDocument, got {other:?}"),
        }
    }

    #[test]
    fn sheet_kind_parses() {
        assert_eq!("Payment".parse::<SheetKind>().unwrap(), SheetKind::Payment);
        assert!("invoice".parse::<SheetKind>().is_err());
    }
}
