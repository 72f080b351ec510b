use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use workshop_core::{DomainError, DomainResult, ValueObject};

/// Flat VAT rate applied to a group when its flag is set (15%).
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Withholding deducted from the VAT-inclusive proforma total (2%).
pub const DEFAULT_WITHHOLDING_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// VAT owed on a subtotal: `subtotal × rate` when `apply_vat`, else zero.
pub fn compute_vat(subtotal: Decimal, apply_vat: bool, rate: Decimal) -> Decimal {
    if apply_vat {
        subtotal.saturating_mul(rate)
    } else {
        Decimal::ZERO
    }
}

/// Tax configuration shared by every cost screen.
///
/// `withholding_rate = None` reproduces the proforma edit table, which never
/// deducted withholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRates {
    pub vat_rate: Decimal,
    pub withholding_rate: Option<Decimal>,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            withholding_rate: Some(DEFAULT_WITHHOLDING_RATE),
        }
    }
}

impl ValueObject for TaxRates {}

impl TaxRates {
    pub fn with_vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    pub fn with_withholding_rate(mut self, rate: Decimal) -> Self {
        self.withholding_rate = Some(rate);
        self
    }

    pub fn without_withholding(mut self) -> Self {
        self.withholding_rate = None;
        self
    }

    /// Rates are fractions: each must lie in `0..=1`.
    pub fn validate(&self) -> DomainResult<()> {
        check_fraction("vat rate", self.vat_rate)?;
        if let Some(rate) = self.withholding_rate {
            check_fraction("withholding rate", rate)?;
        }
        Ok(())
    }

    pub fn vat_on(&self, subtotal: Decimal, apply_vat: bool) -> Decimal {
        compute_vat(subtotal, apply_vat, self.vat_rate)
    }
}

fn check_fraction(name: &str, rate: Decimal) -> DomainResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DomainError::validation(format!(
            "{name} must be between 0 and 1, got {rate}"
        )));
    }
    Ok(())
}
