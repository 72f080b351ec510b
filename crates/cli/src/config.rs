//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;

use workshop_core::DomainResult;
use workshop_costing::{SheetKind, TaxRates};
use workshop_observability::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "workshop-costing")]
#[command(about = "Regenerate proforma / payment totals from a saved cost sheet")]
pub struct Args {
    /// Path to the cost sheet document (JSON). Reads stdin when omitted or "-".
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the sheet kind stored in the document (proforma | payment).
    #[arg(long)]
    pub kind: Option<SheetKind>,

    /// VAT rate applied to groups whose VAT flag is set.
    #[arg(long, env = "WORKSHOP_VAT_RATE", default_value = "0.15")]
    pub vat_rate: Decimal,

    /// Withholding rate deducted from proforma totals.
    #[arg(long, env = "WORKSHOP_WITHHOLDING_RATE", default_value = "0.02")]
    pub withholding_rate: Decimal,

    /// Do not deduct withholding (proforma edit-table rule).
    #[arg(long)]
    pub no_withholding: bool,

    /// Print the full summary next to the save payload.
    #[arg(long)]
    pub summary: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Log output format (json | compact).
    #[arg(long, env = "WORKSHOP_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

impl Args {
    /// Validated tax configuration.
    pub fn tax_rates(&self) -> DomainResult<TaxRates> {
        let mut rates = TaxRates::default().with_vat_rate(self.vat_rate);
        rates = if self.no_withholding {
            rates.without_withholding()
        } else {
            rates.with_withholding_rate(self.withholding_rate)
        };
        rates.validate()?;
        Ok(rates)
    }
}
