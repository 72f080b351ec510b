//! Line-item cost & totals engine (proforma and payment cost screens).
//!
//! This crate is pure, synchronous domain logic: no IO, no HTTP, no storage.
//! Every numeric input is coerced ("parse or zero") so no computation can fail.

pub mod group;
pub mod line_item;
pub mod payload;
pub mod sheet;
pub mod summary;
pub mod tax;
pub mod words;

pub use group::{compute_group_subtotal, CostGroup, GroupSnapshot};
pub use line_item::{
    compute_line_total, CostCategory, CostLine, LabourItem, OtherCostItem, SpareItem,
};
pub use payload::{PaymentPayload, ProformaPayload, SavePayload};
pub use sheet::{CostSheet, SheetDocument, SheetKind};
pub use summary::{compute_summary, Adjustments, GroupTotals, Summary, SummaryVariant};
pub use tax::{compute_vat, TaxRates, DEFAULT_VAT_RATE, DEFAULT_WITHHOLDING_RATE};
pub use words::{amount_to_words, amount_to_words_f64, amount_to_words_in, number_to_words};
