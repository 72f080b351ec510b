use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use workshop_core::numeric::{lenient, non_negative};
use workshop_core::{Entity, LineItemId};

/// Cost category of a group of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Labour,
    Spare,
    Other,
}

impl CostCategory {
    pub const ALL: [CostCategory; 3] = [CostCategory::Labour, CostCategory::Spare, CostCategory::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Labour => "labour",
            CostCategory::Spare => "spare",
            CostCategory::Other => "other",
        }
    }
}

impl core::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A billable row of one category.
///
/// `line_total` is always derived from the row's inputs and is never negative:
/// negative inputs clamp to zero before multiplying.
pub trait CostLine: Entity<Id = LineItemId> + Clone + PartialEq + core::fmt::Debug + Default {
    const CATEGORY: CostCategory;

    /// Derived total of the row.
    fn line_total(&self) -> Decimal;

    /// True when every text field is empty and every numeric field is zero.
    fn is_blank(&self) -> bool;
}

/// Total of a single row, whatever its category.
pub fn compute_line_total<L: CostLine>(item: &L) -> Decimal {
    item.line_total()
}

fn blank_text(fields: &[&str]) -> bool {
    fields.iter().all(|f| f.trim().is_empty())
}

fn priced(quantity: Decimal, unit_price: Decimal) -> Decimal {
    non_negative(quantity).saturating_mul(non_negative(unit_price))
}

/// Technician time billed at an hourly (or per-job) rate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LabourRow")]
pub struct LabourItem {
    pub id: LineItemId,
    pub description: String,
    /// Rate per unit of time.
    pub cost_rate: Decimal,
    pub estimated_time: Decimal,
    pub remark: String,
}

impl LabourItem {
    pub fn new(description: impl Into<String>, cost_rate: Decimal, estimated_time: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            description: description.into(),
            cost_rate,
            estimated_time,
            remark: String::new(),
        }
    }
}

impl Entity for LabourItem {
    type Id = LineItemId;

    fn id(&self) -> LineItemId {
        self.id
    }
}

impl CostLine for LabourItem {
    const CATEGORY: CostCategory = CostCategory::Labour;

    fn line_total(&self) -> Decimal {
        priced(self.cost_rate, self.estimated_time)
    }

    fn is_blank(&self) -> bool {
        blank_text(&[&self.description, &self.remark])
            && self.cost_rate.is_zero()
            && self.estimated_time.is_zero()
    }
}

/// A physical part: quantity × unit price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SpareRow")]
pub struct SpareItem {
    pub id: LineItemId,
    pub description: String,
    pub part_number: String,
    pub brand: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub remark: String,
}

impl SpareItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            description: description.into(),
            quantity,
            unit_price,
            ..Self::default()
        }
    }
}

impl Entity for SpareItem {
    type Id = LineItemId;

    fn id(&self) -> LineItemId {
        self.id
    }
}

impl CostLine for SpareItem {
    const CATEGORY: CostCategory = CostCategory::Spare;

    fn line_total(&self) -> Decimal {
        priced(self.quantity, self.unit_price)
    }

    fn is_blank(&self) -> bool {
        blank_text(&[
            &self.description,
            &self.part_number,
            &self.brand,
            &self.unit,
            &self.remark,
        ]) && self.quantity.is_zero()
            && self.unit_price.is_zero()
    }
}

/// Any other cost (towing, outsourced machining, consumables).
///
/// Rows carrying a quantity or a unit price are priced like spares; rows with
/// neither are flat and contribute `amount`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "OtherCostRow")]
pub struct OtherCostItem {
    pub id: LineItemId,
    pub description: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub remark: String,
}

impl OtherCostItem {
    /// A flat-amount row.
    pub fn flat(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            description: description.into(),
            amount,
            ..Self::default()
        }
    }

    /// A priced row (quantity × unit price).
    pub fn priced(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            description: description.into(),
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero() && self.unit_price.is_zero()
    }
}

impl Entity for OtherCostItem {
    type Id = LineItemId;

    fn id(&self) -> LineItemId {
        self.id
    }
}

impl CostLine for OtherCostItem {
    const CATEGORY: CostCategory = CostCategory::Other;

    fn line_total(&self) -> Decimal {
        if self.is_flat() {
            non_negative(self.amount)
        } else {
            priced(self.quantity, self.unit_price)
        }
    }

    fn is_blank(&self) -> bool {
        blank_text(&[&self.description, &self.unit, &self.remark])
            && self.quantity.is_zero()
            && self.unit_price.is_zero()
            && self.amount.is_zero()
    }
}

// Rows as the forms send them. One field may arrive under several spellings
// at once; the first non-zero (or non-empty) spelling in field order wins.
// Ids that are not UUIDs (backend integers, junk) get a fresh id.

fn row_id(raw: &str) -> LineItemId {
    raw.trim().parse().unwrap_or_default()
}

fn first_non_zero<const N: usize>(values: [Decimal; N]) -> Decimal {
    values
        .into_iter()
        .find(|v| !v.is_zero())
        .unwrap_or(Decimal::ZERO)
}

fn first_non_empty<const N: usize>(values: [String; N]) -> String {
    values
        .into_iter()
        .find(|v| !v.trim().is_empty())
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct LabourRow {
    #[serde(default, deserialize_with = "lenient::text")]
    id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    description: String,
    #[serde(default, rename = "costRate", deserialize_with = "lenient::decimal")]
    cost_rate: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    cost: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    rate: Decimal,
    #[serde(default, rename = "estimatedTime", deserialize_with = "lenient::decimal")]
    estimated_time: Decimal,
    #[serde(default, rename = "estimated_time", deserialize_with = "lenient::decimal")]
    estimated_time_snake: Decimal,
    #[serde(default, rename = "estTime", deserialize_with = "lenient::decimal")]
    est_time: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    time: Decimal,
    #[serde(default, deserialize_with = "lenient::text")]
    remark: String,
}

impl From<LabourRow> for LabourItem {
    fn from(row: LabourRow) -> Self {
        Self {
            id: row_id(&row.id),
            description: row.description,
            cost_rate: first_non_zero([row.cost_rate, row.cost, row.rate]),
            estimated_time: first_non_zero([
                row.estimated_time,
                row.estimated_time_snake,
                row.est_time,
                row.time,
            ]),
            remark: row.remark,
        }
    }
}

#[derive(Deserialize)]
struct SpareRow {
    #[serde(default, deserialize_with = "lenient::text")]
    id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    description: String,
    #[serde(default, rename = "partNumber", deserialize_with = "lenient::text")]
    part_number: String,
    #[serde(default, rename = "part_number", deserialize_with = "lenient::text")]
    part_number_snake: String,
    #[serde(default, deserialize_with = "lenient::text")]
    brand: String,
    #[serde(default, deserialize_with = "lenient::text")]
    unit: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    qty: Decimal,
    #[serde(default, rename = "unitPrice", deserialize_with = "lenient::decimal")]
    unit_price: Decimal,
    #[serde(default, rename = "unit_price", deserialize_with = "lenient::decimal")]
    unit_price_snake: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    cost: Decimal,
    #[serde(default, deserialize_with = "lenient::text")]
    remark: String,
}

impl From<SpareRow> for SpareItem {
    fn from(row: SpareRow) -> Self {
        Self {
            id: row_id(&row.id),
            description: row.description,
            part_number: first_non_empty([row.part_number, row.part_number_snake]),
            brand: row.brand,
            unit: row.unit,
            quantity: first_non_zero([row.quantity, row.qty]),
            unit_price: first_non_zero([row.unit_price, row.unit_price_snake, row.cost]),
            remark: row.remark,
        }
    }
}

#[derive(Deserialize)]
struct OtherCostRow {
    #[serde(default, deserialize_with = "lenient::text")]
    id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    unit: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    qty: Decimal,
    #[serde(default, rename = "unitPrice", deserialize_with = "lenient::decimal")]
    unit_price: Decimal,
    #[serde(default, rename = "unit_price", deserialize_with = "lenient::decimal")]
    unit_price_snake: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    cost: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    amount: Decimal,
    #[serde(default, deserialize_with = "lenient::text")]
    remark: String,
}

impl From<OtherCostRow> for OtherCostItem {
    fn from(row: OtherCostRow) -> Self {
        Self {
            id: row_id(&row.id),
            description: row.description,
            unit: row.unit,
            quantity: first_non_zero([row.quantity, row.qty]),
            unit_price: first_non_zero([row.unit_price, row.unit_price_snake, row.cost]),
            amount: row.amount,
            remark: row.remark,
        }
    }
}
