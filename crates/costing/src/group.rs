use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use workshop_core::{DomainError, DomainResult, LineItemId};

use crate::line_item::{CostCategory, CostLine};

/// Sum of row totals. An empty slice sums to zero.
pub fn compute_group_subtotal<L: CostLine>(rows: &[L]) -> Decimal {
    rows.iter()
        .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.line_total()))
}

/// What the totals engine needs from a group: its category, subtotal and VAT flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub category: CostCategory,
    pub subtotal: Decimal,
    pub apply_vat: bool,
}

/// Ordered, editable rows of one category plus its "apply VAT" flag.
///
/// The group is owned by the form that edits it; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGroup<L> {
    rows: Vec<L>,
    apply_vat: bool,
}

impl<L> Default for CostGroup<L> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            apply_vat: false,
        }
    }
}

impl<L: CostLine> CostGroup<L> {
    pub fn new(apply_vat: bool) -> Self {
        Self {
            rows: Vec::new(),
            apply_vat,
        }
    }

    pub fn with_rows(rows: Vec<L>, apply_vat: bool) -> Self {
        Self { rows, apply_vat }
    }

    pub fn category(&self) -> CostCategory {
        L::CATEGORY
    }

    pub fn rows(&self) -> &[L] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn apply_vat(&self) -> bool {
        self.apply_vat
    }

    pub fn set_apply_vat(&mut self, apply_vat: bool) {
        self.apply_vat = apply_vat;
    }

    pub fn get(&self, id: LineItemId) -> Option<&L> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Append a row and return its id.
    pub fn push(&mut self, row: L) -> LineItemId {
        let id = row.id();
        self.rows.push(row);
        id
    }

    /// Append an empty row (the "add line" button).
    pub fn push_blank(&mut self) -> LineItemId {
        self.push(L::default())
    }

    /// Edit a row in place.
    pub fn update(&mut self, id: LineItemId, edit: impl FnOnce(&mut L)) -> DomainResult<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(DomainError::not_found)?;
        edit(row);
        Ok(())
    }

    /// Remove a row by identity, keeping the order of the others.
    pub fn remove(&mut self, id: LineItemId) -> DomainResult<L> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or_else(DomainError::not_found)?;
        Ok(self.rows.remove(index))
    }

    /// Remove a row by position.
    pub fn remove_at(&mut self, index: usize) -> Option<L> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Drop logically empty rows. Returns how many were removed.
    ///
    /// Documents saved by editors that deleted rows by blanking them still
    /// carry those rows; pruning brings them to the same shape as a true removal.
    pub fn prune_blank(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !row.is_blank());
        before - self.rows.len()
    }

    pub fn subtotal(&self) -> Decimal {
        compute_group_subtotal(&self.rows)
    }

    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            category: self.category(),
            subtotal: self.subtotal(),
            apply_vat: self.apply_vat,
        }
    }
}
