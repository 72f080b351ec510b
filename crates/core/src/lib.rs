//! `workshop-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, typed identifiers, entity/value-object markers and the
//! lenient numeric coercion shared by every cost form.

pub mod entity;
pub mod error;
pub mod id;
pub mod numeric;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{LineItemId, SheetId};
pub use numeric::{coerce_f64, non_negative, parse_or_zero, round_for_display};
pub use value_object::ValueObject;
