//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity; two instances holding the same values are
/// interchangeable. In this workspace that covers tax rates, adjustments and
/// every derived summary: they are recomputed, compared and thrown away, never
/// tracked across edits the way a row is (see [`crate::Entity`]).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Adjustments {
///     other_cost: Decimal,
///     discount: Decimal,
/// }
///
/// impl ValueObject for Adjustments {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
