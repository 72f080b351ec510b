//! Entity trait: identity + continuity across edits.

/// Entity marker + minimal interface.
///
/// Editable rows implement this so a list can find, replace or remove a row by
/// identity instead of by position.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
