//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog records are compared by identity when deduplicating, so the
/// identifier type must be hashable.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
