//! Records addressed by a backend-assigned identifier.

/// A record with a stable identifier.
///
/// Controllers use the identifier to patch their local cache after a write
/// (replace on update, remove on delete).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
